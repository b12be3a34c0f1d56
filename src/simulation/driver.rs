// src/simulation/driver.rs

use crate::error::{SimError, SimResult};
use crate::simulation::config::SimulationConfig;
use crate::simulation::engine::{run_replication, ReplicationOutcome};
use crate::simulation::statistics::ServiceLevelSummary;
use log::{info, warn};
use rayon::prelude::*;
use serde::Serialize;

/// A replication that did not produce a service level.
#[derive(Debug, Clone, Serialize)]
pub struct ReplicationFailure {
    pub replication: usize,
    pub seed: u64,
    pub reason: String,
}

/// Everything a batch of replications produced, in replication order.
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub outcomes: Vec<ReplicationOutcome>,
    pub failures: Vec<ReplicationFailure>,
}

impl BatchReport {
    pub fn service_levels(&self) -> Vec<f64> {
        self.outcomes.iter().map(|o| o.service_level).collect()
    }

    /// Mean and spread over the successful replications.
    pub fn summary(&self) -> SimResult<ServiceLevelSummary> {
        ServiceLevelSummary::from_samples(&self.service_levels()).ok_or(
            SimError::NoSuccessfulReplications {
                failed: self.failures.len(),
            },
        )
    }
}

/// Runs independent replications of one configuration.
///
/// Replication `i` draws from its own stream seeded with `base_seed + i`,
/// so results do not depend on how many worker threads are used.
#[derive(Debug, Clone)]
pub struct ReplicationDriver {
    config: SimulationConfig,
    threads: Option<usize>,
}

impl ReplicationDriver {
    /// Validates `config` up front; nothing is rejected mid-run.
    pub fn new(config: SimulationConfig) -> SimResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            threads: None,
        })
    }

    /// Use a dedicated pool of `threads` workers instead of rayon's global pool.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn seed_for(&self, replication: usize) -> u64 {
        self.config.base_seed.wrapping_add(replication as u64)
    }

    pub fn run(&self) -> SimResult<BatchReport> {
        info!(
            "running {} {:?} replications over {} days",
            self.config.replications, self.config.fulfillment, self.config.horizon_days
        );

        let results = match self.threads {
            Some(threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()?;
                pool.install(|| self.run_all())
            }
            None => self.run_all(),
        };

        let mut outcomes = Vec::with_capacity(results.len());
        let mut failures = Vec::new();
        for (replication, result) in results.into_iter().enumerate() {
            match result {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => {
                    warn!("replication {replication} failed: {e}");
                    failures.push(ReplicationFailure {
                        replication,
                        seed: self.seed_for(replication),
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            "{} replications succeeded, {} failed",
            outcomes.len(),
            failures.len()
        );
        Ok(BatchReport { outcomes, failures })
    }

    fn run_all(&self) -> Vec<SimResult<ReplicationOutcome>> {
        (0..self.config.replications)
            .into_par_iter()
            .map(|i| run_replication(&self.config, i, self.seed_for(i)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::config::FulfillmentKind;

    fn small(kind: FulfillmentKind) -> SimulationConfig {
        SimulationConfig {
            replications: 12,
            fulfillment: kind,
            ..Default::default()
        }
    }

    #[test]
    fn rejects_invalid_config_before_running() {
        let config = SimulationConfig {
            demand_std_dev: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            ReplicationDriver::new(config),
            Err(SimError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn outcomes_come_back_in_replication_order() {
        let report = ReplicationDriver::new(small(FulfillmentKind::LostSales))
            .unwrap()
            .run()
            .unwrap();
        assert!(report.failures.is_empty());
        let ids: Vec<usize> = report.outcomes.iter().map(|o| o.replication).collect();
        assert_eq!(ids, (0..12).collect::<Vec<_>>());
        let seeds: Vec<u64> = report.outcomes.iter().map(|o| o.seed).collect();
        assert_eq!(seeds, (0..12).collect::<Vec<u64>>());
    }

    #[test]
    fn thread_count_does_not_change_results() {
        let driver = ReplicationDriver::new(small(FulfillmentKind::Backorder)).unwrap();
        let single = driver.clone().with_threads(1).run().unwrap();
        let four = driver.with_threads(4).run().unwrap();
        assert_eq!(single.service_levels(), four.service_levels());
    }

    #[test]
    fn failed_replications_do_not_abort_the_batch() {
        // One day of zero-mean demand: roughly half the runs see a
        // non-positive total and cannot report a service level.
        let config = SimulationConfig {
            mean_demand: 0.0,
            demand_std_dev: 1.0,
            horizon_days: 1.0,
            replications: 40,
            ..Default::default()
        };
        let report = ReplicationDriver::new(config).unwrap().run().unwrap();
        assert_eq!(report.outcomes.len() + report.failures.len(), 40);
        assert!(!report.failures.is_empty());
        assert!(!report.outcomes.is_empty());
        for failure in &report.failures {
            assert_eq!(failure.seed, failure.replication as u64);
            assert!(failure.reason.contains("undefined"));
        }
        assert_eq!(report.summary().unwrap().count, report.outcomes.len());
    }

    #[test]
    fn replication_matches_standalone_run() {
        let config = small(FulfillmentKind::LostSales);
        let report = ReplicationDriver::new(config.clone())
            .unwrap()
            .run()
            .unwrap();
        let alone = run_replication(&config, 5, 5).unwrap();
        assert_eq!(report.outcomes[5].service_level, alone.service_level);
    }

    #[test]
    fn replications_are_independent() {
        let report = ReplicationDriver::new(small(FulfillmentKind::LostSales))
            .unwrap()
            .run()
            .unwrap();
        let levels = report.service_levels();
        assert!(levels.windows(2).any(|w| w[0] != w[1]));
    }

    #[test]
    fn lost_sales_summary_is_in_expected_range() {
        let config = SimulationConfig {
            replications: 40,
            ..Default::default()
        };
        let summary = ReplicationDriver::new(config)
            .unwrap()
            .run()
            .unwrap()
            .summary()
            .unwrap();
        assert_eq!(summary.count, 40);
        assert!((0.85..=1.0).contains(&summary.mean), "mean {}", summary.mean);
        assert!(summary.std_dev < 0.05, "std {}", summary.std_dev);
        assert!(summary.min >= 0.0 && summary.max <= 1.0);
    }

    #[test]
    fn summary_fails_when_nothing_succeeded() {
        let report = BatchReport {
            outcomes: Vec::new(),
            failures: vec![ReplicationFailure {
                replication: 0,
                seed: 0,
                reason: "undefined".into(),
            }],
        };
        assert!(matches!(
            report.summary(),
            Err(SimError::NoSuccessfulReplications { failed: 1 })
        ));
    }
}
