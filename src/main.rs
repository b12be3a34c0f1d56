mod error;
mod io;
mod model;
mod simulation;
mod strategy;

use crate::error::{SimError, SimResult};
use crate::io::reporting;
use crate::simulation::config::{FulfillmentKind, SimulationConfig};
use crate::simulation::driver::ReplicationDriver;
use crate::simulation::engine::Replication;
use clap::Parser;
use log::warn;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Monte Carlo estimate of the service level of a stocking facility run
/// under a reorder-point / reorder-quantity policy.
#[derive(Debug, Parser)]
#[command(name = "rop-roq-sim")]
struct Args {
    /// Stock on hand (and inventory position) at day 0.
    #[arg(long, default_value_t = 7000.0)]
    initial_inventory: f64,

    /// Reorder point (ROP).
    #[arg(long, default_value_t = 5000.0, allow_negative_numbers = true)]
    reorder_point: f64,

    /// Reorder quantity (ROQ).
    #[arg(long, default_value_t = 2000.0, allow_negative_numbers = true)]
    reorder_quantity: f64,

    #[arg(long, default_value_t = 500.0, allow_negative_numbers = true)]
    mean_demand: f64,

    #[arg(long, default_value_t = 50.0, allow_negative_numbers = true)]
    demand_std_dev: f64,

    #[arg(long, default_value_t = 7.0)]
    min_lead_time: f64,

    #[arg(long, default_value_t = 13.0)]
    max_lead_time: f64,

    #[arg(long, default_value_t = 365.0)]
    horizon_days: f64,

    #[arg(long, default_value_t = 100)]
    replications: usize,

    /// What happens to demand that cannot be met from stock.
    #[arg(long, value_enum, default_value_t = FulfillmentKind::LostSales)]
    policy: FulfillmentKind,

    /// Replication i is seeded with SEED + i.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Worker threads (defaults to one per core).
    #[arg(long)]
    threads: Option<usize>,

    /// Write one CSV row per successful replication.
    #[arg(long)]
    results: Option<PathBuf>,

    /// Write one CSV row per failed replication.
    #[arg(long)]
    failures: Option<PathBuf>,

    /// Write the day-by-day inventory profile of one replication.
    #[arg(long)]
    trace: Option<PathBuf>,

    /// Write every replenishment delivered in the traced replication.
    #[arg(long)]
    deliveries: Option<PathBuf>,

    /// Replication to trace; must be below --replications.
    #[arg(long, default_value_t = 0)]
    trace_replication: usize,
}

impl Args {
    fn to_config(&self) -> SimulationConfig {
        SimulationConfig {
            initial_inventory: self.initial_inventory,
            reorder_point: self.reorder_point,
            reorder_quantity: self.reorder_quantity,
            mean_demand: self.mean_demand,
            demand_std_dev: self.demand_std_dev,
            min_lead_time: self.min_lead_time,
            max_lead_time: self.max_lead_time,
            horizon_days: self.horizon_days,
            replications: self.replications,
            fulfillment: self.policy,
            base_seed: self.seed,
        }
    }
}

/// Re-runs one replication with tracing on and writes its trace and
/// deliveries.
///
/// A replication whose service level is undefined still has a trace worth
/// keeping, so that failure is logged rather than returned.
fn export_traced_replication(
    driver: &ReplicationDriver,
    index: usize,
    trace_path: Option<&Path>,
    deliveries_path: Option<&Path>,
) -> SimResult<()> {
    let run = Replication::seeded(driver.config(), index, driver.seed_for(index))
        .with_trace()
        .run();
    if let Err(e) = &run.outcome {
        warn!("traced replication {index} has no service level: {e}");
    }
    if let Some(path) = trace_path {
        reporting::write_period_trace(path, &run.trace)?;
    }
    if let Some(path) = deliveries_path {
        reporting::write_deliveries(path, &run.deliveries)?;
    }
    Ok(())
}

fn run(args: Args) -> SimResult<()> {
    // 1. SETUP CONFIGURATION
    let mut driver = ReplicationDriver::new(args.to_config())?;
    if let Some(threads) = args.threads {
        driver = driver.with_threads(threads);
    }
    let traced = args.trace.is_some() || args.deliveries.is_some();
    if traced && args.trace_replication >= args.replications {
        return Err(SimError::invalid(
            "trace_replication",
            args.trace_replication as f64,
            "must be below replications",
        ));
    }

    // 2. RUN REPLICATIONS
    let report = driver.run()?;

    // 3. EXPORT RESULTS
    if let Some(path) = &args.results {
        reporting::write_replication_outcomes(path, &report.outcomes)?;
    }
    if let Some(path) = &args.failures {
        reporting::write_replication_failures(path, &report.failures)?;
    }
    if traced {
        export_traced_replication(
            &driver,
            args.trace_replication,
            args.trace.as_deref(),
            args.deliveries.as_deref(),
        )?;
    }

    // 4. PRINT SUMMARY
    let summary = report.summary()?;
    print!("{}", reporting::format_summary(&report, &summary));
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
