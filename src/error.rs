// src/error.rs

use thiserror::Error;

/// Result alias used across the simulator.
pub type SimResult<T> = Result<T, SimError>;

#[derive(Debug, Error)]
pub enum SimError {
    /// A configuration value is outside its valid domain.
    /// Raised before any replication starts.
    #[error("invalid parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// Service level is undefined because the replication saw no net demand.
    #[error("replication {replication}: service level undefined (total demand = {total_demand})")]
    UndefinedServiceLevel {
        replication: usize,
        total_demand: f64,
    },

    /// Every replication in the batch failed, so there is nothing to summarise.
    #[error("all {failed} replications failed; no service level to summarise")]
    NoSuccessfulReplications { failed: usize },

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SimError {
    pub fn invalid(name: &'static str, value: f64, reason: &'static str) -> Self {
        Self::InvalidParameter {
            name,
            value,
            reason,
        }
    }
}
