// src/io/reporting.rs

use crate::error::SimResult;
use crate::model::orders::Delivery;
use crate::simulation::driver::{BatchReport, ReplicationFailure};
use crate::simulation::engine::{PeriodRecord, ReplicationOutcome};
use crate::simulation::statistics::ServiceLevelSummary;
use log::info;
use serde::Serialize;
use std::path::Path;

/// Writes any serializable rows to a CSV file with a header line.
///
/// # Arguments
/// * `file_path` - The path to save the file (e.g., "results/outcomes.csv").
/// * `data` - The rows to write, one CSV record each.
fn write_records<T: Serialize>(file_path: &Path, data: &[T]) -> SimResult<()> {
    let mut wtr = csv::Writer::from_path(file_path)?;
    for record in data {
        wtr.serialize(record)?;
    }
    wtr.flush()?;

    info!(
        "exported {} rows to '{}'",
        data.len(),
        file_path.display()
    );
    Ok(())
}

/// Writes one row per successful replication.
///
/// # Arguments
/// * `file_path` - Destination CSV file.
/// * `data` - Outcomes from the batch report, in replication order.
pub fn write_replication_outcomes(file_path: &Path, data: &[ReplicationOutcome]) -> SimResult<()> {
    write_records(file_path, data)
}

/// Writes one row per failed replication.
///
/// # Arguments
/// * `file_path` - Destination CSV file.
/// * `data` - Failures from the batch report, with the error text as `reason`.
pub fn write_replication_failures(file_path: &Path, data: &[ReplicationFailure]) -> SimResult<()> {
    write_records(file_path, data)
}

/// Writes the per-period inventory profile of a traced replication.
///
/// # Arguments
/// * `file_path` - Destination CSV file.
/// * `data` - One record per review, as collected by `Replication::with_trace`.
pub fn write_period_trace(file_path: &Path, data: &[PeriodRecord]) -> SimResult<()> {
    write_records(file_path, data)
}

/// Writes every replenishment that arrived within the horizon.
///
/// # Arguments
/// * `file_path` - Destination CSV file.
/// * `data` - Deliveries of one replication, in arrival order.
pub fn write_deliveries(file_path: &Path, data: &[Delivery]) -> SimResult<()> {
    write_records(file_path, data)
}

/// Formats the batch summary printed at the end of a run.
///
/// # Arguments
/// * `report` - The batch, used for the failure count and negative-demand note.
/// * `summary` - Statistics over the successful replications.
pub fn format_summary(report: &BatchReport, summary: &ServiceLevelSummary) -> String {
    let mut out = String::new();
    out.push_str(&format!("Avg. service level: {:.6}\n", summary.mean));
    out.push_str(&format!(
        "Service level standard deviation: {:.6}\n",
        summary.std_dev
    ));
    out.push_str(&format!(
        "95% CI of mean: [{:.6}, {:.6}] (sample std {:.6})\n",
        summary.ci_low, summary.ci_high, summary.sample_std_dev
    ));
    out.push_str(&format!(
        "Range: [{:.6}, {:.6}] over {} replications\n",
        summary.min, summary.max, summary.count
    ));
    out.push_str(&format!("Failed replications: {}\n", report.failures.len()));

    let negative: usize = report
        .outcomes
        .iter()
        .map(|o| o.negative_demand_draws)
        .sum();
    if negative > 0 {
        out.push_str(&format!(
            "Note: {negative} negative demand draws were kept unclamped\n"
        ));
    }
    out
}
