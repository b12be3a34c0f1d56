// src/simulation/config.rs

use crate::error::{SimError, SimResult};
use clap::ValueEnum;
use serde::Serialize;

/// Time between two demand reviews. Fixed for every run.
pub const REVIEW_PERIOD: f64 = 1.0;

/// Slack applied to the reorder point so that a position sitting on the
/// threshold after float accumulation still triggers an order.
pub const REORDER_SLACK: f64 = 1.01;

/// What happens to demand that cannot be met from stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FulfillmentKind {
    /// Unmet demand is gone for good.
    LostSales,
    /// Unmet demand is carried and served once stock arrives.
    Backorder,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimulationConfig {
    pub initial_inventory: f64,
    pub reorder_point: f64,
    pub reorder_quantity: f64,
    pub mean_demand: f64,
    pub demand_std_dev: f64,
    pub min_lead_time: f64,
    pub max_lead_time: f64,
    pub horizon_days: f64,
    pub replications: usize,
    pub fulfillment: FulfillmentKind,
    /// Replication `i` is seeded with `base_seed + i`.
    pub base_seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            initial_inventory: 7000.0, // ROP + ROQ
            reorder_point: 5000.0,
            reorder_quantity: 2000.0,
            mean_demand: 500.0,
            demand_std_dev: 50.0,
            min_lead_time: 7.0,
            max_lead_time: 13.0,
            horizon_days: 365.0,
            replications: 100,
            fulfillment: FulfillmentKind::LostSales,
            base_seed: 0,
        }
    }
}

impl SimulationConfig {
    /// Rejects parameter sets that would make a run meaningless.
    ///
    /// Called once by the replication driver, never mid-run.
    pub fn validate(&self) -> SimResult<()> {
        let finite = [
            ("initial_inventory", self.initial_inventory),
            ("reorder_point", self.reorder_point),
            ("reorder_quantity", self.reorder_quantity),
            ("mean_demand", self.mean_demand),
            ("demand_std_dev", self.demand_std_dev),
            ("min_lead_time", self.min_lead_time),
            ("max_lead_time", self.max_lead_time),
            ("horizon_days", self.horizon_days),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(SimError::invalid(name, value, "must be finite"));
            }
        }

        if self.demand_std_dev <= 0.0 {
            return Err(SimError::invalid(
                "demand_std_dev",
                self.demand_std_dev,
                "must be positive",
            ));
        }
        if self.reorder_quantity < 0.0 {
            return Err(SimError::invalid(
                "reorder_quantity",
                self.reorder_quantity,
                "must not be negative",
            ));
        }
        if self.initial_inventory < 0.0 {
            return Err(SimError::invalid(
                "initial_inventory",
                self.initial_inventory,
                "must not be negative",
            ));
        }
        if self.min_lead_time < 0.0 {
            return Err(SimError::invalid(
                "min_lead_time",
                self.min_lead_time,
                "must not be negative",
            ));
        }
        if self.max_lead_time < self.min_lead_time {
            return Err(SimError::invalid(
                "max_lead_time",
                self.max_lead_time,
                "must be at least min_lead_time",
            ));
        }
        if self.horizon_days <= 0.0 {
            return Err(SimError::invalid(
                "horizon_days",
                self.horizon_days,
                "must be positive",
            ));
        }
        if self.replications == 0 {
            return Err(SimError::invalid(
                "replications",
                0.0,
                "at least one replication is required",
            ));
        }
        Ok(())
    }

    /// Threshold the inventory position is compared against at each review.
    pub fn reorder_threshold(&self) -> f64 {
        REORDER_SLACK * self.reorder_point
    }
}
