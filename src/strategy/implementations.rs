// src/strategy/implementations.rs

use crate::simulation::config::FulfillmentKind;
use crate::strategy::traits::{FulfillmentPolicy, FulfillmentTotals};

/// Builds the discipline selected in the configuration.
pub fn policy_for(kind: FulfillmentKind) -> Box<dyn FulfillmentPolicy> {
    match kind {
        FulfillmentKind::LostSales => Box::new(LostSales::new()),
        FulfillmentKind::Backorder => Box::new(Backorder::new()),
    }
}

// =========================================================================
// 1. Lost Sales
// =========================================================================

/// Ships what is on the shelf; the rest of the demand walks away.
///
/// Service level = shipped / demanded.
#[derive(Debug, Clone, Default)]
pub struct LostSales {
    total_shipped: f64,
}

impl LostSales {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FulfillmentPolicy for LostSales {
    fn kind(&self) -> FulfillmentKind {
        FulfillmentKind::LostSales
    }

    fn ship(&mut self, demand: f64, on_hand: f64) -> f64 {
        let shipment = demand.min(on_hand);
        self.total_shipped += shipment;
        shipment
    }

    fn service_level(&self, total_demand: f64) -> f64 {
        self.total_shipped / total_demand
    }

    fn totals(&self) -> FulfillmentTotals {
        FulfillmentTotals {
            total_shipped: self.total_shipped,
            ..Default::default()
        }
    }
}

// =========================================================================
// 2. Backorder
// =========================================================================

/// Carries unmet demand forward and serves it before anything else.
///
/// `total_backorder` is the open backlog. A period that ships more than it
/// was asked for (clearing old backlog) books a negative backorder, which
/// shrinks the backlog but never reduces `total_late_sales`.
///
/// Service level = 1 - late / demanded.
#[derive(Debug, Clone, Default)]
pub struct Backorder {
    total_shipped: f64,
    total_backorder: f64,
    total_late_sales: f64,
}

impl Backorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Demand still waiting for stock.
    pub fn open_backlog(&self) -> f64 {
        self.total_backorder
    }
}

impl FulfillmentPolicy for Backorder {
    fn kind(&self) -> FulfillmentKind {
        FulfillmentKind::Backorder
    }

    fn ship(&mut self, demand: f64, on_hand: f64) -> f64 {
        let shipment = (demand + self.total_backorder).min(on_hand);
        let backorder = demand - shipment;
        self.total_shipped += shipment;
        self.total_backorder += backorder;
        self.total_late_sales += backorder.max(0.0);
        shipment
    }

    fn service_level(&self, total_demand: f64) -> f64 {
        1.0 - self.total_late_sales / total_demand
    }

    fn totals(&self) -> FulfillmentTotals {
        FulfillmentTotals {
            total_shipped: self.total_shipped,
            total_backorder: self.open_backlog(),
            total_late_sales: self.total_late_sales,
        }
    }
}
