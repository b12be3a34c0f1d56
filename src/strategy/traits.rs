// src/strategy/traits.rs

use crate::simulation::config::FulfillmentKind;
use serde::Serialize;
use std::fmt::Debug;

/// Running totals a fulfillment discipline keeps for one replication.
///
/// Fields a discipline has no use for stay at zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct FulfillmentTotals {
    pub total_shipped: f64,
    pub total_backorder: f64,
    pub total_late_sales: f64,
}

/// Decides how much of a period's demand leaves the shelf and keeps the
/// bookkeeping its service-level formula needs.
///
/// `Send` lets a facility move into a worker thread with its replication.
pub trait FulfillmentPolicy: Debug + Send {
    fn kind(&self) -> FulfillmentKind;

    /// Handles one period's demand against the stock on the shelf.
    ///
    /// # Arguments
    /// * `demand` - Demand drawn for this review; may be negative.
    /// * `on_hand` - Stock on hand before anything ships.
    ///
    /// # Returns
    /// The quantity shipped. The caller removes it from both on-hand and
    /// inventory position.
    fn ship(&mut self, demand: f64, on_hand: f64) -> f64;

    /// Service level over the whole run.
    ///
    /// # Arguments
    /// * `total_demand` - Sum of every demand drawn in the replication.
    ///   The caller must rule out values `<= 0` first.
    fn service_level(&self, total_demand: f64) -> f64;

    fn totals(&self) -> FulfillmentTotals;
}
