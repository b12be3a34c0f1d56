// src/model/facility.rs

use crate::error::{SimError, SimResult};
use crate::model::sampler::Sampler;
use crate::simulation::config::{FulfillmentKind, SimulationConfig};
use crate::strategy::implementations::policy_for;
use crate::strategy::traits::{FulfillmentPolicy, FulfillmentTotals};

/// What one demand review did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReviewOutcome {
    pub demand: f64,
    pub shipment: f64,
    /// Quantity of the order placed this review, if any.
    pub order_quantity: Option<f64>,
}

/// A single stocking location run under a reorder-point / reorder-quantity
/// policy.
///
/// `inventory_position` moves only when demand is served (down by the
/// shipped quantity) and when an order is placed (up by ROQ). Deliveries
/// touch on-hand stock alone.
#[derive(Debug)]
pub struct StockingFacility {
    // State Variables
    on_hand: f64,
    inventory_position: f64,

    // Policy
    reorder_quantity: f64,
    reorder_threshold: f64,
    mean_demand: f64,
    demand_std_dev: f64,
    policy: Box<dyn FulfillmentPolicy>,

    // Accumulators
    total_demand: f64,
    orders_placed: usize,
    orders_received: usize,
    negative_demand_draws: usize,

    // Tracking for the period trace
    received_since_review: f64,
}

impl StockingFacility {
    pub fn new(config: &SimulationConfig) -> Self {
        Self::with_policy(config, policy_for(config.fulfillment))
    }

    pub fn with_policy(config: &SimulationConfig, policy: Box<dyn FulfillmentPolicy>) -> Self {
        Self {
            on_hand: config.initial_inventory,
            inventory_position: config.initial_inventory,
            reorder_quantity: config.reorder_quantity,
            reorder_threshold: config.reorder_threshold(),
            mean_demand: config.mean_demand,
            demand_std_dev: config.demand_std_dev,
            policy,
            total_demand: 0.0,
            orders_placed: 0,
            orders_received: 0,
            negative_demand_draws: 0,
            received_since_review: 0.0,
        }
    }

    /// Periodic review: draws the period's demand and handles it.
    pub fn review<S: Sampler + ?Sized>(&mut self, sampler: &mut S) -> ReviewOutcome {
        let demand = sampler.normal(self.mean_demand, self.demand_std_dev);
        self.handle_demand(demand)
    }

    /// Serves `demand`, then checks the reorder trigger.
    ///
    /// Negative demand is kept as drawn: it raises stock and lowers
    /// `total_demand`. Such draws are counted, not clamped.
    pub fn handle_demand(&mut self, demand: f64) -> ReviewOutcome {
        if demand < 0.0 {
            self.negative_demand_draws += 1;
        }
        self.total_demand += demand;

        let shipment = self.policy.ship(demand, self.on_hand);
        self.on_hand -= shipment;
        self.inventory_position -= shipment;
        self.received_since_review = 0.0;

        let order_quantity = if self.inventory_position <= self.reorder_threshold {
            self.inventory_position += self.reorder_quantity;
            self.orders_placed += 1;
            Some(self.reorder_quantity)
        } else {
            None
        };

        ReviewOutcome {
            demand,
            shipment,
            order_quantity,
        }
    }

    /// A replenishment has arrived.
    pub fn receive(&mut self, quantity: f64) {
        self.on_hand += quantity;
        self.orders_received += 1;
        self.received_since_review += quantity;
    }

    /// Service level over everything seen so far.
    ///
    /// Fails when total demand is not positive, since the ratio has no
    /// meaning there.
    pub fn service_level(&self, replication: usize) -> SimResult<f64> {
        let undefined = || SimError::UndefinedServiceLevel {
            replication,
            total_demand: self.total_demand,
        };
        if self.total_demand <= 0.0 {
            return Err(undefined());
        }
        let level = self.policy.service_level(self.total_demand);
        if level.is_finite() {
            Ok(level)
        } else {
            Err(undefined())
        }
    }

    pub fn on_hand(&self) -> f64 {
        self.on_hand
    }

    pub fn inventory_position(&self) -> f64 {
        self.inventory_position
    }

    pub fn total_demand(&self) -> f64 {
        self.total_demand
    }

    pub fn orders_placed(&self) -> usize {
        self.orders_placed
    }

    pub fn orders_received(&self) -> usize {
        self.orders_received
    }

    pub fn negative_demand_draws(&self) -> usize {
        self.negative_demand_draws
    }

    /// Quantity delivered since the last review ran.
    pub fn received_since_review(&self) -> f64 {
        self.received_since_review
    }

    pub fn fulfillment(&self) -> FulfillmentKind {
        self.policy.kind()
    }

    pub fn totals(&self) -> FulfillmentTotals {
        self.policy.totals()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::sampler::ScriptedSampler;

    fn facility(kind: FulfillmentKind, initial: f64) -> StockingFacility {
        let config = SimulationConfig {
            initial_inventory: initial,
            fulfillment: kind,
            ..Default::default()
        };
        StockingFacility::new(&config)
    }

    #[test]
    fn starts_with_position_equal_to_on_hand() {
        let f = facility(FulfillmentKind::LostSales, 7000.0);
        assert_eq!(f.on_hand(), 7000.0);
        assert_eq!(f.inventory_position(), 7000.0);
        assert_eq!(f.orders_placed(), 0);
    }

    #[test]
    fn review_pulls_demand_from_sampler() {
        let mut f = facility(FulfillmentKind::LostSales, 7000.0);
        let mut sampler = ScriptedSampler::new(&[480.0], &[]);
        let outcome = f.review(&mut sampler);
        assert_eq!(sampler.normal_calls, 1);
        assert_eq!(outcome.demand, 480.0);
        assert_eq!(outcome.shipment, 480.0);
        assert_eq!(f.on_hand(), 6520.0);
        assert_eq!(f.inventory_position(), 6520.0);
    }

    #[test]
    fn reorders_once_position_reaches_threshold() {
        let mut f = facility(FulfillmentKind::LostSales, 7000.0);
        // 7000 -> 6000 -> 5100: above 5050, no order yet.
        assert_eq!(f.handle_demand(1000.0).order_quantity, None);
        assert_eq!(f.handle_demand(900.0).order_quantity, None);
        // 5100 -> 5050: exactly on the slackened threshold.
        let outcome = f.handle_demand(50.0);
        assert_eq!(outcome.order_quantity, Some(2000.0));
        assert_eq!(f.inventory_position(), 7050.0);
        assert_eq!(f.on_hand(), 5050.0);
        assert_eq!(f.orders_placed(), 1);
    }

    #[test]
    fn one_order_per_breach() {
        let mut f = facility(FulfillmentKind::LostSales, 5000.0);
        // Position 4000 after demand: one order lifts it to 6000.
        let outcome = f.handle_demand(1000.0);
        assert_eq!(outcome.order_quantity, Some(2000.0));
        assert_eq!(f.inventory_position(), 6000.0);
        assert_eq!(f.orders_placed(), 1);
        // Next review is above the threshold, so no new order.
        assert_eq!(f.handle_demand(100.0).order_quantity, None);
    }

    #[test]
    fn arrival_does_not_move_position() {
        let mut f = facility(FulfillmentKind::LostSales, 5000.0);
        f.handle_demand(1000.0);
        let position = f.inventory_position();
        f.receive(2000.0);
        assert_eq!(f.inventory_position(), position);
        assert_eq!(f.on_hand(), 6000.0);
        assert_eq!(f.orders_received(), 1);
        assert_eq!(f.received_since_review(), 2000.0);
    }

    #[test]
    fn lost_sales_never_drives_stock_negative() {
        let mut f = facility(FulfillmentKind::LostSales, 300.0);
        let outcome = f.handle_demand(500.0);
        assert_eq!(outcome.shipment, 300.0);
        assert_eq!(f.on_hand(), 0.0);
        assert!((f.service_level(0).unwrap() - 0.6).abs() < 1e-12);
    }

    #[test]
    fn backorder_service_level_counts_late_sales() {
        let mut f = facility(FulfillmentKind::Backorder, 300.0);
        f.handle_demand(500.0); // 200 late
        f.receive(2000.0);
        let outcome = f.handle_demand(500.0); // ships 500 + 200 backlog
        assert_eq!(outcome.shipment, 700.0);
        assert_eq!(f.totals().total_late_sales, 200.0);
        assert!((f.service_level(0).unwrap() - 0.8).abs() < 1e-12);
    }

    #[test]
    fn negative_demand_is_kept_and_counted() {
        let mut f = facility(FulfillmentKind::LostSales, 1000.0);
        let outcome = f.handle_demand(-40.0);
        assert_eq!(outcome.shipment, -40.0);
        assert_eq!(f.on_hand(), 1040.0);
        assert_eq!(f.total_demand(), -40.0);
        assert_eq!(f.negative_demand_draws(), 1);
    }

    #[test]
    fn zero_demand_leaves_service_level_undefined() {
        let mut f = facility(FulfillmentKind::LostSales, 1000.0);
        f.handle_demand(0.0);
        match f.service_level(3) {
            Err(SimError::UndefinedServiceLevel {
                replication,
                total_demand,
            }) => {
                assert_eq!(replication, 3);
                assert_eq!(total_demand, 0.0);
            }
            other => panic!("expected undefined service level, got {other:?}"),
        }
    }
}
