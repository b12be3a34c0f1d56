// src/simulation/engine.rs

use crate::error::SimResult;
use crate::model::facility::StockingFacility;
use crate::model::orders::{Delivery, OrderBook, OrderId, ReplenishmentOrder};
use crate::model::sampler::{Sampler, SeededSampler};
use crate::simulation::config::{FulfillmentKind, SimulationConfig, REVIEW_PERIOD};
use crate::simulation::scheduler::EventScheduler;
use log::{debug, trace};
use serde::Serialize;

/// Events on a replication's clock.
#[derive(Debug, Clone, Copy, PartialEq)]
enum InventoryEvent {
    Review,
    Arrival(OrderId),
}

/// One row of the per-period trace.
#[derive(Debug, Clone, Serialize)]
pub struct PeriodRecord {
    pub replication: usize,
    pub day: f64,
    pub demand: f64,
    pub shipped: f64,
    pub received: f64,
    pub on_hand: f64,
    pub inventory_position: f64,
    pub on_order: f64,
    pub order_placed: f64,
}

/// Scalar results of one replication, flat so it can go straight to CSV.
#[derive(Debug, Clone, Serialize)]
pub struct ReplicationOutcome {
    pub replication: usize,
    pub seed: u64,
    pub fulfillment: FulfillmentKind,
    pub service_level: f64,
    pub total_demand: f64,
    pub total_shipped: f64,
    pub total_backorder: f64,
    pub total_late_sales: f64,
    pub orders_placed: usize,
    pub orders_received: usize,
    pub orders_outstanding: usize,
    pub negative_demand_draws: usize,
    pub final_on_hand: f64,
    pub final_inventory_position: f64,
}

/// Everything a finished replication produced.
///
/// The deliveries and trace are kept even when the outcome is an error,
/// so a replication with an undefined service level can still be inspected.
#[derive(Debug)]
pub struct ReplicationRun {
    pub outcome: SimResult<ReplicationOutcome>,
    pub deliveries: Vec<Delivery>,
    /// Filled only when tracing was requested.
    pub trace: Vec<PeriodRecord>,
}

/// A single replication: one facility, one order book, one random stream.
pub struct Replication<S: Sampler> {
    index: usize,
    seed: u64,
    horizon: f64,
    min_lead_time: f64,
    max_lead_time: f64,
    facility: StockingFacility,
    orders: OrderBook,
    sampler: S,
    deliveries: Vec<Delivery>,
    trace: Option<Vec<PeriodRecord>>,
}

impl Replication<SeededSampler> {
    /// Replication `index` seeded with `seed`.
    pub fn seeded(config: &SimulationConfig, index: usize, seed: u64) -> Self {
        Self::new(config, index, seed, SeededSampler::new(seed))
    }
}

impl<S: Sampler> Replication<S> {
    pub fn new(config: &SimulationConfig, index: usize, seed: u64, sampler: S) -> Self {
        Self {
            index,
            seed,
            horizon: config.horizon_days,
            min_lead_time: config.min_lead_time,
            max_lead_time: config.max_lead_time,
            facility: StockingFacility::new(config),
            orders: OrderBook::new(),
            sampler,
            deliveries: Vec::new(),
            trace: None,
        }
    }

    /// Record a [`PeriodRecord`] for every review.
    pub fn with_trace(mut self) -> Self {
        self.trace = Some(Vec::new());
        self
    }

    /// Runs the facility to the horizon and reads its service level.
    ///
    /// The clock always reaches the horizon. Only the outcome can fail.
    pub fn run(mut self) -> ReplicationRun {
        let mut scheduler = EventScheduler::new();
        scheduler.schedule(REVIEW_PERIOD, InventoryEvent::Review);

        let dispatched = scheduler.run(self.horizon, |scheduler, event| match event {
            InventoryEvent::Review => self.on_review(scheduler),
            InventoryEvent::Arrival(id) => self.on_arrival(scheduler.now(), id),
        });

        debug!(
            "replication {}: {} events dispatched ({} total), {} orders placed, {} left pending at t={}",
            self.index,
            dispatched,
            scheduler.dispatched(),
            self.facility.orders_placed(),
            scheduler.pending(),
            scheduler.now()
        );

        let totals = self.facility.totals();
        let outcome = self
            .facility
            .service_level(self.index)
            .map(|service_level| ReplicationOutcome {
                replication: self.index,
                seed: self.seed,
                fulfillment: self.facility.fulfillment(),
                service_level,
                total_demand: self.facility.total_demand(),
                total_shipped: totals.total_shipped,
                total_backorder: totals.total_backorder,
                total_late_sales: totals.total_late_sales,
                orders_placed: self.facility.orders_placed(),
                orders_received: self.facility.orders_received(),
                orders_outstanding: self.orders.outstanding(),
                negative_demand_draws: self.facility.negative_demand_draws(),
                final_on_hand: self.facility.on_hand(),
                final_inventory_position: self.facility.inventory_position(),
            });

        ReplicationRun {
            outcome,
            deliveries: self.deliveries,
            trace: self.trace.unwrap_or_default(),
        }
    }

    fn on_review(&mut self, scheduler: &mut EventScheduler<InventoryEvent>) {
        let now = scheduler.now();
        let received = self.facility.received_since_review();
        let outcome = self.facility.review(&mut self.sampler);

        // The next review is queued ahead of the new order's arrival, so a
        // review and an arrival landing on the same instant keep that order.
        scheduler.schedule(REVIEW_PERIOD, InventoryEvent::Review);

        if let Some(quantity) = outcome.order_quantity {
            let order = ReplenishmentOrder::place(
                quantity,
                now,
                &mut self.sampler,
                self.min_lead_time,
                self.max_lead_time,
            );
            debug!(
                "replication {} t={}: position {:.1} -> ordered {} due t={}",
                self.index,
                now,
                self.facility.inventory_position() - quantity,
                quantity,
                order.due_at()
            );
            let lead_time = order.lead_time;
            let id = self.orders.insert(order);
            scheduler.schedule(lead_time, InventoryEvent::Arrival(id));
        }

        if let Some(trace) = self.trace.as_mut() {
            trace.push(PeriodRecord {
                replication: self.index,
                day: now,
                demand: outcome.demand,
                shipped: outcome.shipment,
                received,
                on_hand: self.facility.on_hand(),
                inventory_position: self.facility.inventory_position(),
                on_order: self.orders.on_order(),
                order_placed: outcome.order_quantity.unwrap_or(0.0),
            });
        }
    }

    fn on_arrival(&mut self, now: f64, id: OrderId) {
        let Some(order) = self.orders.take(id) else {
            return;
        };
        self.facility.receive(order.quantity);
        let delivery = Delivery {
            quantity: order.quantity,
            placed_at: order.placed_at,
            arrived_at: now,
        };
        trace!(
            "replication {} t={}: received {} after {} days",
            self.index,
            now,
            delivery.quantity,
            delivery.realized_lead_time()
        );
        self.deliveries.push(delivery);
    }
}

/// Runs replication `index` on its own seeded stream.
pub fn run_replication(
    config: &SimulationConfig,
    index: usize,
    seed: u64,
) -> SimResult<ReplicationOutcome> {
    Replication::seeded(config, index, seed).run().outcome
}
