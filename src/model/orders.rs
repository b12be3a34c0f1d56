// src/model/orders.rs

use crate::model::sampler::Sampler;
use serde::Serialize;

/// Handle to an order held in an [`OrderBook`].
///
/// The scheduler carries only this id; the order itself stays in the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OrderId(usize);

/// Lead time drawn from Uniform(`min`, `max`) and truncated toward zero.
pub fn sample_lead_time<S: Sampler + ?Sized>(sampler: &mut S, min: f64, max: f64) -> f64 {
    sampler.uniform(min, max).trunc()
}

/// One outstanding replenishment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReplenishmentOrder {
    pub quantity: f64,
    pub placed_at: f64,
    pub lead_time: f64,
}

impl ReplenishmentOrder {
    /// Creates an order and draws its lead time.
    pub fn place<S: Sampler + ?Sized>(
        quantity: f64,
        placed_at: f64,
        sampler: &mut S,
        min_lead_time: f64,
        max_lead_time: f64,
    ) -> Self {
        Self {
            quantity,
            placed_at,
            lead_time: sample_lead_time(sampler, min_lead_time, max_lead_time),
        }
    }

    pub fn due_at(&self) -> f64 {
        self.placed_at + self.lead_time
    }
}

/// Record of a delivered order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Delivery {
    pub quantity: f64,
    pub placed_at: f64,
    pub arrived_at: f64,
}

impl Delivery {
    /// Time between placement and arrival.
    pub fn realized_lead_time(&self) -> f64 {
        self.arrived_at - self.placed_at
    }
}

/// Slot arena of outstanding orders. Freed slots are reused.
#[derive(Debug, Default)]
pub struct OrderBook {
    slots: Vec<Option<ReplenishmentOrder>>,
    free: Vec<usize>,
    outstanding: usize,
    on_order: f64,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, order: ReplenishmentOrder) -> OrderId {
        self.outstanding += 1;
        self.on_order += order.quantity;
        match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(order);
                OrderId(slot)
            }
            None => {
                self.slots.push(Some(order));
                OrderId(self.slots.len() - 1)
            }
        }
    }

    /// Removes the order for delivery. `None` if it was already delivered.
    pub fn take(&mut self, id: OrderId) -> Option<ReplenishmentOrder> {
        let order = self.slots.get_mut(id.0)?.take()?;
        self.free.push(id.0);
        self.outstanding -= 1;
        self.on_order -= order.quantity;
        Some(order)
    }

    /// Number of orders placed but not yet delivered.
    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    /// Total quantity placed but not yet delivered.
    pub fn on_order(&self) -> f64 {
        self.on_order
    }
}
