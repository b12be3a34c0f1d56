// src/simulation/scheduler.rs

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// An event waiting in the queue, keyed by (time, insertion order).
#[derive(Debug)]
struct ScheduledEvent<E> {
    time: f64,
    sequence: u64,
    event: E,
}

impl<E> PartialEq for ScheduledEvent<E> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<E> Eq for ScheduledEvent<E> {}

impl<E> PartialOrd for ScheduledEvent<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<E> Ord for ScheduledEvent<E> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.time
            .total_cmp(&other.time)
            .then_with(|| self.sequence.cmp(&other.sequence))
    }
}

/// Single-clock discrete-event queue.
///
/// Events scheduled for the same instant are dispatched first-scheduled,
/// first-run. Dispatch times never decrease.
#[derive(Debug)]
pub struct EventScheduler<E> {
    queue: BinaryHeap<Reverse<ScheduledEvent<E>>>,
    sequence: u64,
    now: f64,
    dispatched: u64,
}

impl<E> Default for EventScheduler<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> EventScheduler<E> {
    pub fn new() -> Self {
        Self {
            queue: BinaryHeap::new(),
            sequence: 0,
            now: 0.0,
            dispatched: 0,
        }
    }

    /// Current simulation time.
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Number of events dispatched so far.
    pub fn dispatched(&self) -> u64 {
        self.dispatched
    }

    /// Number of events still pending.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn next_event_time(&self) -> Option<f64> {
        self.queue.peek().map(|Reverse(e)| e.time)
    }

    /// Schedule `event` to fire `delay` time units from now.
    ///
    /// Negative delays are treated as zero so the clock cannot run backwards.
    pub fn schedule(&mut self, delay: f64, event: E) {
        debug_assert!(delay >= 0.0, "negative delay {delay}");
        let time = self.now + delay.max(0.0);
        let sequence = self.sequence;
        self.sequence += 1;
        self.queue.push(Reverse(ScheduledEvent {
            time,
            sequence,
            event,
        }));
    }

    /// Dispatch events in order until the earliest pending one lies past
    /// `until`. Events at exactly `until` still run. Anything a handler
    /// schedules beyond the horizon stays pending and is never dispatched.
    ///
    /// Returns the number of events dispatched by this call.
    pub fn run<F>(&mut self, until: f64, mut handler: F) -> u64
    where
        F: FnMut(&mut Self, E),
    {
        let start = self.dispatched;
        while let Some(time) = self.next_event_time() {
            if time > until {
                break;
            }
            let Some(Reverse(next)) = self.queue.pop() else {
                break;
            };
            self.now = next.time;
            self.dispatched += 1;
            handler(self, next.event);
        }
        self.dispatched - start
    }
}
