use crate::models::cart::MAX_TICKETS_PER_EVENT;
use crate::models::event::{Availability, Event};

/// Source of the availability attached to events after retrieval.
///
/// The Discovery API does not expose inventory, so the storefront estimates
/// it. Swap the implementation once a real inventory signal exists.
pub trait AvailabilityEstimator: Send + Sync {
    fn estimate(&self, event: &Event) -> Availability;
}

/// Attach an estimate unless the event already carries one.
/// Applying it twice never changes the first result.
pub fn enrich(event: &mut Event, estimator: &dyn AvailabilityEstimator) {
    if event.availability.is_none() {
        event.availability = Some(estimator.estimate(event));
    }
}

/// Uniformly random availability in `1..=limit` for events on sale,
/// sold out for cancelled or off-sale ones.
#[derive(Debug, Clone, Copy)]
pub struct RandomAvailability {
    limit: u32,
}

impl RandomAvailability {
    pub fn new(limit: u32) -> Self {
        Self { limit }
    }

    fn draw(&self) -> u32 {
        if self.limit == 0 {
            return 0;
        }
        let mut buf = [0u8; 4];
        // A failed entropy read degrades to the full limit rather than sold out.
        if getrandom::getrandom(&mut buf).is_err() {
            return self.limit;
        }
        u32::from_le_bytes(buf) % self.limit + 1
    }
}

impl Default for RandomAvailability {
    fn default() -> Self {
        Self::new(MAX_TICKETS_PER_EVENT)
    }
}

impl AvailabilityEstimator for RandomAvailability {
    fn estimate(&self, event: &Event) -> Availability {
        if !event.is_on_sale() {
            return Availability::sold_out(self.limit);
        }
        Availability::from_counts(self.limit, self.draw())
    }
}

/// Same count for every event on sale. Deterministic; used by tests and demos.
#[derive(Debug, Clone, Copy)]
pub struct FixedAvailability {
    limit: u32,
    available: u32,
}

impl FixedAvailability {
    pub fn new(limit: u32, available: u32) -> Self {
        Self { limit, available }
    }
}

impl AvailabilityEstimator for FixedAvailability {
    fn estimate(&self, event: &Event) -> Availability {
        if !event.is_on_sale() {
            return Availability::sold_out(self.limit);
        }
        Availability::from_counts(self.limit, self.available)
    }
}
