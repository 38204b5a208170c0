use crate::errors::CoreError;
use crate::models::cart::{CartAction, CartItem, CartState, SelectedPrice, MAX_TICKETS_PER_EVENT};
use crate::models::event::Event;

/// Pure cart transition: `(state, action) → state'`.
///
/// | action               | effect                                                          |
/// |----------------------|-----------------------------------------------------------------|
/// | `AddItem`            | merge into an existing line (sum, clamp to *its* ceiling) or append |
/// | `RemoveItem`         | drop the line; unknown id is a no-op                            |
/// | `UpdateQuantity`     | set to `min(requested, ceiling)`; no floor is enforced          |
/// | `UpdateAvailability` | set the ceiling and clamp the quantity down, never up           |
/// | `ClearCart`          | empty cart                                                      |
///
/// A line's ceiling is `min(max_available, 8)`, so no transition ever
/// leaves more than eight tickets for one event.
///
/// The total is recomputed from the resulting items on every transition.
pub fn reduce(state: &CartState, action: CartAction) -> CartState {
    let mut items = state.items().to_vec();

    match action {
        CartAction::AddItem(item) => {
            match items.iter().position(|i| i.event.id == item.event.id) {
                Some(idx) => {
                    let existing = &mut items[idx];
                    existing.quantity = existing
                        .quantity
                        .saturating_add(item.quantity)
                        .min(existing.ceiling());
                }
                None => items.push(item),
            }
        }
        CartAction::RemoveItem(event_id) => {
            items.retain(|i| i.event.id != event_id);
        }
        CartAction::UpdateQuantity { event_id, quantity } => {
            if let Some(item) = items.iter_mut().find(|i| i.event.id == event_id) {
                item.quantity = quantity.min(item.ceiling());
            }
        }
        CartAction::UpdateAvailability {
            event_id,
            max_available,
        } => {
            if let Some(item) = items.iter_mut().find(|i| i.event.id == event_id) {
                item.max_available = max_available;
                item.quantity = item.quantity.min(item.ceiling());
            }
        }
        CartAction::ClearCart => items.clear(),
    }

    CartState::from_items(items)
}

/// Owns a cart and routes UI intents to [`reduce`].
///
/// Unlike raw [`CartAction::UpdateQuantity`], [`CartStore::set_quantity`]
/// sends anything below 1 to removal and caps at the per-event maximum.
#[derive(Debug, Clone, Default)]
pub struct CartStore {
    state: CartState,
}

impl CartStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_state(state: CartState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &CartState {
        &self.state
    }

    pub fn dispatch(&mut self, action: CartAction) -> &CartState {
        self.state = reduce(&self.state, action);
        &self.state
    }

    /// Add tickets for `event` at the given price band.
    ///
    /// The ceiling comes from the event's availability; an event that was
    /// never enriched is capped at the per-event maximum.
    pub fn add(
        &mut self,
        event: &Event,
        quantity: u32,
        price: SelectedPrice,
    ) -> Result<&CartState, CoreError> {
        let max_available = event
            .availability
            .map(|a| a.available)
            .unwrap_or(MAX_TICKETS_PER_EVENT);
        let item = CartItem::new(event.clone(), quantity, price, max_available)?;
        Ok(self.dispatch(CartAction::AddItem(item)))
    }

    pub fn remove(&mut self, event_id: &str) -> &CartState {
        self.dispatch(CartAction::RemoveItem(event_id.to_string()))
    }

    /// Quantity stepper behaviour: `< 1` removes the line, otherwise capped at 8.
    pub fn set_quantity(&mut self, event_id: &str, quantity: i64) -> &CartState {
        if quantity < 1 {
            return self.remove(event_id);
        }
        let capped = quantity.min(i64::from(MAX_TICKETS_PER_EVENT)) as u32;
        self.dispatch(CartAction::UpdateQuantity {
            event_id: event_id.to_string(),
            quantity: capped,
        })
    }

    /// Pull the latest availability of a freshly fetched event into its line.
    pub fn sync_availability(&mut self, event: &Event) -> &CartState {
        match event.availability {
            Some(availability) => self.dispatch(CartAction::UpdateAvailability {
                event_id: event.id.clone(),
                max_available: availability.available,
            }),
            None => &self.state,
        }
    }

    pub fn clear(&mut self) -> &CartState {
        self.dispatch(CartAction::ClearCart)
    }
}
