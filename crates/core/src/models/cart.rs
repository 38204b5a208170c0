use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

use super::event::{Event, PriceRange};

/// Hard ceiling on tickets per event in one cart.
pub const MAX_TICKETS_PER_EVENT: u32 = 8;

/// Service fee applied on top of the minimum price of the selected range.
pub const SERVICE_FEE_RATE: f64 = 0.15;

/// The price band a shopper picked for an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedPrice {
    pub price_type: String,
    pub min: f64,
    pub max: f64,
}

impl From<&PriceRange> for SelectedPrice {
    fn from(range: &PriceRange) -> Self {
        Self {
            price_type: range.price_type.clone(),
            min: range.min,
            max: range.max,
        }
    }
}

/// Per-line breakdown shown at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinePricing {
    /// Minimum of the selected range, per ticket.
    pub base: f64,
    /// Fee per ticket.
    pub fee: f64,
    /// `(base + fee) × quantity`.
    pub line_total: f64,
}

/// One event in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub event: Event,
    pub quantity: u32,
    pub price_range: SelectedPrice,
    /// Mirrors the upstream availability at the time it was last synced.
    pub max_available: u32,
}

impl CartItem {
    /// Build a validated item: `1 ≤ quantity ≤ 8` and `quantity ≤ max_available`.
    pub fn new(
        event: Event,
        quantity: u32,
        price_range: SelectedPrice,
        max_available: u32,
    ) -> Result<Self, CoreError> {
        if quantity == 0 || quantity > MAX_TICKETS_PER_EVENT {
            return Err(CoreError::ValidationError(format!(
                "Quantity must be between 1 and {MAX_TICKETS_PER_EVENT}, got {quantity}"
            )));
        }
        if quantity > max_available {
            return Err(CoreError::ValidationError(format!(
                "Only {max_available} ticket(s) available for {}, requested {quantity}",
                event.id
            )));
        }
        if !price_range.min.is_finite() || price_range.min < 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Invalid price for {}: {}",
                event.id, price_range.min
            )));
        }
        Ok(Self {
            event,
            quantity,
            price_range,
            max_available,
        })
    }

    pub fn event_id(&self) -> &str {
        &self.event.id
    }

    /// Most tickets this line may hold: availability, never above the per-event cap.
    pub fn ceiling(&self) -> u32 {
        self.max_available.min(MAX_TICKETS_PER_EVENT)
    }

    /// Per-ticket price including the service fee.
    pub fn unit_price(&self) -> f64 {
        self.price_range.min * (1.0 + SERVICE_FEE_RATE)
    }

    pub fn pricing(&self) -> LinePricing {
        let base = self.price_range.min;
        let fee = base * SERVICE_FEE_RATE;
        LinePricing {
            base,
            fee,
            line_total: self.unit_price() * f64::from(self.quantity),
        }
    }
}

/// Ordered cart contents. `total` is never set directly, only recomputed
/// from `items` after every transition.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CartState {
    items: Vec<CartItem>,
    total: f64,
}

impl CartState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items(items: Vec<CartItem>) -> Self {
        let total = calculate_total(&items);
        Self { items, total }
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<CartItem> {
        self.items
    }

    pub fn item(&self, event_id: &str) -> Option<&CartItem> {
        self.items.iter().find(|i| i.event.id == event_id)
    }

    /// `Σ (min × 1.15) × quantity` over all items.
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Sum of base prices, fees excluded.
    pub fn subtotal(&self) -> f64 {
        self.items
            .iter()
            .map(|i| i.price_range.min * f64::from(i.quantity))
            .sum()
    }

    pub fn fees(&self) -> f64 {
        self.subtotal() * SERVICE_FEE_RATE
    }

    /// Total number of tickets across all items.
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

pub(crate) fn calculate_total(items: &[CartItem]) -> f64 {
    items
        .iter()
        .map(|i| i.unit_price() * f64::from(i.quantity))
        .sum()
}

/// Every transition the cart accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum CartAction {
    AddItem(CartItem),
    RemoveItem(String),
    UpdateQuantity { event_id: String, quantity: u32 },
    UpdateAvailability { event_id: String, max_available: u32 },
    ClearCart,
}
