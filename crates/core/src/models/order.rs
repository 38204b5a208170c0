use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::cart::{CartState, LinePricing};

/// One line of a checkout summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub event_id: String,
    pub event_name: String,
    pub price_type: String,
    pub quantity: u32,
    pub pricing: LinePricing,
}

/// What the shopper is about to pay, derived from the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutSummary {
    pub lines: Vec<OrderLine>,
    pub subtotal: f64,
    pub fees: f64,
    pub total: f64,
}

impl From<&CartState> for CheckoutSummary {
    fn from(cart: &CartState) -> Self {
        let lines = cart
            .items()
            .iter()
            .map(|item| OrderLine {
                event_id: item.event.id.clone(),
                event_name: item.event.name.clone(),
                price_type: item.price_range.price_type.clone(),
                quantity: item.quantity,
                pricing: item.pricing(),
            })
            .collect();
        Self {
            lines,
            subtotal: cart.subtotal(),
            fees: cart.fees(),
            total: cart.total(),
        }
    }
}

/// A placed (mock) order. No payment is taken; this is the confirmation
/// the storefront shows after checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub placed_at: DateTime<Utc>,
    pub summary: CheckoutSummary,
}

impl Order {
    pub fn new(summary: CheckoutSummary) -> Self {
        Self {
            id: Uuid::new_v4(),
            placed_at: Utc::now(),
            summary,
        }
    }
}
