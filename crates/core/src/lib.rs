pub mod errors;
pub mod models;
pub mod providers;
pub mod services;

use chrono::NaiveDate;
use models::{
    cache::ResponseCache,
    cart::{CartState, SelectedPrice},
    event::Event,
    order::{CheckoutSummary, Order},
    query::{Category, EventQuery},
    settings::Settings,
    venue::Venue,
};
use providers::{ticketmaster::TicketmasterClient, traits::DiscoveryTransport};
use services::{
    availability::AvailabilityEstimator,
    cart_store::CartStore,
    events_gateway::{EventDetails, EventsGateway, HomeLanes},
};

use errors::CoreError;

/// Main entry point for the storefront core library.
/// Holds the events gateway (with its cache) and the shopper's cart.
#[must_use]
pub struct Storefront<T: DiscoveryTransport = TicketmasterClient> {
    gateway: EventsGateway<T>,
    cart: CartStore,
}

impl<T: DiscoveryTransport> std::fmt::Debug for Storefront<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storefront")
            .field("transport", &self.gateway.transport().name())
            .field("cached_entries", &self.gateway.cache_len())
            .field("cart_items", &self.cart.state().items().len())
            .field("cart_total", &self.cart.state().total())
            .finish()
    }
}

impl Storefront<TicketmasterClient> {
    /// Build a storefront talking to the real Discovery API.
    /// Fails fast when the API key is missing.
    pub fn from_settings(settings: Settings) -> Result<Self, CoreError> {
        settings.validate()?;
        let transport = TicketmasterClient::new(&settings);
        let cache = ResponseCache::with_ttls(settings.cache_ttls);
        Ok(Self::with_gateway(EventsGateway::new(transport, cache, settings)))
    }
}

impl<T: DiscoveryTransport> Storefront<T> {
    /// Build a storefront over any transport (mock transports in tests).
    pub fn new(transport: T, settings: Settings) -> Self {
        let cache = ResponseCache::with_ttls(settings.cache_ttls);
        Self::with_gateway(EventsGateway::new(transport, cache, settings))
    }

    pub fn with_gateway(gateway: EventsGateway<T>) -> Self {
        Self {
            gateway,
            cart: CartStore::new(),
        }
    }

    /// Replace the availability estimator used for newly fetched events.
    pub fn with_estimator(self, estimator: impl AvailabilityEstimator + 'static) -> Self {
        Self {
            gateway: self.gateway.with_estimator(estimator),
            cart: self.cart,
        }
    }

    pub fn gateway(&self) -> &EventsGateway<T> {
        &self.gateway
    }

    // ── Catalog ─────────────────────────────────────────────────────

    pub async fn search_events(&self, query: &EventQuery) -> Result<Vec<Event>, CoreError> {
        self.gateway.search_events(query).await
    }

    pub async fn get_event(&self, id: &str) -> Result<Event, CoreError> {
        self.gateway.get_event_by_id(id).await
    }

    pub async fn get_venue(&self, id: &str) -> Result<Venue, CoreError> {
        self.gateway.get_venue_by_id(id).await
    }

    pub async fn get_event_details(&self, id: &str) -> Result<EventDetails, CoreError> {
        self.gateway.get_event_details(id).await
    }

    /// Landing page lanes starting today (UTC).
    pub async fn home_lanes(&self, coordinates: Option<(f64, f64)>) -> Result<HomeLanes, CoreError> {
        self.gateway.load_home_lanes(coordinates, today()).await
    }

    pub async fn events_near(
        &self,
        category: Option<Category>,
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<Event>, CoreError> {
        self.gateway
            .events_near(category, latitude, longitude, today())
            .await
    }

    /// Drop every cached response.
    pub fn clear_cache(&self) {
        self.gateway.clear_cache();
    }

    // ── Cart ────────────────────────────────────────────────────────

    #[must_use]
    pub fn cart(&self) -> &CartState {
        self.cart.state()
    }

    /// Add tickets for an event, looked up through the gateway.
    ///
    /// `price_type` selects a price range by its type label; `None` takes
    /// the first one. Events without price ranges cannot be added.
    pub async fn add_to_cart(
        &mut self,
        event_id: &str,
        quantity: u32,
        price_type: Option<&str>,
    ) -> Result<&CartState, CoreError> {
        let event = self.gateway.get_event_by_id(event_id).await?;
        let range = match price_type {
            Some(wanted) => event
                .price_ranges
                .iter()
                .find(|p| p.price_type.eq_ignore_ascii_case(wanted)),
            None => event.price_ranges.first(),
        }
        .ok_or_else(|| {
            CoreError::ValidationError(format!(
                "No matching price range for event {}",
                event.id
            ))
        })?;
        let price = SelectedPrice::from(range);
        self.cart.add(&event, quantity, price)
    }

    pub fn remove_from_cart(&mut self, event_id: &str) -> &CartState {
        self.cart.remove(event_id)
    }

    /// Stepper semantics: below 1 removes the line, above 8 is capped.
    pub fn update_cart_quantity(&mut self, event_id: &str, quantity: i64) -> &CartState {
        self.cart.set_quantity(event_id, quantity)
    }

    /// Re-read each cart event and clamp quantities to current availability.
    pub async fn refresh_cart_availability(&mut self) -> Result<&CartState, CoreError> {
        let ids: Vec<String> = self
            .cart
            .state()
            .items()
            .iter()
            .map(|i| i.event.id.clone())
            .collect();
        for id in ids {
            let event = self.gateway.get_event_by_id(&id).await?;
            self.cart.sync_availability(&event);
        }
        Ok(self.cart.state())
    }

    pub fn clear_cart(&mut self) -> &CartState {
        self.cart.clear()
    }

    #[must_use]
    pub fn checkout_summary(&self) -> CheckoutSummary {
        CheckoutSummary::from(self.cart.state())
    }

    /// Mock checkout: no payment is taken. Produces an order confirmation
    /// and empties the cart.
    pub fn checkout(&mut self) -> Result<Order, CoreError> {
        if self.cart.state().is_empty() {
            return Err(CoreError::ValidationError("Cart is empty".into()));
        }
        let order = Order::new(self.checkout_summary());
        tracing::info!(order_id = %order.id, total = order.summary.total, "order placed");
        self.cart.clear();
        Ok(order)
    }
}

fn today() -> NaiveDate {
    chrono::Utc::now().date_naive()
}
