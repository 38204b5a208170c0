pub mod availability;
pub mod cart_store;
pub mod events_gateway;
pub mod retry;
