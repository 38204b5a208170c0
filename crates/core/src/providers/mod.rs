pub mod traits;

// Upstream API implementations
pub mod ticketmaster;
