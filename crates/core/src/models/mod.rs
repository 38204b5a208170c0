pub mod cache;
pub mod cart;
pub mod event;
pub mod order;
pub mod query;
pub mod settings;
pub mod venue;
