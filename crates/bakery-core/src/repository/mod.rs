//! Persistence of orders.

pub mod order;

pub use order::{OrderDraft, OrderRepository};
