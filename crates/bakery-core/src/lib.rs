//! Core order engine for the bakery service.
//!
//! This crate holds the order lifecycle: creation with price derivation and
//! validation, ownership-scoped reads, status transitions guarded by an explicit
//! transition table, and the administrator aggregates. Collaborators (user directory,
//! catalog, pricing, storage) are wired together by [`BakeryBuilder`].

pub mod builder;
pub mod engine;
pub mod handlers;
pub mod locks;
pub mod repository;
pub mod state;

#[cfg(test)]
pub(crate) mod test_support;

pub use builder::{BakeryBuilder, BakeryFactories, BuilderError};
pub use engine::BakeryEngine;
pub use locks::KeyedLocks;
pub use handlers::{
	AdminService, CatalogService, ContactService, LogNotificationSink, NotificationError,
	NotificationSink, OrderLifecycle,
};
pub use repository::{OrderDraft, OrderRepository};
pub use state::OrderStateMachine;
