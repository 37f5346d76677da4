//! Request handlers for the bakery.
//!
//! This module contains the handlers behind each group of operations: the order
//! lifecycle, administrator aggregates, the catalog and its administration, and the contact
//! form.

pub mod admin;
pub mod catalog;
pub mod contact;
pub mod order;

pub use admin::AdminService;
pub use catalog::CatalogService;
pub use contact::{
	ContactService, LogNotificationSink, NotificationError, NotificationSink,
};
pub use order::OrderLifecycle;
