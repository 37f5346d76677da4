//! Bakery API operations.
//!
//! Each submodule implements one group of endpoints on top of the engine. Route
//! handlers in [`crate::server`] do extraction and hand the typed request here.

pub mod admin;
pub mod catalog;
pub mod contact;
pub mod orders;

use bakery_types::{APIError, BakeryError};

/// Logs a failed operation and converts the error for the response.
fn failed(operation: &str, err: BakeryError) -> APIError {
	match &err {
		BakeryError::Unavailable(_) => tracing::error!("{} failed: {}", operation, err),
		_ => tracing::warn!("{} failed: {}", operation, err),
	}
	APIError::from(err)
}
