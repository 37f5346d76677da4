//! Error taxonomy shared by every bakery component.
//!
//! Component crates keep their own error enums and convert into [`BakeryError`] at the
//! boundary of the core, so callers only ever deal with these seven kinds.

use crate::order::OrderStatus;
use thiserror::Error;

/// The failure kinds surfaced by the core.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BakeryError {
	/// Input was missing, malformed or violated a business rule.
	#[error("{0}")]
	InvalidInput(String),
	/// A referenced entity does not exist.
	#[error("{0}")]
	NotFound(String),
	/// The operation needs a verified caller and none was presented.
	#[error("Authentication required")]
	Unauthenticated,
	/// The caller is known but may not perform the operation.
	#[error("{0}")]
	Forbidden(String),
	/// The requested status change is not allowed from the current status.
	#[error("Cannot change order status from {from} to {to}")]
	InvalidTransition { from: OrderStatus, to: OrderStatus },
	/// The operation conflicts with existing state.
	#[error("{0}")]
	Conflict(String),
	/// A backing store or collaborator could not be reached.
	#[error("{0}")]
	Unavailable(String),
}

impl BakeryError {
	/// Stable machine-readable code for this kind.
	pub fn code(&self) -> &'static str {
		match self {
			BakeryError::InvalidInput(_) => "INVALID_INPUT",
			BakeryError::NotFound(_) => "NOT_FOUND",
			BakeryError::Unauthenticated => "UNAUTHENTICATED",
			BakeryError::Forbidden(_) => "FORBIDDEN",
			BakeryError::InvalidTransition { .. } => "INVALID_TRANSITION",
			BakeryError::Conflict(_) => "CONFLICT",
			BakeryError::Unavailable(_) => "UNAVAILABLE",
		}
	}

	pub fn invalid_input(message: impl Into<String>) -> Self {
		BakeryError::InvalidInput(message.into())
	}

	pub fn not_found(message: impl Into<String>) -> Self {
		BakeryError::NotFound(message.into())
	}

	pub fn forbidden(message: impl Into<String>) -> Self {
		BakeryError::Forbidden(message.into())
	}

	pub fn unavailable(message: impl Into<String>) -> Self {
		BakeryError::Unavailable(message.into())
	}
}
