//! Order types.
//!
//! An [`Order`] is a value snapshot: contact details, cake name and the selected
//! customizations are copied in at creation and the total is frozen, so later catalog
//! edits never change what a customer was charged.

use crate::{BakeryError, CakeId, CustomizationId, OrderId, UserId};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A customer order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
	/// Identifier assigned at creation.
	pub id: OrderId,
	/// Owning user, `None` for guest orders. Never changes after creation.
	pub owner_id: Option<UserId>,
	pub cake_id: CakeId,
	/// Cake display name at the time of ordering.
	pub cake_name: String,
	pub quantity: u32,
	/// Options applied to this order, as priced at creation.
	#[serde(default)]
	pub selected_customizations: Vec<OrderCustomization>,
	pub customer_name: String,
	pub customer_email: String,
	pub customer_phone: String,
	pub delivery_date: NaiveDate,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub special_requests: Option<String>,
	/// Derived server side, never accepted from the client.
	pub total_price: Decimal,
	pub status: OrderStatus,
	/// Unix seconds.
	pub created_at: u64,
	/// Unix seconds, refreshed on every mutation.
	pub updated_at: u64,
}

impl Order {
	/// Whether this order was placed without an account.
	pub fn is_guest(&self) -> bool {
		self.owner_id.is_none()
	}
}

/// Snapshot of a customization option as charged on an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderCustomization {
	pub id: CustomizationId,
	pub category: String,
	pub name: String,
	pub price: Decimal,
	#[serde(default)]
	pub per_unit: bool,
}

/// Status of an order.
///
/// `Pending` is the initial status. `Completed` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
	Pending,
	Confirmed,
	Completed,
	Cancelled,
}

impl OrderStatus {
	pub fn as_str(&self) -> &'static str {
		match self {
			OrderStatus::Pending => "pending",
			OrderStatus::Confirmed => "confirmed",
			OrderStatus::Completed => "completed",
			OrderStatus::Cancelled => "cancelled",
		}
	}

	/// Returns true once no further transitions are possible.
	pub fn is_terminal(&self) -> bool {
		matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
	}

	/// Statuses whose orders count towards revenue.
	pub fn counts_as_revenue(&self) -> bool {
		matches!(self, OrderStatus::Confirmed | OrderStatus::Completed)
	}

	/// Returns an iterator over all statuses.
	pub fn all() -> impl Iterator<Item = Self> {
		[
			Self::Pending,
			Self::Confirmed,
			Self::Completed,
			Self::Cancelled,
		]
		.into_iter()
	}
}

impl fmt::Display for OrderStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for OrderStatus {
	type Err = BakeryError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"pending" => Ok(Self::Pending),
			"confirmed" => Ok(Self::Confirmed),
			"completed" => Ok(Self::Completed),
			"cancelled" => Ok(Self::Cancelled),
			other => Err(BakeryError::invalid_input(format!(
				"Invalid status '{}', expected one of: pending, confirmed, completed, cancelled",
				other
			))),
		}
	}
}

/// An order as listed to administrators, with the owner's email or `"Guest"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminOrderView {
	#[serde(flatten)]
	pub order: Order,
	pub user_email: String,
}

impl AdminOrderView {
	pub const GUEST_LABEL: &'static str = "Guest";
	/// Shown when the owning user record no longer exists.
	pub const UNKNOWN_LABEL: &'static str = "Unknown";
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_status_parse_roundtrip() {
		for status in OrderStatus::all() {
			assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
		}
	}

	#[test]
	fn test_status_parse_rejects_unknown() {
		let err = "shipped".parse::<OrderStatus>().unwrap_err();
		assert_eq!(err.code(), "INVALID_INPUT");
		assert!("Pending".parse::<OrderStatus>().is_err());
	}

	#[test]
	fn test_terminal_statuses() {
		assert!(!OrderStatus::Pending.is_terminal());
		assert!(!OrderStatus::Confirmed.is_terminal());
		assert!(OrderStatus::Completed.is_terminal());
		assert!(OrderStatus::Cancelled.is_terminal());
	}

	#[test]
	fn test_status_serializes_lowercase() {
		let json = serde_json::to_string(&OrderStatus::Confirmed).unwrap();
		assert_eq!(json, "\"confirmed\"");
	}
}
