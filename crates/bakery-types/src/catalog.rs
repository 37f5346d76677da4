//! Catalog entries: cakes and the customization options that can be added to them.

use crate::{CakeId, CustomizationId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A cake offered in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cake {
	pub id: CakeId,
	pub name: String,
	#[serde(default)]
	pub description: String,
	/// Price of a single cake.
	#[serde(alias = "price")]
	pub unit_price: Decimal,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub image_url: Option<String>,
}

/// An add-on a customer can select on an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomizationOption {
	pub id: CustomizationId,
	/// Grouping such as "size", "flavor" or "decoration".
	pub category: String,
	pub name: String,
	pub price: Decimal,
	/// Inactive options are hidden from the public listing and cannot be ordered.
	#[serde(default = "default_active")]
	pub active: bool,
	/// Charge `price` once per unit ordered instead of once per order.
	#[serde(default)]
	pub per_unit: bool,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
}

fn default_active() -> bool {
	true
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_option_defaults() {
		let option: CustomizationOption = serde_json::from_str(
			r#"{"id": 1, "category": "topping", "name": "Berries", "price": "5.00"}"#,
		)
		.unwrap();
		assert!(option.active);
		assert!(!option.per_unit);
		assert!(option.description.is_none());
	}

	#[test]
	fn test_cake_accepts_price_alias() {
		let cake: Cake =
			serde_json::from_str(r#"{"id": 3, "name": "Vanilla Bliss", "price": "40.00"}"#).unwrap();
		assert_eq!(cake.unit_price, Decimal::new(4000, 2));
		assert!(cake.description.is_empty());
	}
}
