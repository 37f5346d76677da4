//! Order pricing.
//!
//! `total = unit_price * quantity + sum(addons)` where an add-on contributes its price
//! once, or once per unit when the option is flagged `per_unit`. Arithmetic is checked
//! decimal arithmetic and the result is stored to the cent.

use bakery_catalog::{CatalogError, CustomizationCatalog};
use bakery_types::{BakeryError, Cake, CustomizationId, OrderCustomization};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;

/// Decimal places kept on order totals.
pub const PRICE_SCALE: u32 = 2;

/// Errors that can occur while pricing an order.
#[derive(Debug, Error)]
pub enum PricingError {
	#[error("Quantity must be at least 1, got {0}")]
	InvalidQuantity(i64),
	#[error("Unknown or inactive customization: {0}")]
	UnavailableCustomization(CustomizationId),
	#[error("Order total is out of range")]
	Overflow,
	#[error("Order total cannot be negative")]
	NegativeTotal,
	#[error("Catalog error: {0}")]
	Catalog(#[from] CatalogError),
}

impl From<PricingError> for BakeryError {
	fn from(err: PricingError) -> Self {
		match err {
			PricingError::Catalog(e) => e.into(),
			other => BakeryError::InvalidInput(other.to_string()),
		}
	}
}

/// The outcome of pricing: the frozen total and the options it was computed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricedOrder {
	pub quantity: u32,
	pub total_price: Decimal,
	/// Sorted by id, one entry per distinct option.
	pub customizations: Vec<OrderCustomization>,
}

/// Validates an order quantity.
pub fn check_quantity(quantity: i64) -> Result<u32, PricingError> {
	if quantity < 1 {
		return Err(PricingError::InvalidQuantity(quantity));
	}
	u32::try_from(quantity).map_err(|_| PricingError::Overflow)
}

/// Computes an order total from already resolved add-ons.
pub fn compute_total(
	unit_price: Decimal,
	quantity: u32,
	addons: &[OrderCustomization],
) -> Result<Decimal, PricingError> {
	if quantity == 0 {
		return Err(PricingError::InvalidQuantity(0));
	}
	let units = Decimal::from(quantity);
	let mut total = unit_price.checked_mul(units).ok_or(PricingError::Overflow)?;

	for addon in addons {
		let charge = if addon.per_unit {
			addon.price.checked_mul(units).ok_or(PricingError::Overflow)?
		} else {
			addon.price
		};
		total = total.checked_add(charge).ok_or(PricingError::Overflow)?;
	}

	if total.is_sign_negative() && !total.is_zero() {
		return Err(PricingError::NegativeTotal);
	}

	let mut total = total.round_dp(PRICE_SCALE);
	total.rescale(PRICE_SCALE);
	Ok(total)
}

/// Prices orders against the live customization catalog.
pub struct PricingEngine {
	options: Arc<dyn CustomizationCatalog>,
}

impl PricingEngine {
	pub fn new(options: Arc<dyn CustomizationCatalog>) -> Self {
		Self { options }
	}

	/// Prices `quantity` units of `cake` with the selected option ids.
	///
	/// Duplicate ids count once and the result does not depend on their order. Every
	/// id must refer to an active option.
	pub async fn price(
		&self,
		cake: &Cake,
		quantity: i64,
		selected: &[CustomizationId],
	) -> Result<PricedOrder, PricingError> {
		let quantity = check_quantity(quantity)?;

		let ids: BTreeSet<CustomizationId> = selected.iter().copied().collect();
		let mut customizations = Vec::with_capacity(ids.len());
		for id in ids {
			let option = self
				.options
				.get_option(id)
				.await?
				.filter(|o| o.active)
				.ok_or(PricingError::UnavailableCustomization(id))?;
			customizations.push(OrderCustomization {
				id: option.id,
				category: option.category,
				name: option.name,
				price: option.price,
				per_unit: option.per_unit,
			});
		}

		let total_price = compute_total(cake.unit_price, quantity, &customizations)?;
		tracing::debug!(
			cake_id = cake.id,
			quantity,
			addons = customizations.len(),
			total = %total_price,
			"Priced order"
		);

		Ok(PricedOrder {
			quantity,
			total_price,
			customizations,
		})
	}
}
