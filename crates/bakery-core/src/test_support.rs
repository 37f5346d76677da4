//! Shared fixture for handler tests.

use crate::builder::{BakeryBuilder, BakeryFactories};
use crate::engine::BakeryEngine;
use bakery_account::NewUser;
use bakery_catalog::{CakeDraft, CatalogStore, CustomizationCatalog, OptionDraft};
use bakery_config::ConfigBuilder;
use bakery_storage::get_all_implementations;
use bakery_types::{Clock, CreateOrderRequest, Identity, ManualClock, Order};
use chrono::{Days, TimeZone, Utc};
use rust_decimal::dec;
use std::ops::Deref;
use std::sync::Arc;

pub(crate) struct Fixture {
	pub engine: BakeryEngine,
	pub clock: Arc<ManualClock>,
}

impl Deref for Fixture {
	type Target = BakeryEngine;

	fn deref(&self) -> &BakeryEngine {
		&self.engine
	}
}

impl Fixture {
	/// Places an order for two Vanilla Bliss with sprinkles (85.00) due tomorrow.
	pub async fn place(&self, identity: Identity) -> Order {
		let tomorrow = self.clock.today() + Days::new(1);
		self.engine
			.lifecycle
			.create_order(
				&identity,
				CreateOrderRequest {
					cake_id: Some(2),
					quantity: Some(2),
					customer_name: Some("Cara".into()),
					customer_email: Some("cara@example.com".into()),
					customer_phone: Some("555-0101".into()),
					delivery_date: Some(tomorrow.format("%Y-%m-%d").to_string()),
					special_requests: None,
					selected_customizations: vec![1],
				},
			)
			.await
			.unwrap()
	}
}

/// An engine on memory storage at 2024-06-01 09:00 UTC with users `1` (admin) and `2`,
/// cakes `1` Chocolate Dream (45.00) and `2` Vanilla Bliss (40.00), and options `1`
/// Sprinkles (5.00 flat), `2` Candles (0.50 per unit) and inactive `3` Gold Leaf.
pub(crate) async fn fixture() -> Fixture {
	let clock = Arc::new(ManualClock::new(
		Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap(),
	));
	let factories = BakeryFactories {
		storage_factories: get_all_implementations()
			.into_iter()
			.map(|(name, factory)| (name.to_string(), factory))
			.collect(),
	};
	let engine = BakeryBuilder::new(ConfigBuilder::new().build())
		.with_clock(clock.clone())
		.build(factories)
		.unwrap();

	for (name, email, is_admin) in [
		("Olive", "olive@example.com", true),
		("Cara", "cara@example.com", false),
	] {
		engine
			.directory
			.register_user(NewUser {
				name: name.into(),
				email: email.into(),
				phone: None,
				is_admin,
			})
			.await
			.unwrap();
	}

	for (name, price) in [("Chocolate Dream", dec!(45.00)), ("Vanilla Bliss", dec!(40.00))] {
		engine
			.catalog
			.upsert_cake(CakeDraft {
				id: None,
				name: name.into(),
				description: String::new(),
				unit_price: price,
				image_url: None,
			})
			.await
			.unwrap();
	}

	for (category, name, price, active, per_unit) in [
		("topping", "Sprinkles", dec!(5.00), true, false),
		("extras", "Candles", dec!(0.50), true, true),
		("topping", "Gold Leaf", dec!(25.00), false, false),
	] {
		engine
			.catalog
			.upsert_option(OptionDraft {
				id: None,
				category: category.into(),
				name: name.into(),
				price,
				active,
				per_unit,
				description: None,
			})
			.await
			.unwrap();
	}

	Fixture { engine, clock }
}
