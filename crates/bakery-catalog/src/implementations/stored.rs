//! Catalog backed by [`StorageService`].

use crate::{CakeDraft, CatalogError, CatalogStore, CustomizationCatalog, OptionDraft};
use async_trait::async_trait;
use bakery_storage::StorageService;
use bakery_types::{Cake, CakeId, CustomizationId, CustomizationOption, StorageKey};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;

/// The only order field the catalog needs when checking references.
#[derive(Deserialize)]
struct OrderCakeRef {
	cake_id: CakeId,
}

pub struct StoredCatalog {
	storage: Arc<StorageService>,
}

impl StoredCatalog {
	pub fn new(storage: Arc<StorageService>) -> Self {
		Self { storage }
	}

	async fn assign_id(&self, namespace: StorageKey, id: Option<u64>) -> Result<u64, CatalogError> {
		match id {
			Some(0) => Err(CatalogError::InvalidEntry("id must be at least 1".into())),
			Some(id) => {
				self.storage.reserve_id(namespace, id).await?;
				Ok(id)
			},
			None => Ok(self.storage.next_id(namespace).await?),
		}
	}
}

fn check_entry(name: &str, price: Decimal, what: &str) -> Result<(), CatalogError> {
	if name.trim().is_empty() {
		return Err(CatalogError::InvalidEntry(format!("{} name is required", what)));
	}
	if price.is_sign_negative() {
		return Err(CatalogError::InvalidEntry(format!(
			"{} price cannot be negative",
			what
		)));
	}
	Ok(())
}

#[async_trait]
impl CatalogStore for StoredCatalog {
	async fn get_cake(&self, id: CakeId) -> Result<Option<Cake>, CatalogError> {
		Ok(self
			.storage
			.retrieve_optional(StorageKey::Cakes.as_str(), &id.to_string())
			.await?)
	}

	async fn list_cakes(&self) -> Result<Vec<Cake>, CatalogError> {
		let mut cakes: Vec<Cake> = self.storage.retrieve_all(StorageKey::Cakes.as_str()).await?;
		cakes.sort_by_key(|c| c.id);
		Ok(cakes)
	}

	async fn upsert_cake(&self, draft: CakeDraft) -> Result<Cake, CatalogError> {
		check_entry(&draft.name, draft.unit_price, "Cake")?;
		let id = self.assign_id(StorageKey::Cakes, draft.id).await?;
		let cake = Cake {
			id,
			name: draft.name.trim().to_string(),
			description: draft.description,
			unit_price: draft.unit_price,
			image_url: draft.image_url,
		};
		self.storage
			.store(StorageKey::Cakes.as_str(), &id.to_string(), &cake)
			.await?;
		tracing::debug!(cake_id = id, name = %cake.name, "Stored cake");
		Ok(cake)
	}

	async fn delete_cake(&self, id: CakeId) -> Result<(), CatalogError> {
		let key = id.to_string();
		if !self.storage.exists(StorageKey::Cakes.as_str(), &key).await? {
			return Err(CatalogError::CakeNotFound(id));
		}
		self.storage.remove(StorageKey::Cakes.as_str(), &key).await?;
		Ok(())
	}

	async fn has_live_orders(&self, cake_id: CakeId) -> Result<bool, CatalogError> {
		let orders: Vec<OrderCakeRef> = self
			.storage
			.retrieve_all(StorageKey::Orders.as_str())
			.await?;
		Ok(orders.iter().any(|o| o.cake_id == cake_id))
	}
}

#[async_trait]
impl CustomizationCatalog for StoredCatalog {
	async fn get_option(
		&self,
		id: CustomizationId,
	) -> Result<Option<CustomizationOption>, CatalogError> {
		Ok(self
			.storage
			.retrieve_optional(StorageKey::Customizations.as_str(), &id.to_string())
			.await?)
	}

	async fn list_active(&self) -> Result<Vec<CustomizationOption>, CatalogError> {
		let mut options: Vec<CustomizationOption> = self
			.storage
			.retrieve_all(StorageKey::Customizations.as_str())
			.await?;
		options.retain(|o| o.active);
		options.sort_by(|a, b| {
			a.category
				.cmp(&b.category)
				.then_with(|| a.name.cmp(&b.name))
				.then(a.id.cmp(&b.id))
		});
		Ok(options)
	}

	async fn upsert_option(&self, draft: OptionDraft) -> Result<CustomizationOption, CatalogError> {
		check_entry(&draft.name, draft.price, "Customization")?;
		if draft.category.trim().is_empty() {
			return Err(CatalogError::InvalidEntry(
				"Customization category is required".into(),
			));
		}
		let id = self.assign_id(StorageKey::Customizations, draft.id).await?;
		let option = CustomizationOption {
			id,
			category: draft.category.trim().to_string(),
			name: draft.name.trim().to_string(),
			price: draft.price,
			active: draft.active,
			per_unit: draft.per_unit,
			description: draft.description,
		};
		self.storage
			.store(StorageKey::Customizations.as_str(), &id.to_string(), &option)
			.await?;
		Ok(option)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use bakery_storage::implementations::memory::MemoryStorage;
	use rust_decimal::dec;

	fn catalog() -> (StoredCatalog, Arc<StorageService>) {
		let storage = Arc::new(StorageService::new(Box::new(MemoryStorage::new())));
		(StoredCatalog::new(storage.clone()), storage)
	}

	fn cake(name: &str, price: Decimal) -> CakeDraft {
		CakeDraft {
			id: None,
			name: name.into(),
			description: String::new(),
			unit_price: price,
			image_url: None,
		}
	}

	fn option(category: &str, name: &str, active: bool) -> OptionDraft {
		OptionDraft {
			id: None,
			category: category.into(),
			name: name.into(),
			price: dec!(5.00),
			active,
			per_unit: false,
			description: None,
		}
	}

	#[tokio::test]
	async fn test_upsert_and_list_cakes() {
		let (catalog, _) = catalog();
		let first = catalog.upsert_cake(cake("Chocolate Dream", dec!(45.00))).await.unwrap();
		let second = catalog.upsert_cake(cake("Vanilla Bliss", dec!(40.00))).await.unwrap();
		assert_eq!((first.id, second.id), (1, 2));

		let cakes = catalog.list_cakes().await.unwrap();
		assert_eq!(cakes.len(), 2);
		assert_eq!(cakes[0].name, "Chocolate Dream");
		assert_eq!(catalog.get_cake(2).await.unwrap().unwrap().unit_price, dec!(40.00));
		assert!(catalog.get_cake(3).await.unwrap().is_none());
	}

	#[tokio::test]
	async fn test_explicit_id_reserves_sequence() {
		let (catalog, _) = catalog();
		let mut draft = cake("Red Velvet", dec!(50.00));
		draft.id = Some(10);
		catalog.upsert_cake(draft).await.unwrap();
		let next = catalog.upsert_cake(cake("Lemon", dec!(35.00))).await.unwrap();
		assert_eq!(next.id, 11);
	}

	#[tokio::test]
	async fn test_rejects_negative_price() {
		let (catalog, _) = catalog();
		let result = catalog.upsert_cake(cake("Odd", dec!(-1))).await;
		assert!(matches!(result, Err(CatalogError::InvalidEntry(_))));
	}

	#[tokio::test]
	async fn test_delete_missing_cake() {
		let (catalog, _) = catalog();
		assert!(matches!(
			catalog.delete_cake(4).await,
			Err(CatalogError::CakeNotFound(4))
		));
	}

	#[tokio::test]
	async fn test_has_live_orders_scans_orders() {
		let (catalog, storage) = catalog();
		catalog.upsert_cake(cake("Chocolate Dream", dec!(45.00))).await.unwrap();
		assert!(!catalog.has_live_orders(1).await.unwrap());

		storage
			.store(
				StorageKey::Orders.as_str(),
				"1",
				&serde_json::json!({ "id": 1, "cake_id": 1, "status": "cancelled" }),
			)
			.await
			.unwrap();
		assert!(catalog.has_live_orders(1).await.unwrap());
		assert!(!catalog.has_live_orders(2).await.unwrap());
	}

	#[tokio::test]
	async fn test_list_active_hides_inactive() {
		let (catalog, _) = catalog();
		catalog.upsert_option(option("topping", "Sprinkles", true)).await.unwrap();
		catalog.upsert_option(option("size", "Large", true)).await.unwrap();
		let hidden = catalog.upsert_option(option("topping", "Gold Leaf", false)).await.unwrap();

		let active = catalog.list_active().await.unwrap();
		let names: Vec<_> = active.iter().map(|o| o.name.as_str()).collect();
		assert_eq!(names, vec!["Large", "Sprinkles"]);
		assert!(!catalog.get_option(hidden.id).await.unwrap().unwrap().active);
	}
}
