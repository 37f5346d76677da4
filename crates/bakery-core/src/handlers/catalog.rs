//! Public catalog reads and admin-only cake management.

use crate::locks::KeyedLocks;
use bakery_catalog::{CakeDraft, CatalogError, CatalogStore, CustomizationCatalog};
use bakery_types::{BakeryError, Cake, CakeId, CakeRequest, CustomizationOption, Identity};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::instrument;

/// Longest accepted cake name.
pub const MAX_CAKE_NAME_LEN: usize = 100;

pub struct CatalogService {
	cakes: Arc<dyn CatalogStore>,
	options: Arc<dyn CustomizationCatalog>,
	/// Shared with order creation.
	cake_locks: Arc<KeyedLocks<CakeId>>,
}

fn cake_name(name: &str) -> Result<String, BakeryError> {
	let name = name.trim();
	if name.is_empty() {
		return Err(BakeryError::invalid_input("name is required"));
	}
	if name.chars().count() > MAX_CAKE_NAME_LEN {
		return Err(BakeryError::invalid_input(format!(
			"name must be at most {} characters",
			MAX_CAKE_NAME_LEN
		)));
	}
	Ok(name.to_string())
}

fn cake_description(description: &str) -> Result<String, BakeryError> {
	let description = description.trim();
	if description.is_empty() {
		return Err(BakeryError::invalid_input("description is required"));
	}
	Ok(description.to_string())
}

fn cake_price(price: Decimal) -> Result<Decimal, BakeryError> {
	if price < Decimal::ZERO {
		return Err(BakeryError::invalid_input("price must not be negative"));
	}
	Ok(price)
}

fn image_url(url: Option<String>) -> Option<String> {
	url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty())
}

impl CatalogService {
	pub fn new(
		cakes: Arc<dyn CatalogStore>,
		options: Arc<dyn CustomizationCatalog>,
		cake_locks: Arc<KeyedLocks<CakeId>>,
	) -> Self {
		Self {
			cakes,
			options,
			cake_locks,
		}
	}

	pub async fn list_cakes(&self) -> Result<Vec<Cake>, BakeryError> {
		Ok(self.cakes.list_cakes().await?)
	}

	pub async fn get_cake(&self, id: CakeId) -> Result<Cake, BakeryError> {
		Ok(self
			.cakes
			.get_cake(id)
			.await?
			.ok_or(CatalogError::CakeNotFound(id))?)
	}

	/// Active customization options only.
	pub async fn list_customizations(&self) -> Result<Vec<CustomizationOption>, BakeryError> {
		Ok(self.options.list_active().await?)
	}

	/// Every cake ordered by name. Admin only.
	pub async fn list_cakes_admin(&self, identity: &Identity) -> Result<Vec<Cake>, BakeryError> {
		identity.require_admin()?;
		let mut cakes = self.cakes.list_cakes().await?;
		cakes.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
		Ok(cakes)
	}

	/// Adds a cake. Admin only.
	#[instrument(skip_all)]
	pub async fn create_cake(
		&self,
		identity: &Identity,
		request: CakeRequest,
	) -> Result<Cake, BakeryError> {
		let admin_id = identity.require_admin()?;
		let name = cake_name(request.name.as_deref().unwrap_or_default())?;
		let description = cake_description(request.description.as_deref().unwrap_or_default())?;
		let unit_price = cake_price(
			request
				.price
				.ok_or_else(|| BakeryError::invalid_input("price is required"))?,
		)?;

		let cake = self
			.cakes
			.upsert_cake(CakeDraft {
				id: None,
				name,
				description,
				unit_price,
				image_url: image_url(request.image_url),
			})
			.await?;
		tracing::info!(cake_id = %cake.id, admin_id, "Cake created");
		Ok(cake)
	}

	/// Changes the fields present in `request`. Admin only.
	///
	/// Existing orders keep the name and price they were placed with.
	#[instrument(skip_all, fields(cake_id = %id))]
	pub async fn update_cake(
		&self,
		identity: &Identity,
		id: CakeId,
		request: CakeRequest,
	) -> Result<Cake, BakeryError> {
		let admin_id = identity.require_admin()?;
		let _guard = self.cake_locks.lock(id).await;
		let current = self.get_cake(id).await?;

		let name = match request.name.as_deref() {
			Some(name) => cake_name(name)?,
			None => current.name,
		};
		let description = match request.description.as_deref() {
			Some(description) => cake_description(description)?,
			None => current.description,
		};
		let unit_price = match request.price {
			Some(price) => cake_price(price)?,
			None => current.unit_price,
		};
		let image_url = match request.image_url {
			Some(url) => image_url(Some(url)),
			None => current.image_url,
		};

		let cake = self
			.cakes
			.upsert_cake(CakeDraft {
				id: Some(id),
				name,
				description,
				unit_price,
				image_url,
			})
			.await?;
		tracing::info!(cake_id = %id, admin_id, "Cake updated");
		Ok(cake)
	}

	/// Deletes a cake that no order references. Admin only.
	///
	/// The reference check and the delete run under the cake's lock, which order
	/// creation also holds from the cake lookup until the order is stored.
	#[instrument(skip_all, fields(cake_id = %id))]
	pub async fn remove_cake(&self, identity: &Identity, id: CakeId) -> Result<(), BakeryError> {
		let admin_id = identity.require_admin()?;
		let _guard = self.cake_locks.lock(id).await;
		let cake = self.get_cake(id).await?;
		if self.cakes.has_live_orders(id).await? {
			return Err(BakeryError::Conflict(format!(
				"Cannot delete cake '{}' because orders reference it",
				cake.name
			)));
		}
		self.cakes.delete_cake(id).await?;
		tracing::info!(cake_id = %id, admin_id, "Cake deleted");
		Ok(())
	}
}
