//! Cake catalog and customization options.
//!
//! Two collaborator interfaces for the core: [`CatalogStore`] for cakes and
//! [`CustomizationCatalog`] for add-on options. Neither caches; every call reads the
//! store.

use async_trait::async_trait;
use bakery_storage::StorageError;
use bakery_types::{BakeryError, Cake, CakeId, CustomizationId, CustomizationOption};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod stored;
}

pub use implementations::stored::StoredCatalog;

/// Errors that can occur during catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
	#[error("Cake {0} not found")]
	CakeNotFound(CakeId),
	#[error("Customization option {0} not found")]
	OptionNotFound(CustomizationId),
	/// A catalog entry failed validation.
	#[error("{0}")]
	InvalidEntry(String),
	#[error("Storage error: {0}")]
	Storage(#[from] StorageError),
}

impl From<CatalogError> for BakeryError {
	fn from(err: CatalogError) -> Self {
		match err {
			CatalogError::CakeNotFound(_) | CatalogError::OptionNotFound(_) => {
				BakeryError::not_found(err.to_string())
			},
			CatalogError::InvalidEntry(message) => BakeryError::InvalidInput(message),
			CatalogError::Storage(e) => e.into(),
		}
	}
}

/// A cake to be created or replaced. Without an id a new one is allocated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CakeDraft {
	#[serde(default)]
	pub id: Option<CakeId>,
	pub name: String,
	#[serde(default)]
	pub description: String,
	#[serde(alias = "price")]
	pub unit_price: Decimal,
	#[serde(default)]
	pub image_url: Option<String>,
}

/// A customization option to be created or replaced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionDraft {
	#[serde(default)]
	pub id: Option<CustomizationId>,
	pub category: String,
	pub name: String,
	pub price: Decimal,
	#[serde(default = "default_active")]
	pub active: bool,
	#[serde(default)]
	pub per_unit: bool,
	#[serde(default)]
	pub description: Option<String>,
}

fn default_active() -> bool {
	true
}

/// Cakes offered by the bakery.
#[async_trait]
pub trait CatalogStore: Send + Sync {
	async fn get_cake(&self, id: CakeId) -> Result<Option<Cake>, CatalogError>;

	/// All cakes ordered by id.
	async fn list_cakes(&self) -> Result<Vec<Cake>, CatalogError>;

	async fn upsert_cake(&self, draft: CakeDraft) -> Result<Cake, CatalogError>;

	/// Removes a cake. Callers must check [`has_live_orders`](Self::has_live_orders)
	/// first.
	async fn delete_cake(&self, id: CakeId) -> Result<(), CatalogError>;

	/// Whether any persisted order references the cake, whatever its status.
	async fn has_live_orders(&self, cake_id: CakeId) -> Result<bool, CatalogError>;
}

/// Add-on options that can be attached to an order.
#[async_trait]
pub trait CustomizationCatalog: Send + Sync {
	/// Looks an option up regardless of its active flag.
	async fn get_option(&self, id: CustomizationId)
		-> Result<Option<CustomizationOption>, CatalogError>;

	/// Active options ordered by category, then name.
	async fn list_active(&self) -> Result<Vec<CustomizationOption>, CatalogError>;

	async fn upsert_option(&self, draft: OptionDraft) -> Result<CustomizationOption, CatalogError>;
}
