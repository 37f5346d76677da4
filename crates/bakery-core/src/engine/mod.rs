//! Bakery engine that ties the order core to its collaborators.
//!
//! The engine owns the shared storage service and one instance of every handler. It is
//! cheap to clone and is shared by the HTTP layer and the command line tooling.

use crate::handlers::{AdminService, CatalogService, ContactService, OrderLifecycle};
use crate::repository::OrderRepository;
use bakery_account::{StoredUserDirectory, UserDirectory};
use bakery_catalog::StoredCatalog;
use bakery_config::Config;
use bakery_storage::StorageService;
use bakery_types::{BakeryError, Clock, Identity};
use std::sync::Arc;

/// Main bakery engine.
#[derive(Clone)]
pub struct BakeryEngine {
	pub(crate) config: Config,
	pub(crate) storage: Arc<StorageService>,
	pub(crate) clock: Arc<dyn Clock>,
	/// User directory, also used for seeding and admin tooling.
	pub(crate) directory: Arc<StoredUserDirectory>,
	/// Cake and customization catalog.
	pub(crate) catalog: Arc<StoredCatalog>,
	pub(crate) orders: Arc<OrderRepository>,
	pub(crate) lifecycle: Arc<OrderLifecycle>,
	pub(crate) admin: Arc<AdminService>,
	pub(crate) catalog_service: Arc<CatalogService>,
	pub(crate) contact: Arc<ContactService>,
}

impl BakeryEngine {
	/// Resolves an optional bearer credential to the caller's identity.
	pub async fn resolve_identity(&self, credential: Option<&str>) -> Result<Identity, BakeryError> {
		Ok(self.directory.resolve_identity(credential).await?)
	}

	pub fn config(&self) -> &Config {
		&self.config
	}

	pub fn storage(&self) -> &Arc<StorageService> {
		&self.storage
	}

	pub fn clock(&self) -> &Arc<dyn Clock> {
		&self.clock
	}

	pub fn directory(&self) -> &Arc<StoredUserDirectory> {
		&self.directory
	}

	pub fn catalog(&self) -> &Arc<StoredCatalog> {
		&self.catalog
	}

	pub fn orders(&self) -> &Arc<OrderRepository> {
		&self.orders
	}

	pub fn lifecycle(&self) -> &Arc<OrderLifecycle> {
		&self.lifecycle
	}

	pub fn admin(&self) -> &Arc<AdminService> {
		&self.admin
	}

	pub fn catalog_service(&self) -> &Arc<CatalogService> {
		&self.catalog_service
	}

	pub fn contact(&self) -> &Arc<ContactService> {
		&self.contact
	}
}
