//! Builder pattern for constructing bakery engines.
//!
//! Composes a [`BakeryEngine`] from a storage implementation chosen by name through
//! factory functions, plus an optional clock and notification sink override.

use crate::engine::BakeryEngine;
use crate::handlers::{
	AdminService, CatalogService, ContactService, LogNotificationSink, NotificationSink,
	OrderLifecycle,
};
use crate::locks::KeyedLocks;
use crate::repository::OrderRepository;
use crate::state::OrderStateMachine;
use bakery_account::{StoredUserDirectory, TokenAuthority, UserDirectory};
use bakery_catalog::{CatalogStore, CustomizationCatalog, StoredCatalog};
use bakery_config::Config;
use bakery_pricing::PricingEngine;
use bakery_storage::{StorageError, StorageInterface, StorageService};
use bakery_types::{Clock, SystemClock};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur during engine construction.
#[derive(Debug, Error)]
pub enum BuilderError {
	#[error("Configuration error: {0}")]
	Config(String),
	#[error("Missing required component: {0}")]
	MissingComponent(String),
}

/// Factory functions needed to build a BakeryEngine, keyed by implementation name.
pub struct BakeryFactories<SF> {
	pub storage_factories: HashMap<String, SF>,
}

/// Builder for constructing a BakeryEngine with pluggable implementations.
pub struct BakeryBuilder {
	config: Config,
	clock: Option<Arc<dyn Clock>>,
	notification_sink: Option<Arc<dyn NotificationSink>>,
}

impl BakeryBuilder {
	pub fn new(config: Config) -> Self {
		Self {
			config,
			clock: None,
			notification_sink: None,
		}
	}

	/// Overrides the system clock.
	pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
		self.clock = Some(clock);
		self
	}

	/// Overrides the default sink, which logs contact messages.
	pub fn with_notification_sink(mut self, sink: Arc<dyn NotificationSink>) -> Self {
		self.notification_sink = Some(sink);
		self
	}

	/// Builds the engine. Only the primary storage implementation is instantiated.
	pub fn build<SF>(self, factories: BakeryFactories<SF>) -> Result<BakeryEngine, BuilderError>
	where
		SF: Fn(&toml::Value) -> Result<Box<dyn StorageInterface>, StorageError>,
	{
		let primary = self.config.storage.primary.as_str();
		for name in self.config.storage.implementations.keys() {
			if name != primary {
				tracing::info!(component = "storage", implementation = %name, enabled = false, "Skipped");
			}
		}

		let storage_config = self
			.config
			.storage
			.implementations
			.get(primary)
			.ok_or_else(|| {
				BuilderError::Config(format!(
					"Primary storage '{}' has no configuration",
					primary
				))
			})?;
		let factory = factories.storage_factories.get(primary).ok_or_else(|| {
			BuilderError::MissingComponent(format!("storage implementation '{}'", primary))
		})?;
		let backend = factory(storage_config).map_err(|e| {
			tracing::error!(
				component = "storage",
				implementation = %primary,
				error = %e,
				"Failed to create storage implementation"
			);
			BuilderError::Config(format!(
				"Failed to create storage implementation '{}': {}",
				primary, e
			))
		})?;
		tracing::info!(component = "storage", implementation = %primary, enabled = true, "Loaded");

		let storage = Arc::new(StorageService::new(backend));
		let clock = self
			.clock
			.unwrap_or_else(|| Arc::new(SystemClock) as Arc<dyn Clock>);

		let tokens = TokenAuthority::new(
			self.config.identity.token_secret.clone(),
			self.config.identity.token_ttl_seconds,
			clock.clone(),
		);
		let directory = Arc::new(StoredUserDirectory::new(
			storage.clone(),
			tokens,
			clock.clone(),
		));
		let catalog = Arc::new(StoredCatalog::new(storage.clone()));
		let cakes: Arc<dyn CatalogStore> = catalog.clone();
		let options: Arc<dyn CustomizationCatalog> = catalog.clone();
		let users: Arc<dyn UserDirectory> = directory.clone();

		let orders = Arc::new(OrderRepository::new(storage.clone(), clock.clone()));
		let state_machine = Arc::new(OrderStateMachine::new(orders.clone()));
		let pricing = Arc::new(PricingEngine::new(options.clone()));
		let cake_locks = Arc::new(KeyedLocks::new());

		let lifecycle = Arc::new(OrderLifecycle::new(
			cakes.clone(),
			pricing,
			orders.clone(),
			state_machine,
			cake_locks.clone(),
			clock.clone(),
		));
		let admin = Arc::new(AdminService::new(
			orders.clone(),
			users,
			clock.clone(),
			self.config.orders.clone(),
		));
		let catalog_service = Arc::new(CatalogService::new(cakes, options, cake_locks));
		let sink = self
			.notification_sink
			.unwrap_or_else(|| Arc::new(LogNotificationSink) as Arc<dyn NotificationSink>);
		let contact = Arc::new(ContactService::new(sink));

		Ok(BakeryEngine {
			config: self.config,
			storage,
			clock,
			directory,
			catalog,
			orders,
			lifecycle,
			admin,
			catalog_service,
			contact,
		})
	}
}
