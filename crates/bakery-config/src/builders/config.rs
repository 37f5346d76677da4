//! Fluent builder for `Config`, mainly for tests and local development.

use crate::{ApiConfig, Config, IdentityConfig, OrdersConfig, ServiceConfig, StorageConfig};
use bakery_types::SecretString;
use std::collections::HashMap;

/// Builder for creating `Config` instances with a fluent API.
///
/// Defaults to in-memory storage, a fixed development secret and no API server.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
	service_id: String,
	storage_primary: String,
	storage_implementations: HashMap<String, toml::Value>,
	token_secret: SecretString,
	token_ttl_seconds: u64,
	orders: OrdersConfig,
	api: Option<ApiConfig>,
}

impl Default for ConfigBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigBuilder {
	pub fn new() -> Self {
		let mut storage_implementations = HashMap::new();
		storage_implementations.insert(
			"memory".to_string(),
			toml::Value::Table(toml::Table::new()),
		);
		Self {
			service_id: "bakery-test".to_string(),
			storage_primary: "memory".to_string(),
			storage_implementations,
			token_secret: SecretString::from("development-only-token-secret"),
			token_ttl_seconds: 3600,
			orders: OrdersConfig::default(),
			api: None,
		}
	}

	pub fn service_id(mut self, id: impl Into<String>) -> Self {
		self.service_id = id.into();
		self
	}

	/// Selects the primary storage backend and registers its configuration.
	pub fn storage(mut self, primary: impl Into<String>, config: toml::Value) -> Self {
		let primary = primary.into();
		self.storage_implementations.insert(primary.clone(), config);
		self.storage_primary = primary;
		self
	}

	pub fn token_secret(mut self, secret: impl Into<String>) -> Self {
		self.token_secret = SecretString::new(secret.into());
		self
	}

	pub fn token_ttl_seconds(mut self, ttl: u64) -> Self {
		self.token_ttl_seconds = ttl;
		self
	}

	pub fn page_sizes(mut self, default_page_size: u32, max_page_size: u32) -> Self {
		self.orders.default_page_size = default_page_size;
		self.orders.max_page_size = max_page_size;
		self
	}

	pub fn recent_window_days(mut self, days: u32) -> Self {
		self.orders.recent_window_days = days;
		self
	}

	/// Sets the API configuration.
	pub fn api(mut self, api: Option<ApiConfig>) -> Self {
		self.api = api;
		self
	}

	/// Builds the `Config` with the configured values.
	pub fn build(self) -> Config {
		Config {
			service: ServiceConfig {
				id: self.service_id,
			},
			storage: StorageConfig {
				primary: self.storage_primary,
				implementations: self.storage_implementations,
			},
			identity: IdentityConfig {
				token_secret: self.token_secret,
				token_ttl_seconds: self.token_ttl_seconds,
			},
			orders: self.orders,
			api: self.api,
		}
	}
}
