//! Factory registry for bakery implementations.
//!
//! Maps configured implementation names to their factory functions so the engine can
//! be built from configuration alone.

use bakery_config::Config;
use bakery_core::{BakeryBuilder, BakeryEngine, BakeryFactories};
use bakery_storage::StorageFactory;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Global registry for all implementation factories
pub struct FactoryRegistry {
	pub storage: HashMap<String, StorageFactory>,
}

impl FactoryRegistry {
	/// Create a new empty registry
	pub fn new() -> Self {
		Self {
			storage: HashMap::new(),
		}
	}

	/// Register a storage implementation
	pub fn register_storage(&mut self, name: impl Into<String>, factory: StorageFactory) {
		self.storage.insert(name.into(), factory);
	}
}

impl Default for FactoryRegistry {
	fn default() -> Self {
		Self::new()
	}
}

// Global registry instance
static REGISTRY: OnceLock<FactoryRegistry> = OnceLock::new();

/// Get the global factory registry, registering every known implementation on first use
pub fn get_registry() -> &'static FactoryRegistry {
	REGISTRY.get_or_init(|| {
		let mut registry = FactoryRegistry::new();
		for (name, factory) in bakery_storage::get_all_implementations() {
			tracing::debug!("Registering storage implementation: {}", name);
			registry.register_storage(name, factory);
		}
		registry
	})
}

/// Build the engine using the registry and config
pub fn build_engine_from_config(config: Config) -> Result<BakeryEngine, Box<dyn std::error::Error>> {
	let registry = get_registry();

	let mut storage_factories = HashMap::new();
	for name in config.storage.implementations.keys() {
		match registry.storage.get(name) {
			Some(factory) => {
				storage_factories.insert(name.clone(), *factory);
			},
			None => {
				let mut available: Vec<_> = registry.storage.keys().cloned().collect();
				available.sort();
				return Err(format!(
					"Unknown storage implementation '{}'. Available: [{}]",
					name,
					available.join(", ")
				)
				.into());
			},
		}
	}

	Ok(BakeryBuilder::new(config).build(BakeryFactories { storage_factories })?)
}

#[cfg(test)]
mod tests {
	use super::*;
	use bakery_config::ConfigBuilder;

	#[test]
	fn test_registry_has_all_storage() {
		let registry = get_registry();
		assert!(registry.storage.contains_key("memory"));
		assert!(registry.storage.contains_key("file"));
	}

	#[test]
	fn test_build_from_memory_config() {
		let engine = build_engine_from_config(ConfigBuilder::new().service_id("test-bakery").build())
			.unwrap();
		assert_eq!(engine.config().service.id, "test-bakery");
	}

	#[test]
	fn test_unknown_implementation() {
		let config = ConfigBuilder::new()
			.storage("redis", toml::Value::Table(toml::Table::new()))
			.build();
		let err = build_engine_from_config(config).err().unwrap();
		assert!(err.to_string().contains("Unknown storage implementation 'redis'"));
	}
}
