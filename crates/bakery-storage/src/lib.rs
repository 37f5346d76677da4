//! Storage for the bakery order service.
//!
//! Backends implement a small byte-oriented key-value interface. [`StorageService`]
//! layers typed JSON records, `namespace:id` keys and id sequences on top of it.

use async_trait::async_trait;
use bakery_types::{BakeryError, ConfigSchema, ImplementationRegistry, StorageKey};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;

/// Re-export implementations
pub mod implementations {
	pub mod file;
	pub mod memory;
}

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
	/// Error that occurs when a requested item is not found.
	#[error("Not found")]
	NotFound,
	/// A create-only write found the key already present.
	#[error("Already exists: {0}")]
	AlreadyExists(String),
	/// Error that occurs during serialization/deserialization.
	#[error("Serialization error: {0}")]
	Serialization(String),
	/// Error that occurs in the storage backend.
	#[error("Backend error: {0}")]
	Backend(String),
	/// Error that occurs during configuration validation.
	#[error("Configuration error: {0}")]
	Configuration(String),
}

impl From<StorageError> for BakeryError {
	fn from(err: StorageError) -> Self {
		match err {
			StorageError::NotFound => BakeryError::not_found("Record not found"),
			StorageError::AlreadyExists(key) => {
				BakeryError::Conflict(format!("Record already exists: {}", key))
			},
			other => BakeryError::unavailable(format!("Storage unavailable: {}", other)),
		}
	}
}

/// Low-level interface implemented by storage backends.
///
/// Keys are `namespace:id` strings. Every write of a single key is atomic.
#[async_trait]
pub trait StorageInterface: Send + Sync {
	/// Retrieves raw bytes for the given key.
	async fn get_bytes(&self, key: &str) -> Result<Vec<u8>, StorageError>;

	/// Stores raw bytes, replacing any previous value.
	async fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError>;

	/// Stores raw bytes only if the key is absent, failing with `AlreadyExists`
	/// otherwise.
	async fn create_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError>;

	/// Deletes the value associated with the given key. Deleting a missing key is not
	/// an error.
	async fn delete(&self, key: &str) -> Result<(), StorageError>;

	/// Checks if a key exists in storage.
	async fn exists(&self, key: &str) -> Result<bool, StorageError>;

	/// Lists the ids stored under a namespace, in no particular order.
	async fn list_ids(&self, namespace: &str) -> Result<Vec<String>, StorageError>;

	/// Returns the configuration schema for validation.
	fn config_schema(&self) -> Box<dyn ConfigSchema>;
}

/// Type alias for storage factory functions.
pub type StorageFactory = fn(&toml::Value) -> Result<Box<dyn StorageInterface>, StorageError>;

/// Registry trait for storage implementations.
pub trait StorageRegistry: ImplementationRegistry<Factory = StorageFactory> {}

/// Get all registered storage implementations as (name, factory) pairs.
pub fn get_all_implementations() -> Vec<(&'static str, StorageFactory)> {
	use implementations::{file, memory};

	vec![
		(file::Registry::NAME, file::Registry::factory()),
		(memory::Registry::NAME, memory::Registry::factory()),
	]
}

fn storage_key(namespace: &str, id: &str) -> String {
	format!("{}:{}", namespace, id)
}

/// Typed storage on top of a backend.
///
/// Values are stored as JSON.
pub struct StorageService {
	/// The underlying storage backend implementation.
	backend: Box<dyn StorageInterface>,
	/// Serializes sequence read-modify-write cycles.
	sequence_lock: Mutex<()>,
}

impl StorageService {
	pub fn new(backend: Box<dyn StorageInterface>) -> Self {
		Self {
			backend,
			sequence_lock: Mutex::new(()),
		}
	}

	/// Stores a value, creating or overwriting it.
	pub async fn store<T: Serialize>(
		&self,
		namespace: &str,
		id: &str,
		data: &T,
	) -> Result<(), StorageError> {
		let bytes = encode(data)?;
		self.backend.set_bytes(&storage_key(namespace, id), bytes).await
	}

	/// Stores a value that must not exist yet.
	pub async fn insert_new<T: Serialize>(
		&self,
		namespace: &str,
		id: &str,
		data: &T,
	) -> Result<(), StorageError> {
		let bytes = encode(data)?;
		self.backend
			.create_bytes(&storage_key(namespace, id), bytes)
			.await
	}

	/// Retrieves and deserializes a value from storage.
	pub async fn retrieve<T: DeserializeOwned>(
		&self,
		namespace: &str,
		id: &str,
	) -> Result<T, StorageError> {
		let bytes = self.backend.get_bytes(&storage_key(namespace, id)).await?;
		decode(&bytes)
	}

	/// Like [`retrieve`](Self::retrieve) but maps a missing key to `None`.
	pub async fn retrieve_optional<T: DeserializeOwned>(
		&self,
		namespace: &str,
		id: &str,
	) -> Result<Option<T>, StorageError> {
		match self.retrieve(namespace, id).await {
			Ok(value) => Ok(Some(value)),
			Err(StorageError::NotFound) => Ok(None),
			Err(e) => Err(e),
		}
	}

	/// Retrieves every value in a namespace.
	///
	/// Keys removed between listing and reading are skipped.
	pub async fn retrieve_all<T: DeserializeOwned>(
		&self,
		namespace: &str,
	) -> Result<Vec<T>, StorageError> {
		let ids = self.backend.list_ids(namespace).await?;
		let mut values = Vec::with_capacity(ids.len());
		for id in ids {
			if let Some(value) = self.retrieve_optional(namespace, &id).await? {
				values.push(value);
			}
		}
		Ok(values)
	}

	/// Updates an existing value, failing with `NotFound` if it is absent.
	pub async fn update<T: Serialize>(
		&self,
		namespace: &str,
		id: &str,
		data: &T,
	) -> Result<(), StorageError> {
		let key = storage_key(namespace, id);
		if !self.backend.exists(&key).await? {
			return Err(StorageError::NotFound);
		}
		self.backend.set_bytes(&key, encode(data)?).await
	}

	/// Removes a value from storage.
	pub async fn remove(&self, namespace: &str, id: &str) -> Result<(), StorageError> {
		self.backend.delete(&storage_key(namespace, id)).await
	}

	/// Checks if a value exists in storage.
	pub async fn exists(&self, namespace: &str, id: &str) -> Result<bool, StorageError> {
		self.backend.exists(&storage_key(namespace, id)).await
	}

	/// Counts the records in a namespace.
	pub async fn count(&self, namespace: &str) -> Result<u64, StorageError> {
		Ok(self.backend.list_ids(namespace).await?.len() as u64)
	}

	/// Allocates the next id for a namespace. Ids start at 1 and are never reused.
	pub async fn next_id(&self, namespace: StorageKey) -> Result<u64, StorageError> {
		let _guard = self.sequence_lock.lock().await;
		let current = self.current_sequence(namespace).await?;
		let next = current
			.checked_add(1)
			.ok_or_else(|| StorageError::Backend(format!("{} sequence exhausted", namespace.as_str())))?;
		self.store(StorageKey::Sequences.as_str(), namespace.as_str(), &next)
			.await?;
		Ok(next)
	}

	/// Advances a namespace's sequence so it never hands out `id` or anything below.
	///
	/// Used when records are written with explicit ids, for example by seeding.
	pub async fn reserve_id(&self, namespace: StorageKey, id: u64) -> Result<(), StorageError> {
		let _guard = self.sequence_lock.lock().await;
		if self.current_sequence(namespace).await? < id {
			self.store(StorageKey::Sequences.as_str(), namespace.as_str(), &id)
				.await?;
		}
		Ok(())
	}

	async fn current_sequence(&self, namespace: StorageKey) -> Result<u64, StorageError> {
		Ok(self
			.retrieve_optional::<u64>(StorageKey::Sequences.as_str(), namespace.as_str())
			.await?
			.unwrap_or(0))
	}
}

fn encode<T: Serialize>(data: &T) -> Result<Vec<u8>, StorageError> {
	serde_json::to_vec(data).map_err(|e| StorageError::Serialization(e.to_string()))
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, StorageError> {
	serde_json::from_slice(bytes).map_err(|e| StorageError::Serialization(e.to_string()))
}
