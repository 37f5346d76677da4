//! File-based storage backend.
//!
//! Each record is one file at `<storage_path>/<namespace>/<id>.bin`. Writes go to a
//! temporary file that is renamed over the target, so a reader sees either the old or
//! the new value. The directory is locked for the lifetime of the backend so that two
//! processes never write the same store.

use crate::{StorageError, StorageFactory, StorageInterface, StorageRegistry};
use async_trait::async_trait;
use bakery_types::{ConfigSchema, Field, FieldType, ImplementationRegistry, Schema, ValidationError};
use fs2::FileExt;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

const LOCK_FILE: &str = ".lock";
const DEFAULT_STORAGE_PATH: &str = "./data/storage";

/// Persists records as individual files.
pub struct FileStorage {
	base_path: PathBuf,
	/// Flush file contents to disk before the rename.
	fsync: bool,
	/// Serializes writes so create-only checks cannot race within the process.
	write_lock: Mutex<()>,
	/// Held open for its exclusive lock; released on drop.
	_dir_lock: std::fs::File,
}

impl FileStorage {
	/// Opens (creating if needed) a store rooted at `base_path`.
	///
	/// Fails if another process already holds the directory.
	pub fn open(base_path: impl Into<PathBuf>, fsync: bool) -> Result<Self, StorageError> {
		let base_path = base_path.into();
		std::fs::create_dir_all(&base_path).map_err(|e| {
			StorageError::Backend(format!("Cannot create {}: {}", base_path.display(), e))
		})?;

		let lock = std::fs::OpenOptions::new()
			.create(true)
			.truncate(false)
			.write(true)
			.open(base_path.join(LOCK_FILE))
			.map_err(|e| StorageError::Backend(e.to_string()))?;
		lock.try_lock_exclusive().map_err(|_| {
			StorageError::Backend(format!(
				"Storage directory {} is in use by another process",
				base_path.display()
			))
		})?;

		tracing::debug!(path = %base_path.display(), "Opened file storage");

		Ok(Self {
			base_path,
			fsync,
			write_lock: Mutex::new(()),
			_dir_lock: lock,
		})
	}

	fn namespace_dir(&self, namespace: &str) -> PathBuf {
		self.base_path.join(encode_component(namespace))
	}

	/// Maps `namespace:id` to its file path.
	fn get_file_path(&self, key: &str) -> Result<PathBuf, StorageError> {
		let (namespace, id) = key
			.split_once(':')
			.ok_or_else(|| StorageError::Backend(format!("Malformed storage key: {}", key)))?;
		Ok(self
			.namespace_dir(namespace)
			.join(format!("{}.bin", encode_component(id))))
	}

	async fn write_file(&self, path: &Path, value: &[u8]) -> Result<(), StorageError> {
		if let Some(parent) = path.parent() {
			fs::create_dir_all(parent)
				.await
				.map_err(|e| StorageError::Backend(e.to_string()))?;
		}

		let temp_path = path.with_extension("tmp");
		let mut file = fs::File::create(&temp_path)
			.await
			.map_err(|e| StorageError::Backend(e.to_string()))?;
		file.write_all(value)
			.await
			.map_err(|e| StorageError::Backend(e.to_string()))?;
		if self.fsync {
			file.sync_all()
				.await
				.map_err(|e| StorageError::Backend(e.to_string()))?;
		}
		drop(file);

		fs::rename(&temp_path, path)
			.await
			.map_err(|e| StorageError::Backend(e.to_string()))
	}
}

#[async_trait]
impl StorageInterface for FileStorage {
	async fn get_bytes(&self, key: &str) -> Result<Vec<u8>, StorageError> {
		let path = self.get_file_path(key)?;
		match fs::read(&path).await {
			Ok(data) => Ok(data),
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StorageError::NotFound),
			Err(e) => Err(StorageError::Backend(e.to_string())),
		}
	}

	async fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
		let path = self.get_file_path(key)?;
		let _guard = self.write_lock.lock().await;
		self.write_file(&path, &value).await
	}

	async fn create_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
		let path = self.get_file_path(key)?;
		let _guard = self.write_lock.lock().await;
		if fs::try_exists(&path)
			.await
			.map_err(|e| StorageError::Backend(e.to_string()))?
		{
			return Err(StorageError::AlreadyExists(key.to_string()));
		}
		self.write_file(&path, &value).await
	}

	async fn delete(&self, key: &str) -> Result<(), StorageError> {
		let path = self.get_file_path(key)?;
		let _guard = self.write_lock.lock().await;
		match fs::remove_file(&path).await {
			Ok(_) => Ok(()),
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
			Err(e) => Err(StorageError::Backend(e.to_string())),
		}
	}

	async fn exists(&self, key: &str) -> Result<bool, StorageError> {
		let path = self.get_file_path(key)?;
		fs::try_exists(&path)
			.await
			.map_err(|e| StorageError::Backend(e.to_string()))
	}

	async fn list_ids(&self, namespace: &str) -> Result<Vec<String>, StorageError> {
		let dir = self.namespace_dir(namespace);
		let mut entries = match fs::read_dir(&dir).await {
			Ok(entries) => entries,
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
			Err(e) => return Err(StorageError::Backend(e.to_string())),
		};

		let mut ids = Vec::new();
		while let Some(entry) = entries
			.next_entry()
			.await
			.map_err(|e| StorageError::Backend(e.to_string()))?
		{
			let path = entry.path();
			if path.extension() != Some(std::ffi::OsStr::new("bin")) {
				continue;
			}
			let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
				tracing::debug!("Skipping non UTF-8 file name {:?}", path);
				continue;
			};
			match decode_component(stem) {
				Some(id) => ids.push(id),
				None => tracing::debug!("Skipping undecodable file name {:?}", path),
			}
		}
		Ok(ids)
	}

	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(FileStorageSchema)
	}
}

/// Percent-encodes everything outside a conservative file-name alphabet.
fn encode_component(raw: &str) -> String {
	let mut out = String::with_capacity(raw.len());
	for byte in raw.bytes() {
		match byte {
			b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'_' | b'@' | b'+' => {
				out.push(byte as char)
			},
			// '.' is encoded so ids can never collide with the extension or ".."
			_ => out.push_str(&format!("%{:02X}", byte)),
		}
	}
	out
}

fn decode_component(encoded: &str) -> Option<String> {
	let bytes = encoded.as_bytes();
	let mut out = Vec::with_capacity(bytes.len());
	let mut i = 0;
	while i < bytes.len() {
		if bytes[i] == b'%' {
			let hex = encoded.get(i + 1..i + 3)?;
			out.push(u8::from_str_radix(hex, 16).ok()?);
			i += 3;
		} else {
			out.push(bytes[i]);
			i += 1;
		}
	}
	String::from_utf8(out).ok()
}

/// Configuration schema for FileStorage.
pub struct FileStorageSchema;

impl ConfigSchema for FileStorageSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let schema = Schema::new(
			vec![],
			vec![
				Field::new("storage_path", FieldType::String).with_validator(|value| {
					match value.as_str() {
						Some(path) if path.trim().is_empty() => {
							Err("storage_path cannot be empty".to_string())
						},
						_ => Ok(()),
					}
				}),
				Field::new("fsync", FieldType::Boolean),
			],
		)
		.strict();
		schema.validate(config)
	}
}

/// Factory function to create a file storage backend from configuration.
///
/// Configuration parameters:
/// - `storage_path`: Base directory (default: "./data/storage")
/// - `fsync`: Flush each write to disk before it becomes visible (default: true)
pub fn create_storage(config: &toml::Value) -> Result<Box<dyn StorageInterface>, StorageError> {
	FileStorageSchema
		.validate(config)
		.map_err(|e| StorageError::Configuration(e.to_string()))?;

	let storage_path = config
		.get("storage_path")
		.and_then(|v| v.as_str())
		.unwrap_or(DEFAULT_STORAGE_PATH);
	let fsync = config
		.get("fsync")
		.and_then(|v| v.as_bool())
		.unwrap_or(true);

	Ok(Box::new(FileStorage::open(storage_path, fsync)?))
}

/// Registry for the file storage implementation.
pub struct Registry;

impl ImplementationRegistry for Registry {
	const NAME: &'static str = "file";
	type Factory = StorageFactory;

	fn factory() -> Self::Factory {
		create_storage
	}
}

impl StorageRegistry for Registry {}
