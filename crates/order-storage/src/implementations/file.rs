//! File-based storage backend implementation for the order service.
//!
//! This module provides a file-backed implementation of the StorageInterface
//! trait. Each key is stored as one JSON file under a configurable base
//! directory, giving simple persistence without external dependencies.

use crate::{StorageError, StorageInterface};
use async_trait::async_trait;
use order_types::{ConfigSchema, Field, FieldType, Schema, ValidationError};
use std::path::PathBuf;
use tokio::fs;

/// File-based storage implementation.
///
/// Values are written to a temporary file and renamed into place, so a
/// single record is never observed half-written.
pub struct FileStorage {
	/// Base directory path for storing files.
	base_path: PathBuf,
}

impl FileStorage {
	/// Creates a new FileStorage instance with the specified base path.
	pub fn new(base_path: PathBuf) -> Self {
		Self { base_path }
	}

	/// Converts a storage key to a filesystem-safe file path.
	///
	/// Sanitizes the key by replacing problematic characters and
	/// appending a .json extension.
	fn get_file_path(&self, key: &str) -> PathBuf {
		let safe_key = sanitize_key(key);
		self.base_path.join(format!("{}.json", safe_key))
	}
}

/// Replaces path-hostile characters in a storage key.
fn sanitize_key(key: &str) -> String {
	key.replace(['/', ':'], "_")
}

#[async_trait]
impl StorageInterface for FileStorage {
	async fn get_bytes(&self, key: &str) -> Result<Vec<u8>, StorageError> {
		let path = self.get_file_path(key);

		match fs::read(&path).await {
			Ok(data) => Ok(data),
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StorageError::NotFound),
			Err(e) => Err(StorageError::Backend(e.to_string())),
		}
	}

	async fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
		let path = self.get_file_path(key);

		// Create parent directory if it doesn't exist
		if let Some(parent) = path.parent() {
			fs::create_dir_all(parent)
				.await
				.map_err(|e| StorageError::Backend(e.to_string()))?;
		}

		// Write atomically by writing to temp file then renaming
		let temp_path = path.with_extension("tmp");
		fs::write(&temp_path, value)
			.await
			.map_err(|e| StorageError::Backend(e.to_string()))?;

		fs::rename(&temp_path, &path)
			.await
			.map_err(|e| StorageError::Backend(e.to_string()))?;

		Ok(())
	}

	async fn delete(&self, key: &str) -> Result<(), StorageError> {
		let path = self.get_file_path(key);

		match fs::remove_file(&path).await {
			Ok(_) => Ok(()),
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
			Err(e) => Err(StorageError::Backend(e.to_string())),
		}
	}

	async fn exists(&self, key: &str) -> Result<bool, StorageError> {
		let path = self.get_file_path(key);
		Ok(path.exists())
	}

	async fn get_all_bytes(&self, prefix: &str) -> Result<Vec<Vec<u8>>, StorageError> {
		let file_prefix = sanitize_key(prefix);
		let mut values = Vec::new();

		let mut entries = match fs::read_dir(&self.base_path).await {
			Ok(entries) => entries,
			// No directory yet means nothing was ever stored
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(values),
			Err(e) => return Err(StorageError::Backend(e.to_string())),
		};

		while let Some(entry) = entries
			.next_entry()
			.await
			.map_err(|e| StorageError::Backend(e.to_string()))?
		{
			let path = entry.path();
			if path.extension() != Some(std::ffi::OsStr::new("json")) {
				continue;
			}

			let matches_prefix = path
				.file_stem()
				.and_then(|stem| stem.to_str())
				.is_some_and(|stem| stem.starts_with(&file_prefix));
			if !matches_prefix {
				continue;
			}

			match fs::read(&path).await {
				Ok(data) => values.push(data),
				Err(e) => {
					tracing::warn!("Skipping unreadable storage file {:?}: {}", path, e);
				},
			}
		}

		Ok(values)
	}

	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(FileStorageSchema)
	}
}

/// Configuration schema for FileStorage.
pub struct FileStorageSchema;

impl ConfigSchema for FileStorageSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let schema = Schema::new(
			vec![], // No required fields
			vec![
				Field::new("storage_path", FieldType::String).with_validator(|value| {
					if value.as_str().is_some_and(|s| s.trim().is_empty()) {
						Err("storage_path must not be blank".to_string())
					} else {
						Ok(())
					}
				}),
			],
		);

		schema.validate(config)
	}
}

/// Factory function to create a file storage backend from configuration.
///
/// Configuration parameters:
/// - `storage_path`: Base directory for file storage (default: "./data/orders")
pub fn create_storage(config: &toml::Value) -> Result<Box<dyn StorageInterface>, StorageError> {
	let storage_path = config
		.get("storage_path")
		.and_then(|v| v.as_str())
		.unwrap_or("./data/orders")
		.to_string();

	Ok(Box::new(FileStorage::new(PathBuf::from(storage_path))))
}

#[cfg(test)]
mod tests {
	use super::*;
	use tempfile::TempDir;

	fn storage_in(dir: &TempDir) -> FileStorage {
		FileStorage::new(dir.path().to_path_buf())
	}

	#[tokio::test]
	async fn test_basic_operations() {
		let dir = TempDir::new().unwrap();
		let storage = storage_in(&dir);

		let key = "orders:abc";
		let value = b"{\"id\":\"abc\"}".to_vec();
		storage.set_bytes(key, value.clone()).await.unwrap();

		let retrieved = storage.get_bytes(key).await.unwrap();
		assert_eq!(retrieved, value);
		assert!(storage.exists(key).await.unwrap());

		storage.delete(key).await.unwrap();
		assert!(!storage.exists(key).await.unwrap());
		assert!(matches!(
			storage.get_bytes(key).await,
			Err(StorageError::NotFound)
		));
	}

	#[tokio::test]
	async fn test_persists_across_instances() {
		let dir = TempDir::new().unwrap();

		let storage = storage_in(&dir);
		storage
			.set_bytes("orders:abc", b"payload".to_vec())
			.await
			.unwrap();
		drop(storage);

		let reopened = storage_in(&dir);
		let retrieved = reopened.get_bytes("orders:abc").await.unwrap();
		assert_eq!(retrieved, b"payload".to_vec());
	}

	#[tokio::test]
	async fn test_prefix_listing() {
		let dir = TempDir::new().unwrap();
		let storage = storage_in(&dir);

		storage.set_bytes("orders:1", b"a".to_vec()).await.unwrap();
		storage.set_bytes("orders:2", b"b".to_vec()).await.unwrap();
		storage.set_bytes("quotes:1", b"c".to_vec()).await.unwrap();

		let mut values = storage.get_all_bytes("orders:").await.unwrap();
		values.sort();
		assert_eq!(values, vec![b"a".to_vec(), b"b".to_vec()]);
	}

	#[tokio::test]
	async fn test_listing_empty_directory() {
		let dir = TempDir::new().unwrap();
		let storage = FileStorage::new(dir.path().join("never-created"));

		let values = storage.get_all_bytes("orders:").await.unwrap();
		assert!(values.is_empty());
	}

	#[test]
	fn test_schema_rejects_blank_path() {
		let schema = FileStorageSchema;
		let config: toml::Value = "storage_path = \"\"".parse().unwrap();
		assert!(schema.validate(&config).is_err());

		let config: toml::Value = "storage_path = \"./data\"".parse().unwrap();
		assert!(schema.validate(&config).is_ok());
	}
}
