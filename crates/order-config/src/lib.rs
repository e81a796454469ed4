//! Configuration module for the order management backend.
//!
//! This module provides structures and utilities for managing service
//! configuration. It supports loading configuration from TOML files and
//! provides validation to ensure all required configuration values are
//! properly set.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// Extract just the message without the huge input dump
		let message = err.message().to_string();
		ConfigError::Parse(message)
	}
}

/// Main configuration structure for the order management backend.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	/// Configuration for the HTTP server.
	#[serde(default)]
	pub server: ServerConfig,
	/// Configuration for the storage backend.
	pub storage: StorageConfig,
}

/// Configuration for the HTTP server.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
	/// Host address to bind the server to.
	#[serde(default = "default_server_host")]
	pub host: String,
	/// Port to bind the server to.
	#[serde(default = "default_server_port")]
	pub port: u16,
}

impl Default for ServerConfig {
	fn default() -> Self {
		Self {
			host: default_server_host(),
			port: default_server_port(),
		}
	}
}

/// Returns the default server host.
fn default_server_host() -> String {
	"127.0.0.1".to_string()
}

/// Returns the default server port.
fn default_server_port() -> u16 {
	3000
}

/// Configuration for the storage backend.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
	/// Which implementation to use as primary.
	pub primary: String,
	/// Map of storage implementation names to their configurations.
	/// Each implementation has its own configuration format stored as raw
	/// TOML values and validated by the implementation's own schema.
	#[serde(default)]
	pub implementations: HashMap<String, toml::Value>,
}

impl Config {
	/// Loads configuration from a TOML file.
	pub async fn from_file(path: &str) -> Result<Self, ConfigError> {
		let content = tokio::fs::read_to_string(path).await?;
		content.parse()
	}

	/// Validates the configuration after parsing.
	///
	/// Checks cross-field constraints that serde cannot express: the
	/// primary storage implementation must be configured, and the server
	/// port must be non-zero.
	fn validate(&self) -> Result<(), ConfigError> {
		if self.server.port == 0 {
			return Err(ConfigError::Validation(
				"Server port must be non-zero".to_string(),
			));
		}

		if !self.storage.implementations.contains_key(&self.storage.primary) {
			return Err(ConfigError::Validation(format!(
				"Primary storage implementation '{}' is not configured under [storage.implementations]",
				self.storage.primary
			)));
		}

		Ok(())
	}
}

impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let config: Config = toml::from_str(s)?;
		config.validate()?;
		Ok(config)
	}
}
