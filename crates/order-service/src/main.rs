//! Main entry point for the order management service.
//!
//! This binary wires the configured storage backend to the order lifecycle
//! engine and exposes both over an HTTP API.

use clap::Parser;
use order_config::Config;
use order_core::OrderLifecycle;
use order_storage::{get_all_implementations, StorageInterface, StorageService};
use std::path::PathBuf;
use std::sync::Arc;

mod apis;
mod server;

/// Command-line arguments for the order service.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config.toml")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,
}

/// Main entry point for the order service.
///
/// This function:
/// 1. Parses command-line arguments
/// 2. Initializes logging infrastructure
/// 3. Loads configuration from file
/// 4. Wires the configured storage backend to the lifecycle engine
/// 5. Serves the HTTP API until interrupted
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	// Initialize tracing with env filter
	use tracing_subscriber::{fmt, EnvFilter};

	// Create env filter with default from args
	let default_directive = args.log_level.to_string();
	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

	fmt()
		.with_env_filter(env_filter)
		.with_thread_ids(true)
		.with_target(true)
		.init();

	tracing::info!("Started order service");

	// Load configuration
	let config = Config::from_file(args.config.to_str().unwrap()).await?;
	tracing::info!("Loaded configuration [storage: {}]", config.storage.primary);

	// Wire the configured storage backend
	let backend = build_storage(&config)?;
	let storage = Arc::new(StorageService::new(backend));
	let lifecycle = Arc::new(OrderLifecycle::new(Arc::clone(&storage)));

	server::start_server(config.server.clone(), lifecycle, storage).await?;

	tracing::info!("Stopped order service");
	Ok(())
}

/// Builds the storage backend named by `storage.primary` in the
/// configuration.
///
/// The backend's own configuration section is passed to its factory and
/// then validated against the backend's configuration schema.
fn build_storage(config: &Config) -> Result<Box<dyn StorageInterface>, Box<dyn std::error::Error>> {
	let name = config.storage.primary.as_str();
	let factory = get_all_implementations()
		.into_iter()
		.find(|(impl_name, _)| *impl_name == name)
		.map(|(_, factory)| factory)
		.ok_or_else(|| format!("Unknown storage implementation: {}", name))?;

	let impl_config = config
		.storage
		.implementations
		.get(name)
		.cloned()
		.unwrap_or_else(|| toml::Value::Table(toml::Table::new()));

	let backend = factory(&impl_config)?;
	backend.config_schema().validate(&impl_config)?;

	tracing::info!("Using '{}' storage backend", name);
	Ok(backend)
}
