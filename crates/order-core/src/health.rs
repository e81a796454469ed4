//! Storage health probe for the health endpoint.

use order_storage::StorageService;
use order_types::StorageKey;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How long the storage probe may take before it is reported DOWN.
const STORAGE_PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Health summary returned by the health endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Health {
	/// Overall status: "UP" when every component is up, "DEGRADED" otherwise.
	pub status: String,
	/// Storage backend status: "UP" or "DOWN".
	pub storage: String,
	/// RFC 3339 timestamp of the check.
	pub timestamp: String,
}

/// Checks the health of the backend's components.
///
/// The storage backend is probed with a cheap existence check under a
/// timeout; a slow or failing backend degrades the overall status instead
/// of failing the endpoint.
pub async fn check_health(storage: &StorageService) -> Health {
	let probe = storage.exists(StorageKey::Orders.as_str(), "health-probe");
	let storage_status = match tokio::time::timeout(STORAGE_PROBE_TIMEOUT, probe).await {
		Ok(Ok(_)) => "UP",
		Ok(Err(e)) => {
			tracing::warn!("Storage health probe failed: {}", e);
			"DOWN"
		},
		Err(_) => {
			tracing::warn!("Storage health probe timed out");
			"DOWN"
		},
	};

	let status = if storage_status == "UP" {
		"UP"
	} else {
		"DEGRADED"
	};

	Health {
		status: status.to_string(),
		storage: storage_status.to_string(),
		timestamp: chrono::Utc::now().to_rfc3339(),
	}
}
