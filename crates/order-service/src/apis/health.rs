//! Health endpoint implementation.

use order_core::Health;
use order_storage::StorageService;

/// Runs the storage health probe and returns the health summary.
pub async fn check(storage: &StorageService) -> Health {
	order_core::check_health(storage).await
}

#[cfg(test)]
mod tests {
	use super::*;
	use order_storage::implementations::memory::MemoryStorage;

	#[tokio::test]
	async fn reports_up_with_a_working_backend() {
		let storage = StorageService::new(Box::new(MemoryStorage::new()));
		let health = check(&storage).await;
		assert_eq!(health.status, "UP");
	}
}
