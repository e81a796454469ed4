//! API endpoint implementations for the order management service.

pub mod health;
pub mod orders;
pub mod status;

use order_core::LifecycleError;
use order_types::ProblemDetail;

/// Maps a lifecycle error to the problem detail returned to the caller.
///
/// Domain errors keep their message; storage faults are logged and surface
/// as a generic 500 with no internal detail.
pub(crate) fn problem_from_lifecycle(error: LifecycleError) -> ProblemDetail {
	match error {
		LifecycleError::OrderNotFound(id) => {
			ProblemDetail::not_found(format!("Order not found: {}", id))
		},
		error @ LifecycleError::InvalidTransition { .. } => {
			ProblemDetail::bad_request(error.to_string())
		},
		LifecycleError::Storage(message) => {
			tracing::error!("Storage failure: {}", message);
			ProblemDetail::internal()
		},
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use order_types::OrderStatus;

	#[test]
	fn not_found_maps_to_404() {
		let problem = problem_from_lifecycle(LifecycleError::OrderNotFound("abc".to_string()));
		assert_eq!(problem.status, 404);
		assert!(problem.detail.contains("abc"));
	}

	#[test]
	fn invalid_transition_maps_to_400_naming_both_statuses() {
		let problem = problem_from_lifecycle(LifecycleError::InvalidTransition {
			order_id: "abc".to_string(),
			from: OrderStatus::Pending,
			to: OrderStatus::Delivered,
		});
		assert_eq!(problem.status, 400);
		assert!(problem.detail.contains("PENDING"));
		assert!(problem.detail.contains("DELIVERED"));
	}

	#[test]
	fn storage_faults_map_to_opaque_500() {
		let problem =
			problem_from_lifecycle(LifecycleError::Storage("connection refused".to_string()));
		assert_eq!(problem.status, 500);
		assert!(!problem.detail.contains("connection refused"));
	}
}
