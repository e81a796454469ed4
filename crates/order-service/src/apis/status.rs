//! Order status endpoints: transition an order and query its legal next
//! statuses.

use crate::apis::problem_from_lifecycle;
use order_core::OrderLifecycle;
use order_types::{Order, OrderStatus, ProblemDetail, StatusUpdateRequest};
use tracing::warn;

/// Updates the status of an order.
///
/// The request guard runs first; a cancellation without a reason never
/// reaches the lifecycle engine.
pub async fn update_status(
	lifecycle: &OrderLifecycle,
	id: &str,
	request: StatusUpdateRequest,
) -> Result<Order, ProblemDetail> {
	request.validate()?;

	lifecycle
		.update_status(id, request.target_status, request.reason.as_deref())
		.await
		.map_err(|e| {
			warn!("Status update failed: {}", e);
			problem_from_lifecycle(e)
		})
}

/// Gets valid next statuses for an order.
///
/// Resolves the order's actual current status, then consults the
/// transition table. The result is sorted for stable output.
pub async fn next_statuses(
	lifecycle: &OrderLifecycle,
	id: &str,
) -> Result<Vec<OrderStatus>, ProblemDetail> {
	let statuses = lifecycle
		.next_statuses_for(id)
		.await
		.map_err(problem_from_lifecycle)?;

	let mut statuses: Vec<OrderStatus> = statuses.into_iter().collect();
	statuses.sort();
	Ok(statuses)
}
