//! Order collection endpoints: list, create, and fetch by id.

use crate::apis::problem_from_lifecycle;
use order_core::OrderLifecycle;
use order_types::{CreateOrderRequest, Order, ProblemDetail};
use tracing::{info, warn};

/// Lists all stored orders, oldest first.
pub async fn list_orders(lifecycle: &OrderLifecycle) -> Result<Vec<Order>, ProblemDetail> {
	lifecycle.list_orders().await.map_err(problem_from_lifecycle)
}

/// Creates a new order from a validated request.
pub async fn create_order(
	lifecycle: &OrderLifecycle,
	request: CreateOrderRequest,
) -> Result<Order, ProblemDetail> {
	request.validate()?;

	let order = lifecycle
		.create_order(request)
		.await
		.map_err(problem_from_lifecycle)?;

	info!(order_id = %order.id, "Order created via API");
	Ok(order)
}

/// Retrieves order details by ID.
pub async fn get_order(lifecycle: &OrderLifecycle, id: &str) -> Result<Order, ProblemDetail> {
	lifecycle.get_order(id).await.map_err(|e| {
		warn!("Order retrieval failed: {}", e);
		problem_from_lifecycle(e)
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use order_storage::{implementations::memory::MemoryStorage, StorageService};
	use order_types::OrderItem;
	use rust_decimal::Decimal;
	use std::sync::Arc;

	fn lifecycle() -> OrderLifecycle {
		let storage = Arc::new(StorageService::new(Box::new(MemoryStorage::new())));
		OrderLifecycle::new(storage)
	}

	fn request(customer: &str, items: Vec<OrderItem>) -> CreateOrderRequest {
		CreateOrderRequest {
			customer_name: customer.to_string(),
			items,
		}
	}

	fn widget() -> OrderItem {
		OrderItem {
			name: "Widget".to_string(),
			quantity: 2,
			unit_price: Decimal::new(1000, 2),
		}
	}

	#[tokio::test]
	async fn create_then_list_and_fetch() {
		let engine = lifecycle();

		let created = create_order(&engine, request("Alice", vec![widget()]))
			.await
			.unwrap();
		assert_eq!(created.total, Decimal::new(2000, 2));

		let listed = list_orders(&engine).await.unwrap();
		assert_eq!(listed.len(), 1);

		let fetched = get_order(&engine, &created.id).await.unwrap();
		assert_eq!(fetched.id, created.id);
	}

	#[tokio::test]
	async fn blank_customer_name_is_rejected() {
		let engine = lifecycle();
		let problem = create_order(&engine, request("  ", vec![widget()]))
			.await
			.unwrap_err();
		assert_eq!(problem.status, 400);
		assert_eq!(problem.field.as_deref(), Some("customerName"));
	}

	#[tokio::test]
	async fn empty_items_are_rejected() {
		let engine = lifecycle();
		let problem = create_order(&engine, request("Alice", vec![]))
			.await
			.unwrap_err();
		assert_eq!(problem.status, 400);
		assert_eq!(problem.field.as_deref(), Some("items"));
	}

	#[tokio::test]
	async fn unknown_order_is_a_404_problem() {
		let engine = lifecycle();
		let problem = get_order(&engine, "missing").await.unwrap_err();
		assert_eq!(problem.status, 404);
	}
}
