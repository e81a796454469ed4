//! Order domain types for the order management backend.
//!
//! This module defines the order aggregate, its status enumeration, and the
//! request bodies accepted by the order endpoints.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ProblemDetail;

/// An order record managed by the backend.
///
/// Orders are created in `Pending` status and move through the lifecycle
/// state machine enforced by the lifecycle engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
	/// Unique identifier for this order. Immutable once created.
	pub id: String,
	/// Name of the customer who placed the order.
	#[serde(rename = "customerName")]
	pub customer_name: String,
	/// Line items that make up the order.
	pub items: Vec<OrderItem>,
	/// Total price, computed at creation from the line items.
	pub total: Decimal,
	/// Current status of the order.
	pub status: OrderStatus,
	/// Reason supplied when the order was cancelled.
	///
	/// Set only when the order transitions to `Cancelled` with a non-blank
	/// reason. Never cleared by later transitions; if the transition table
	/// is ever extended past the terminal states, the field stays as a
	/// historical record.
	#[serde(rename = "cancellationReason", skip_serializing_if = "Option::is_none")]
	pub cancellation_reason: Option<String>,
	/// Timestamp when this order was created (Unix seconds).
	#[serde(rename = "createdAt")]
	pub created_at: u64,
	/// Timestamp when this order was last updated (Unix seconds).
	#[serde(rename = "updatedAt")]
	pub updated_at: u64,
}

/// A single line item on an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
	/// Item name.
	pub name: String,
	/// Quantity ordered.
	pub quantity: u32,
	/// Price per unit.
	#[serde(rename = "unitPrice")]
	pub unit_price: Decimal,
}

impl OrderItem {
	/// Returns the line total (quantity times unit price).
	pub fn line_total(&self) -> Decimal {
		self.unit_price * Decimal::from(self.quantity)
	}
}

/// Status of an order in the management backend.
///
/// `Delivered` and `Cancelled` are terminal: the transition table defines
/// no outgoing edges for them.
#[derive(
	Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
	/// Order has been created but not yet confirmed.
	Pending,
	/// Order has been confirmed and is awaiting shipment.
	Confirmed,
	/// Order has been handed to the carrier.
	Shipped,
	/// Order has reached the customer (terminal).
	Delivered,
	/// Order has been cancelled (terminal).
	Cancelled,
}

impl fmt::Display for OrderStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			OrderStatus::Pending => write!(f, "PENDING"),
			OrderStatus::Confirmed => write!(f, "CONFIRMED"),
			OrderStatus::Shipped => write!(f, "SHIPPED"),
			OrderStatus::Delivered => write!(f, "DELIVERED"),
			OrderStatus::Cancelled => write!(f, "CANCELLED"),
		}
	}
}

/// Request body for creating a new order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderRequest {
	/// Name of the customer placing the order.
	#[serde(rename = "customerName")]
	pub customer_name: String,
	/// Line items; must be non-empty.
	pub items: Vec<OrderItem>,
}

impl CreateOrderRequest {
	/// Validates the request shape before an order is created from it.
	pub fn validate(&self) -> Result<(), ProblemDetail> {
		if self.customer_name.trim().is_empty() {
			return Err(ProblemDetail::validation(
				"Customer name must not be blank",
				Some("customerName"),
			));
		}
		if self.items.is_empty() {
			return Err(ProblemDetail::validation(
				"Order must contain at least one item",
				Some("items"),
			));
		}
		Ok(())
	}
}

/// Request body for order status updates.
///
/// A missing or unrecognized `targetStatus` never reaches this type: the
/// closed enum rejects it during deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdateRequest {
	/// The status the order should transition to.
	#[serde(rename = "targetStatus")]
	pub target_status: OrderStatus,
	/// Cancellation reason; required when `targetStatus` is `Cancelled`.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub reason: Option<String>,
}

impl StatusUpdateRequest {
	/// Validates that cancellation requests include a non-blank reason.
	///
	/// This is a request-shape rule only: it does not consult the stored
	/// order or the transition table. Requests failing it must never reach
	/// the lifecycle engine.
	pub fn validate(&self) -> Result<(), ProblemDetail> {
		if self.target_status == OrderStatus::Cancelled
			&& self.reason.as_deref().is_none_or(|r| r.trim().is_empty())
		{
			return Err(ProblemDetail::validation(
				"Cancellation reason is required when status is CANCELLED",
				Some("reason"),
			));
		}
		Ok(())
	}
}
