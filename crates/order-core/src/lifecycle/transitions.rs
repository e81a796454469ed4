//! Static order status transition table and validator.
//!
//! The table is built once at first use and never mutated, so it is safe to
//! share across concurrent requests without synchronization.

use once_cell::sync::Lazy;
use order_types::OrderStatus;
use std::collections::{HashMap, HashSet};

/// Valid status transitions. Key = current status, value = set of statuses
/// reachable from it in one step. Terminal statuses map to the empty set.
///
/// ```text
/// PENDING   -> CONFIRMED, CANCELLED
/// CONFIRMED -> SHIPPED, CANCELLED
/// SHIPPED   -> DELIVERED, CANCELLED
/// DELIVERED -> (terminal)
/// CANCELLED -> (terminal)
/// ```
static TRANSITIONS: Lazy<HashMap<OrderStatus, HashSet<OrderStatus>>> = Lazy::new(|| {
	let mut m = HashMap::new();
	m.insert(
		OrderStatus::Pending,
		HashSet::from([OrderStatus::Confirmed, OrderStatus::Cancelled]),
	);
	m.insert(
		OrderStatus::Confirmed,
		HashSet::from([OrderStatus::Shipped, OrderStatus::Cancelled]),
	);
	m.insert(
		OrderStatus::Shipped,
		HashSet::from([OrderStatus::Delivered, OrderStatus::Cancelled]),
	);
	m.insert(OrderStatus::Delivered, HashSet::new()); // terminal
	m.insert(OrderStatus::Cancelled, HashSet::new()); // terminal
	m
});

/// Returns the set of statuses reachable from `current` in one step.
///
/// Empty for terminal statuses. The table is total over the status enum,
/// so the lookup cannot fail.
pub fn allowed_next_statuses(current: &OrderStatus) -> &'static HashSet<OrderStatus> {
	// The table has an entry for every variant
	&TRANSITIONS[current]
}

/// Checks if a status transition is valid.
///
/// True iff `requested` is in the allowed set for `current`. No status's
/// allowed set contains itself, so self-loops are always invalid.
pub fn is_valid_transition(current: &OrderStatus, requested: &OrderStatus) -> bool {
	TRANSITIONS
		.get(current)
		.is_some_and(|set| set.contains(requested))
}

/// Returns an owned copy of the allowed set for `current`.
///
/// Exposed so callers (e.g. a UI) can discover legal actions without
/// attempting a transition. Never fails.
pub fn valid_next_statuses(current: &OrderStatus) -> HashSet<OrderStatus> {
	allowed_next_statuses(current).clone()
}
