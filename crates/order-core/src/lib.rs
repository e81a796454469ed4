//! Core engine for the order management backend.
//!
//! This crate hosts the order status lifecycle engine: the static
//! transition table, the transition validator, and the orchestrator that
//! loads an order, applies a transition, and persists the result. It also
//! provides the storage health probe used by the health endpoint.

/// Storage health probe.
pub mod health;
/// Order lifecycle engine: transition table, validator, orchestrator.
pub mod lifecycle;

pub use health::{check_health, Health};
pub use lifecycle::{
	is_valid_transition, valid_next_statuses, LifecycleError, OrderLifecycle,
};
