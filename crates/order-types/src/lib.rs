//! Common types module for the order management backend.
//!
//! This module defines the core data types and structures shared by the
//! storage, lifecycle, and API layers. It provides a centralized location
//! for shared types to ensure consistency across all components.

/// API types for HTTP endpoints, including problem-detail error payloads.
pub mod api;
/// Order domain types: orders, items, statuses, and request bodies.
pub mod order;
/// Storage types for managing persistent data.
pub mod storage;
/// Configuration validation types for ensuring type-safe configurations.
pub mod validation;

// Re-export all types for convenient access
pub use api::*;
pub use order::*;
pub use storage::*;
pub use validation::*;
