//! Port contracts for order lifecycle management.
//!
//! Ports define infrastructure-agnostic interfaces used by order services.

pub mod repository;

pub use repository::{OrderRepository, OrderRepositoryError, OrderRepositoryResult};
