//! Repository port for order persistence and status history.

use crate::order::domain::{
    Order, OrderDraft, OrderFieldsUpdate, OrderFilter, OrderId, StatusChange, StatusHistoryEntry,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for order repository operations.
pub type OrderRepositoryResult<T> = Result<T, OrderRepositoryError>;

/// Order persistence contract.
///
/// Every mutating method is a single unit of work: an order row and the
/// history rows that belong to the same change are written or rolled back
/// together.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Stores a new order with its creation history entry.
    ///
    /// The priority is `max(existing priorities, 0) + 1`, computed inside the
    /// same unit of work as the insert.
    ///
    /// # Errors
    ///
    /// Returns [`OrderRepositoryError::DuplicateOrder`] when the identifier or
    /// external code already exists.
    async fn create(&self, draft: OrderDraft) -> OrderRepositoryResult<Order>;

    /// Applies a status change and appends the matching history entry.
    ///
    /// # Errors
    ///
    /// Returns [`OrderRepositoryError::NotFound`] when the order does not
    /// exist.
    async fn apply_transition(
        &self,
        id: OrderId,
        change: &StatusChange,
    ) -> OrderRepositoryResult<Order>;

    /// Applies non-status field edits.
    ///
    /// # Errors
    ///
    /// Returns [`OrderRepositoryError::NotFound`] when the order does not
    /// exist.
    async fn update_fields(
        &self,
        id: OrderId,
        update: &OrderFieldsUpdate,
    ) -> OrderRepositoryResult<Order>;

    /// Deletes an order together with its whole history.
    ///
    /// # Errors
    ///
    /// Returns [`OrderRepositoryError::NotFound`] when the order does not
    /// exist.
    async fn delete(&self, id: OrderId) -> OrderRepositoryResult<()>;

    /// Finds an order by identifier.
    ///
    /// Returns `None` when the order does not exist.
    async fn find_by_id(&self, id: OrderId) -> OrderRepositoryResult<Option<Order>>;

    /// Lists orders matching `filter`, urgent first, then by priority and
    /// creation time.
    async fn list(&self, filter: &OrderFilter) -> OrderRepositoryResult<Vec<Order>>;

    /// Returns the history of an order, oldest entry first.
    ///
    /// # Errors
    ///
    /// Returns [`OrderRepositoryError::NotFound`] when the order does not
    /// exist.
    async fn history(&self, id: OrderId) -> OrderRepositoryResult<Vec<StatusHistoryEntry>>;
}

/// Errors returned by order repository implementations.
#[derive(Debug, Clone, Error)]
pub enum OrderRepositoryError {
    /// An order with the same identifier or external code already exists.
    #[error("duplicate order: {0}")]
    DuplicateOrder(String),

    /// The order was not found.
    #[error("order not found: {0}")]
    NotFound(OrderId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl OrderRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
