//! Service layer for order intake, status transitions and field edits.

use crate::order::{
    domain::{
        Actor, Order, OrderDomainError, OrderDraft, OrderFieldsUpdate, OrderFilter, OrderId,
        OrderStatus, Quantity, StatusChange, StatusHistoryEntry, optional_text, required_text,
    },
    ports::{OrderRepository, OrderRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Request payload for registering a new order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOrderRequest {
    reference: String,
    equipment: String,
    quantity: i64,
    code: Option<String>,
    service_description: String,
    system_image: Option<String>,
    status: OrderStatus,
    urgent: bool,
    created_by: Option<String>,
}

impl CreateOrderRequest {
    /// Creates a request with the required intake fields.
    ///
    /// The order starts as [`OrderStatus::Pending`] and not urgent.
    #[must_use]
    pub fn new(reference: impl Into<String>, equipment: impl Into<String>, quantity: i64) -> Self {
        Self {
            reference: reference.into(),
            equipment: equipment.into(),
            quantity,
            code: None,
            service_description: String::new(),
            system_image: None,
            status: OrderStatus::Pending,
            urgent: false,
            created_by: None,
        }
    }

    /// Sets the external order code.
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Sets the requested service description.
    #[must_use]
    pub fn with_service_description(mut self, description: impl Into<String>) -> Self {
        self.service_description = description.into();
        self
    }

    /// Sets the operating-system image label.
    #[must_use]
    pub fn with_system_image(mut self, image: impl Into<String>) -> Self {
        self.system_image = Some(image.into());
        self
    }

    /// Sets the initial status.
    #[must_use]
    pub fn with_status(mut self, status: OrderStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the urgent flag.
    #[must_use]
    pub fn with_urgent(mut self, urgent: bool) -> Self {
        self.urgent = urgent;
        self
    }

    /// Sets the identity registering the order.
    #[must_use]
    pub fn with_created_by(mut self, actor: impl Into<String>) -> Self {
        self.created_by = Some(actor.into());
        self
    }
}

/// Request payload for a status/urgency transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionOrderRequest {
    order_id: OrderId,
    status: OrderStatus,
    urgent: bool,
    actor: Actor,
}

impl TransitionOrderRequest {
    /// Creates a transition request.
    #[must_use]
    pub fn new(
        order_id: OrderId,
        status: OrderStatus,
        urgent: bool,
        actor: impl Into<String>,
    ) -> Self {
        Self {
            order_id,
            status,
            urgent,
            actor: Actor::new(actor),
        }
    }

    /// Returns the targeted order.
    #[must_use]
    pub const fn order_id(&self) -> OrderId {
        self.order_id
    }
}

/// Service-level errors for order lifecycle operations.
#[derive(Debug, Error)]
pub enum OrderLifecycleError {
    /// The referenced order does not exist.
    #[error("order not found: {0}")]
    NotFound(OrderId),
    /// Input validation failed.
    #[error(transparent)]
    Validation(#[from] OrderDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(OrderRepositoryError),
}

impl From<OrderRepositoryError> for OrderLifecycleError {
    fn from(err: OrderRepositoryError) -> Self {
        match err {
            OrderRepositoryError::NotFound(id) => Self::NotFound(id),
            other => Self::Repository(other),
        }
    }
}

/// Result type for order lifecycle service operations.
pub type OrderLifecycleResult<T> = Result<T, OrderLifecycleError>;

/// Order lifecycle orchestration service.
#[derive(Clone)]
pub struct OrderLifecycleService<R, C>
where
    R: OrderRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> OrderLifecycleService<R, C>
where
    R: OrderRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new order lifecycle service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Registers a new order at the back of the queue.
    ///
    /// # Errors
    ///
    /// Returns [`OrderLifecycleError::Validation`] when a required field is
    /// blank or the quantity is not positive, and
    /// [`OrderLifecycleError::Repository`] when persistence fails.
    pub async fn create_order(&self, request: CreateOrderRequest) -> OrderLifecycleResult<Order> {
        let draft = OrderDraft {
            id: OrderId::new(),
            code: optional_text(request.code),
            reference: required_text("reference", request.reference)?,
            equipment: required_text("equipment", request.equipment)?,
            service_description: request.service_description.trim().to_owned(),
            system_image: optional_text(request.system_image),
            quantity: Quantity::new(request.quantity)?,
            status: request.status,
            urgent: request.urgent,
            created_by: Actor::new(request.created_by.unwrap_or_default()),
            created_at: self.clock.utc(),
        };

        let order = self.repository.create(draft).await?;
        info!(
            order_id = %order.id(),
            status = order.status().as_str(),
            priority = order.priority().value(),
            "order created"
        );
        Ok(order)
    }

    /// Sets an order's status and urgent flag.
    ///
    /// # Errors
    ///
    /// Returns [`OrderLifecycleError::NotFound`] when the order does not exist
    /// and [`OrderLifecycleError::Repository`] when persistence fails.
    pub async fn apply_transition(
        &self,
        request: TransitionOrderRequest,
    ) -> OrderLifecycleResult<Order> {
        let change = StatusChange {
            status: request.status,
            urgent: request.urgent,
            actor: request.actor,
            at: self.clock.utc(),
        };
        let order = self
            .repository
            .apply_transition(request.order_id, &change)
            .await?;
        info!(
            order_id = %order.id(),
            status = order.status().as_str(),
            urgent = order.is_urgent(),
            actor = change.actor.as_str(),
            "order transitioned"
        );
        Ok(order)
    }

    /// Edits non-status fields of an order.
    ///
    /// # Errors
    ///
    /// Returns [`OrderLifecycleError::NotFound`] when the order does not exist
    /// and [`OrderLifecycleError::Repository`] when persistence fails.
    pub async fn update_fields(
        &self,
        id: OrderId,
        update: OrderFieldsUpdate,
    ) -> OrderLifecycleResult<Order> {
        let order = self.repository.update_fields(id, &update).await?;
        info!(order_id = %id, actor = update.actor().as_str(), "order fields updated");
        Ok(order)
    }

    /// Deletes an order together with its history.
    ///
    /// # Errors
    ///
    /// Returns [`OrderLifecycleError::NotFound`] when the order does not exist
    /// and [`OrderLifecycleError::Repository`] when persistence fails.
    pub async fn delete_order(&self, id: OrderId) -> OrderLifecycleResult<()> {
        self.repository.delete(id).await?;
        info!(order_id = %id, "order deleted");
        Ok(())
    }

    /// Retrieves an order by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`OrderLifecycleError::Repository`] when persistence lookup
    /// fails.
    pub async fn find_order(&self, id: OrderId) -> OrderLifecycleResult<Option<Order>> {
        Ok(self.repository.find_by_id(id).await?)
    }

    /// Lists orders matching a filter in queue order.
    ///
    /// # Errors
    ///
    /// Returns [`OrderLifecycleError::Repository`] when persistence lookup
    /// fails.
    pub async fn list_orders(&self, filter: &OrderFilter) -> OrderLifecycleResult<Vec<Order>> {
        Ok(self.repository.list(filter).await?)
    }

    /// Returns an order's status history, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`OrderLifecycleError::NotFound`] when the order does not exist
    /// and [`OrderLifecycleError::Repository`] when persistence fails.
    pub async fn history(&self, id: OrderId) -> OrderLifecycleResult<Vec<StatusHistoryEntry>> {
        Ok(self.repository.history(id).await?)
    }
}
