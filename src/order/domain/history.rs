//! Append-only status history records.

use super::{Actor, OrderId, OrderStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One recorded status change of an order.
///
/// Entries are never mutated after insertion. A `previous_status` of `None`
/// marks the creation of the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusHistoryEntry {
    order_id: OrderId,
    previous_status: Option<OrderStatus>,
    new_status: OrderStatus,
    changed_at: DateTime<Utc>,
    changed_by: Actor,
}

impl StatusHistoryEntry {
    /// Records the initial status of a freshly created order.
    #[must_use]
    pub const fn created(
        order_id: OrderId,
        status: OrderStatus,
        changed_at: DateTime<Utc>,
        changed_by: Actor,
    ) -> Self {
        Self {
            order_id,
            previous_status: None,
            new_status: status,
            changed_at,
            changed_by,
        }
    }

    /// Records a change between two statuses.
    #[must_use]
    pub const fn changed(
        order_id: OrderId,
        previous_status: OrderStatus,
        new_status: OrderStatus,
        changed_at: DateTime<Utc>,
        changed_by: Actor,
    ) -> Self {
        Self {
            order_id,
            previous_status: Some(previous_status),
            new_status,
            changed_at,
            changed_by,
        }
    }

    /// Returns the owning order identifier.
    #[must_use]
    pub const fn order_id(&self) -> OrderId {
        self.order_id
    }

    /// Returns the status before the change, or `None` for creation.
    #[must_use]
    pub const fn previous_status(&self) -> Option<OrderStatus> {
        self.previous_status
    }

    /// Returns the status after the change.
    #[must_use]
    pub const fn new_status(&self) -> OrderStatus {
        self.new_status
    }

    /// Returns when the change happened.
    #[must_use]
    pub const fn changed_at(&self) -> DateTime<Utc> {
        self.changed_at
    }

    /// Returns who performed the change.
    #[must_use]
    pub const fn changed_by(&self) -> &Actor {
        &self.changed_by
    }

    /// Returns the label of the previous status, `CRIADO` for creation.
    #[must_use]
    pub fn previous_label(&self) -> &'static str {
        self.previous_status.map_or("CRIADO", OrderStatus::label)
    }
}
