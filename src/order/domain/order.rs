//! Order aggregate root and the status transition engine.

use super::{
    Actor, OrderDomainError, OrderId, OrderStatus, Priority, Quantity, StatusHistoryEntry,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Service order aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    code: Option<String>,
    reference: String,
    equipment: String,
    service_description: String,
    system_image: Option<String>,
    quantity: Quantity,
    status: OrderStatus,
    urgent: bool,
    priority: Priority,
    created_at: DateTime<Utc>,
    concluded_at: Option<DateTime<Utc>>,
    last_modified_by: Actor,
}

/// Validated intake data for a new order.
///
/// The priority is not part of the draft; the repository assigns it when the
/// order is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDraft {
    /// Identifier minted for the new order.
    pub id: OrderId,
    /// Optional external order code.
    pub code: Option<String>,
    /// Project or voucher reference.
    pub reference: String,
    /// Equipment model.
    pub equipment: String,
    /// Requested service.
    pub service_description: String,
    /// Optional operating-system image label.
    pub system_image: Option<String>,
    /// Requested machine count.
    pub quantity: Quantity,
    /// Initial status.
    pub status: OrderStatus,
    /// Initial urgent flag.
    pub urgent: bool,
    /// Identity registering the order.
    pub created_by: Actor,
    /// Intake timestamp.
    pub created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted order aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedOrderData {
    /// Persisted order identifier.
    pub id: OrderId,
    /// Persisted external code.
    pub code: Option<String>,
    /// Persisted reference.
    pub reference: String,
    /// Persisted equipment.
    pub equipment: String,
    /// Persisted service description.
    pub service_description: String,
    /// Persisted image label.
    pub system_image: Option<String>,
    /// Persisted quantity.
    pub quantity: Quantity,
    /// Persisted status.
    pub status: OrderStatus,
    /// Persisted urgent flag.
    pub urgent: bool,
    /// Persisted priority.
    pub priority: Priority,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted completion timestamp.
    pub concluded_at: Option<DateTime<Utc>>,
    /// Persisted last editor.
    pub last_modified_by: Actor,
}

/// A requested status and urgency change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    /// Target status.
    pub status: OrderStatus,
    /// Target urgent flag.
    pub urgent: bool,
    /// Identity performing the change.
    pub actor: Actor,
    /// When the change happens.
    pub at: DateTime<Utc>,
}

/// Non-status field edits. Unset fields are left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderFieldsUpdate {
    reference: Option<String>,
    equipment: Option<String>,
    service_description: Option<String>,
    system_image: Option<Option<String>>,
    quantity: Option<Quantity>,
    priority: Option<Priority>,
    actor: Actor,
}

impl OrderFieldsUpdate {
    /// Starts an empty edit performed by `actor`.
    #[must_use]
    pub const fn new(actor: Actor) -> Self {
        Self {
            reference: None,
            equipment: None,
            service_description: None,
            system_image: None,
            quantity: None,
            priority: None,
            actor,
        }
    }

    /// Replaces the reference.
    ///
    /// # Errors
    ///
    /// Returns [`OrderDomainError::MissingField`] when the value is blank.
    pub fn with_reference(mut self, reference: impl Into<String>) -> Result<Self, OrderDomainError> {
        self.reference = Some(required_text("reference", reference)?);
        Ok(self)
    }

    /// Replaces the equipment.
    ///
    /// # Errors
    ///
    /// Returns [`OrderDomainError::MissingField`] when the value is blank.
    pub fn with_equipment(mut self, equipment: impl Into<String>) -> Result<Self, OrderDomainError> {
        self.equipment = Some(required_text("equipment", equipment)?);
        Ok(self)
    }

    /// Replaces the service description.
    #[must_use]
    pub fn with_service_description(mut self, description: impl Into<String>) -> Self {
        self.service_description = Some(description.into().trim().to_owned());
        self
    }

    /// Replaces or clears the image label.
    #[must_use]
    pub fn with_system_image(mut self, image: Option<String>) -> Self {
        self.system_image = Some(optional_text(image));
        self
    }

    /// Replaces the quantity.
    #[must_use]
    pub fn with_quantity(mut self, quantity: Quantity) -> Self {
        self.quantity = Some(quantity);
        self
    }

    /// Replaces the priority.
    #[must_use]
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Returns the editing identity.
    #[must_use]
    pub const fn actor(&self) -> &Actor {
        &self.actor
    }
}

impl Order {
    /// Creates an order from a draft and its assigned priority.
    ///
    /// Returns the order together with its creation history entry. A draft
    /// that starts in a terminal status is concluded at creation time.
    #[must_use]
    pub fn create(draft: OrderDraft, priority: Priority) -> (Self, StatusHistoryEntry) {
        let entry = StatusHistoryEntry::created(
            draft.id,
            draft.status,
            draft.created_at,
            draft.created_by.clone(),
        );
        let concluded_at = draft.status.is_terminal().then_some(draft.created_at);
        let order = Self {
            id: draft.id,
            code: draft.code,
            reference: draft.reference,
            equipment: draft.equipment,
            service_description: draft.service_description,
            system_image: draft.system_image,
            quantity: draft.quantity,
            status: draft.status,
            urgent: draft.urgent,
            priority,
            created_at: draft.created_at,
            concluded_at,
            last_modified_by: draft.created_by,
        };
        (order, entry)
    }

    /// Reconstructs an order from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedOrderData) -> Self {
        Self {
            id: data.id,
            code: data.code,
            reference: data.reference,
            equipment: data.equipment,
            service_description: data.service_description,
            system_image: data.system_image,
            quantity: data.quantity,
            status: data.status,
            urgent: data.urgent,
            priority: data.priority,
            created_at: data.created_at,
            concluded_at: data.concluded_at,
            last_modified_by: data.last_modified_by,
        }
    }

    /// Returns the order identifier.
    #[must_use]
    pub const fn id(&self) -> OrderId {
        self.id
    }

    /// Returns the external order code, if any.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// Returns the project or voucher reference.
    #[must_use]
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Returns the equipment model.
    #[must_use]
    pub fn equipment(&self) -> &str {
        &self.equipment
    }

    /// Returns the requested service.
    #[must_use]
    pub fn service_description(&self) -> &str {
        &self.service_description
    }

    /// Returns the image label, if any.
    #[must_use]
    pub fn system_image(&self) -> Option<&str> {
        self.system_image.as_deref()
    }

    /// Returns the machine count.
    #[must_use]
    pub const fn quantity(&self) -> Quantity {
        self.quantity
    }

    /// Returns the production status.
    #[must_use]
    pub const fn status(&self) -> OrderStatus {
        self.status
    }

    /// Returns whether the order is flagged urgent.
    #[must_use]
    pub const fn is_urgent(&self) -> bool {
        self.urgent
    }

    /// Returns the persisted priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns when the order first entered a terminal status.
    #[must_use]
    pub const fn concluded_at(&self) -> Option<DateTime<Utc>> {
        self.concluded_at
    }

    /// Returns the identity of the last editor.
    #[must_use]
    pub const fn last_modified_by(&self) -> &Actor {
        &self.last_modified_by
    }

    /// Returns `true` while the order is not Completed or Cancelled.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        !self.status.is_terminal()
    }

    /// Applies a status/urgency change.
    ///
    /// Any status may follow any status. The completion timestamp is stamped
    /// only on the first entry into a terminal status. A history entry is
    /// returned only when the status actually changes; the caller must persist
    /// it in the same unit of work as the order.
    pub fn apply_transition(&mut self, change: &StatusChange) -> Option<StatusHistoryEntry> {
        let previous = self.status;
        self.status = change.status;
        self.urgent = change.urgent;
        self.last_modified_by = change.actor.clone();

        if change.status.is_terminal() && self.concluded_at.is_none() {
            self.concluded_at = Some(change.at);
        }

        (previous != change.status).then(|| {
            StatusHistoryEntry::changed(
                self.id,
                previous,
                change.status,
                change.at,
                change.actor.clone(),
            )
        })
    }

    /// Compares two orders by queue position: urgent first, then lower
    /// priority, then earlier creation. The identifier breaks remaining ties so
    /// the order is total.
    #[must_use]
    pub fn queue_cmp(&self, other: &Self) -> Ordering {
        other
            .urgent
            .cmp(&self.urgent)
            .then_with(|| self.priority.cmp(&other.priority))
            .then_with(|| self.created_at.cmp(&other.created_at))
            .then_with(|| self.id.cmp(&other.id))
    }

    /// Applies non-status field edits.
    pub fn apply_fields(&mut self, update: &OrderFieldsUpdate) {
        if let Some(reference) = &update.reference {
            self.reference.clone_from(reference);
        }
        if let Some(equipment) = &update.equipment {
            self.equipment.clone_from(equipment);
        }
        if let Some(description) = &update.service_description {
            self.service_description.clone_from(description);
        }
        if let Some(image) = &update.system_image {
            self.system_image.clone_from(image);
        }
        if let Some(quantity) = update.quantity {
            self.quantity = quantity;
        }
        if let Some(priority) = update.priority {
            self.priority = priority;
        }
        self.last_modified_by = update.actor.clone();
    }
}

/// Trims a required text field, rejecting blank values.
///
/// # Errors
///
/// Returns [`OrderDomainError::MissingField`] when the trimmed value is empty.
pub fn required_text(
    field: &'static str,
    value: impl Into<String>,
) -> Result<String, OrderDomainError> {
    let raw = value.into();
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(OrderDomainError::MissingField(field));
    }
    Ok(trimmed.to_owned())
}

/// Trims an optional text field, mapping blank values to `None`.
#[must_use]
pub fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}
