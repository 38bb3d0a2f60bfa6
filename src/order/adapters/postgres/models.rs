//! Diesel row models for order persistence.

use super::schema::{order_status_history, orders};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for order records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
    /// Internal order identifier.
    pub id: uuid::Uuid,
    /// Optional external order code.
    pub code: Option<String>,
    /// Project or voucher reference.
    pub reference: String,
    /// Equipment model.
    pub equipment: String,
    /// Requested service.
    pub service_description: String,
    /// Optional image label.
    pub system_image: Option<String>,
    /// Machine count.
    pub quantity: i32,
    /// Status lookup code.
    pub status_code: i16,
    /// Urgent flag.
    pub urgent: bool,
    /// Queue priority.
    pub priority: i32,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Completion timestamp.
    pub concluded_at: Option<DateTime<Utc>>,
    /// Last editor.
    pub last_modified_by: String,
}

/// Insert model for order records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrderRow {
    /// Internal order identifier.
    pub id: uuid::Uuid,
    /// Optional external order code.
    pub code: Option<String>,
    /// Project or voucher reference.
    pub reference: String,
    /// Equipment model.
    pub equipment: String,
    /// Requested service.
    pub service_description: String,
    /// Optional image label.
    pub system_image: Option<String>,
    /// Machine count.
    pub quantity: i32,
    /// Status lookup code.
    pub status_code: i16,
    /// Urgent flag.
    pub urgent: bool,
    /// Queue priority.
    pub priority: i32,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Completion timestamp.
    pub concluded_at: Option<DateTime<Utc>>,
    /// Last editor.
    pub last_modified_by: String,
}

/// Mutable order columns written on transitions and field edits.
///
/// `None` values are written as `NULL` so cleared fields persist.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = orders)]
#[diesel(treat_none_as_null = true)]
pub struct OrderChangeset {
    /// Project or voucher reference.
    pub reference: String,
    /// Equipment model.
    pub equipment: String,
    /// Requested service.
    pub service_description: String,
    /// Optional image label.
    pub system_image: Option<String>,
    /// Machine count.
    pub quantity: i32,
    /// Status lookup code.
    pub status_code: i16,
    /// Urgent flag.
    pub urgent: bool,
    /// Queue priority.
    pub priority: i32,
    /// Completion timestamp.
    pub concluded_at: Option<DateTime<Utc>>,
    /// Last editor.
    pub last_modified_by: String,
}

/// Query result row for history entries.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = order_status_history)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct HistoryRow {
    /// Owning order.
    pub order_id: uuid::Uuid,
    /// Previous status code.
    pub previous_status_code: Option<i16>,
    /// New status code.
    pub new_status_code: i16,
    /// Change timestamp.
    pub changed_at: DateTime<Utc>,
    /// Acting identity.
    pub changed_by: String,
}

/// Insert model for history entries.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = order_status_history)]
pub struct NewHistoryRow {
    /// Owning order.
    pub order_id: uuid::Uuid,
    /// Previous status code.
    pub previous_status_code: Option<i16>,
    /// New status code.
    pub new_status_code: i16,
    /// Change timestamp.
    pub changed_at: DateTime<Utc>,
    /// Acting identity.
    pub changed_by: String,
}
