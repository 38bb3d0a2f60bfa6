//! Domain model for service order lifecycle management.
//!
//! The order domain models intake, status transitions with their audit
//! history, and field edits while keeping all infrastructure concerns outside
//! of the domain boundary.

mod error;
mod filter;
mod history;
mod ids;
mod order;
mod status;

pub use error::{OrderDomainError, ParseOrderStatusError};
pub use filter::{DateColumn, OrderFilter, PeriodFilter};
pub use history::StatusHistoryEntry;
pub use ids::{Actor, OrderId, Priority, Quantity};
pub use order::{
    Order, OrderDraft, OrderFieldsUpdate, PersistedOrderData, StatusChange, optional_text,
    required_text,
};
pub use status::OrderStatus;
