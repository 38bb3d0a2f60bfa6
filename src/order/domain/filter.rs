//! Query filters for listing orders.

use super::{Order, OrderDomainError, OrderStatus};
use chrono::{DateTime, Datelike, Utc};
use chrono_tz::Tz;

/// Date column a month/year filter applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateColumn {
    /// Filter on `created_at`.
    CreatedAt,
    /// Filter on `concluded_at`; orders without one never match.
    ConcludedAt,
}

/// Month and/or year restriction evaluated in a local timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodFilter {
    month: Option<u32>,
    year: Option<i32>,
    column: DateColumn,
    timezone: Tz,
}

impl PeriodFilter {
    /// Creates a period filter.
    ///
    /// # Errors
    ///
    /// Returns [`OrderDomainError::InvalidMonth`] for months outside `1..=12`.
    pub fn new(
        month: Option<u32>,
        year: Option<i32>,
        column: DateColumn,
        timezone: Tz,
    ) -> Result<Self, OrderDomainError> {
        if let Some(value) = month
            && !(1..=12).contains(&value)
        {
            return Err(OrderDomainError::InvalidMonth(value));
        }
        Ok(Self {
            month,
            year,
            column,
            timezone,
        })
    }

    /// Returns the date column the filter inspects.
    #[must_use]
    pub const fn column(&self) -> DateColumn {
        self.column
    }

    fn matches_instant(&self, instant: DateTime<Utc>) -> bool {
        let local = instant.with_timezone(&self.timezone);
        self.month.is_none_or(|month| local.month() == month)
            && self.year.is_none_or(|year| local.year() == year)
    }

    fn matches(&self, order: &Order) -> bool {
        let instant = match self.column {
            DateColumn::CreatedAt => Some(order.created_at()),
            DateColumn::ConcludedAt => order.concluded_at(),
        };
        instant.is_some_and(|value| self.matches_instant(value))
    }
}

/// Criteria for [`crate::order::ports::OrderRepository::list`].
///
/// An empty filter matches every order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilter {
    statuses: Option<Vec<OrderStatus>>,
    reference_contains: Option<String>,
    period: Option<PeriodFilter>,
}

impl OrderFilter {
    /// Matches every order.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Matches orders that are not Completed or Cancelled.
    #[must_use]
    pub fn open() -> Self {
        Self::default().with_statuses(
            OrderStatus::ALL
                .into_iter()
                .filter(|status| !status.is_terminal()),
        )
    }

    /// Restricts to the given statuses.
    #[must_use]
    pub fn with_statuses(mut self, statuses: impl IntoIterator<Item = OrderStatus>) -> Self {
        self.statuses = Some(statuses.into_iter().collect());
        self
    }

    /// Restricts to references containing `needle`, ignoring case.
    ///
    /// Blank needles are ignored.
    #[must_use]
    pub fn with_reference_containing(mut self, needle: impl Into<String>) -> Self {
        let raw = needle.into();
        let trimmed = raw.trim();
        self.reference_contains = (!trimmed.is_empty()).then(|| trimmed.to_lowercase());
        self
    }

    /// Restricts to a month/year period.
    #[must_use]
    pub fn with_period(mut self, period: PeriodFilter) -> Self {
        self.period = Some(period);
        self
    }

    /// Returns the status restriction, if any.
    #[must_use]
    pub fn statuses(&self) -> Option<&[OrderStatus]> {
        self.statuses.as_deref()
    }

    /// Returns the lower-cased reference needle, if any.
    #[must_use]
    pub fn reference_contains(&self) -> Option<&str> {
        self.reference_contains.as_deref()
    }

    /// Returns the period restriction, if any.
    #[must_use]
    pub const fn period(&self) -> Option<&PeriodFilter> {
        self.period.as_ref()
    }

    /// Returns `true` when `order` satisfies every criterion.
    #[must_use]
    pub fn matches(&self, order: &Order) -> bool {
        let status_ok = self
            .statuses
            .as_ref()
            .is_none_or(|statuses| statuses.contains(&order.status()));
        let reference_ok = self
            .reference_contains
            .as_ref()
            .is_none_or(|needle| order.reference().to_lowercase().contains(needle.as_str()));
        let period_ok = self.period.as_ref().is_none_or(|period| period.matches(order));
        status_ok && reference_ok && period_ok
    }
}
