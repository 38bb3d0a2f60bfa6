//! Reference-marker bucketing for board totals and reports.

use crate::order::domain::Order;
use serde::{Deserialize, Serialize};

/// Case-insensitive token that splits orders into marked and unmarked buckets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReferenceMarker(String);

impl ReferenceMarker {
    /// Marker used when none is configured.
    pub const DEFAULT: &'static str = "TERAVIX";

    /// Creates a marker, falling back to [`ReferenceMarker::DEFAULT`] when
    /// blank.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        let raw = token.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self(Self::DEFAULT.to_owned());
        }
        Self(trimmed.to_owned())
    }

    /// Returns the marker token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` when the order reference contains the marker.
    #[must_use]
    pub fn is_marked(&self, order: &Order) -> bool {
        order
            .reference()
            .to_lowercase()
            .contains(&self.0.to_lowercase())
    }

    /// Sums orders into marked and unmarked buckets.
    #[must_use]
    pub fn totals<'a>(&self, orders: impl IntoIterator<Item = &'a Order>) -> BucketTotals {
        orders
            .into_iter()
            .fold(BucketTotals::default(), |mut totals, order| {
                let bucket = if self.is_marked(order) {
                    &mut totals.marked
                } else {
                    &mut totals.unmarked
                };
                bucket.add(order);
                totals
            })
    }
}

impl Default for ReferenceMarker {
    fn default() -> Self {
        Self(Self::DEFAULT.to_owned())
    }
}

/// Order count and summed quantity of one bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BucketTotal {
    /// Number of orders.
    pub count: u32,
    /// Sum of order quantities.
    pub quantity: u32,
}

impl BucketTotal {
    fn add(&mut self, order: &Order) {
        self.count = self.count.saturating_add(1);
        self.quantity = self.quantity.saturating_add(order.quantity().value());
    }

    /// Returns `true` when no order fell into the bucket.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Marked and unmarked bucket totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BucketTotals {
    /// Orders whose reference contains the marker.
    pub marked: BucketTotal,
    /// All other orders.
    pub unmarked: BucketTotal,
}

impl BucketTotals {
    /// Returns the combined total of both buckets.
    #[must_use]
    pub const fn overall(&self) -> BucketTotal {
        BucketTotal {
            count: self.marked.count.saturating_add(self.unmarked.count),
            quantity: self.marked.quantity.saturating_add(self.unmarked.quantity),
        }
    }
}
