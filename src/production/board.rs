//! Production board: active work set, secondary queues and today's totals.

use super::{
    calendar::local_date,
    marker::{BucketTotals, ReferenceMarker},
    ranking::{RankedOrder, rank, work_set},
};
use crate::order::domain::{Order, OrderId, OrderStatus};
use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::Serialize;
use std::collections::HashSet;

/// Presentation limits for the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSettings {
    /// Size of the active work set.
    pub priority_slots: usize,
    /// Number of entries shown per secondary list.
    pub preview_limit: usize,
    /// Marker splitting daily totals.
    pub marker: ReferenceMarker,
}

impl Default for BoardSettings {
    fn default() -> Self {
        Self {
            priority_slots: 4,
            preview_limit: 5,
            marker: ReferenceMarker::default(),
        }
    }
}

/// A truncated list with the number of hidden entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderPreview {
    /// Visible entries, at most the preview limit.
    pub items: Vec<RankedOrder>,
    /// Entries beyond the preview limit.
    pub overflow: usize,
}

impl OrderPreview {
    fn new(entries: Vec<RankedOrder>, limit: usize) -> Self {
        let overflow = entries.len().saturating_sub(limit);
        let items = entries.into_iter().take(limit).collect();
        Self { items, overflow }
    }

    /// Returns the number of entries before truncation.
    #[must_use]
    pub fn total(&self) -> usize {
        self.items.len().saturating_add(self.overflow)
    }
}

/// Orders that reached a terminal status today.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailySummary {
    /// Most recent first, truncated to the preview limit.
    pub orders: Vec<Order>,
    /// Entries beyond the preview limit.
    pub overflow: usize,
    /// Totals over every order of the day, not only the visible ones.
    pub totals: BucketTotals,
}

/// Full board snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductionBoard {
    /// Local date the snapshot was taken for.
    pub today: NaiveDate,
    /// Active work set.
    pub work_set: Vec<RankedOrder>,
    /// In-assembly orders outside the work set.
    pub in_assembly: OrderPreview,
    /// Backlog orders outside the work set.
    pub backlog: OrderPreview,
    /// Pending orders.
    pub pending: OrderPreview,
    /// Orders awaiting arrival.
    pub awaiting_arrival: OrderPreview,
    /// Orders completed today.
    pub completed_today: DailySummary,
    /// Orders cancelled today.
    pub cancelled_today: DailySummary,
}

/// Builds the board from a full order snapshot.
#[must_use]
pub fn build_board(
    orders: &[Order],
    today: NaiveDate,
    timezone: Tz,
    settings: &BoardSettings,
) -> ProductionBoard {
    let ranked = rank(orders);
    let active = work_set(&ranked, settings.priority_slots);
    let active_ids: HashSet<OrderId> = active.iter().map(|entry| entry.order.id()).collect();

    let queue = |status: OrderStatus, dedupe: bool| {
        let entries = ranked
            .iter()
            .filter(|entry| entry.order.status() == status)
            .filter(|entry| !dedupe || !active_ids.contains(&entry.order.id()))
            .cloned()
            .collect();
        OrderPreview::new(entries, settings.preview_limit)
    };

    ProductionBoard {
        today,
        in_assembly: queue(OrderStatus::InAssembly, true),
        backlog: queue(OrderStatus::Backlog, true),
        awaiting_arrival: queue(OrderStatus::AwaitingArrival, true),
        pending: queue(OrderStatus::Pending, false),
        completed_today: daily_summary(orders, OrderStatus::Completed, today, timezone, settings),
        cancelled_today: daily_summary(orders, OrderStatus::Cancelled, today, timezone, settings),
        work_set: active,
    }
}

fn daily_summary(
    orders: &[Order],
    status: OrderStatus,
    today: NaiveDate,
    timezone: Tz,
    settings: &BoardSettings,
) -> DailySummary {
    let mut todays: Vec<&Order> = orders
        .iter()
        .filter(|order| order.status() == status)
        .filter(|order| {
            order
                .concluded_at()
                .is_some_and(|instant| local_date(instant, timezone) == today)
        })
        .collect();
    todays.sort_by_key(|order| std::cmp::Reverse(order.concluded_at()));

    let totals = settings.marker.totals(todays.iter().copied());
    let overflow = todays.len().saturating_sub(settings.preview_limit);
    DailySummary {
        orders: todays
            .into_iter()
            .take(settings.preview_limit)
            .cloned()
            .collect(),
        overflow,
        totals,
    }
}
