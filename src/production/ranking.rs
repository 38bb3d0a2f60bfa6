//! Priority ranking of open orders.

use crate::order::domain::Order;
use serde::Serialize;

/// An open order with its transient 1-based queue position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedOrder {
    /// Display position, starting at 1. Never persisted.
    pub display_rank: usize,
    /// The ranked order.
    pub order: Order,
}

/// Ranks open orders: urgent first, then lower priority, then older.
///
/// Terminal orders are dropped. The identifier breaks remaining ties, so the
/// result is identical across calls with unchanged input.
#[must_use]
pub fn rank(orders: &[Order]) -> Vec<RankedOrder> {
    let mut open: Vec<&Order> = orders.iter().filter(|order| order.is_open()).collect();
    open.sort_by(|left, right| left.queue_cmp(right));
    open.into_iter()
        .enumerate()
        .map(|(index, order)| RankedOrder {
            display_rank: index.saturating_add(1),
            order: order.clone(),
        })
        .collect()
}

/// Returns the first `slots` ranked orders whose status is workable.
#[must_use]
pub fn work_set(ranked: &[RankedOrder], slots: usize) -> Vec<RankedOrder> {
    ranked
        .iter()
        .filter(|entry| entry.order.status().is_workable())
        .take(slots)
        .cloned()
        .collect()
}
