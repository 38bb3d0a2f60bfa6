//! In-memory repository for order lifecycle tests and local tooling.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::order::{
    domain::{
        Order, OrderDraft, OrderFieldsUpdate, OrderFilter, OrderId, Priority, StatusChange,
        StatusHistoryEntry,
    },
    ports::{OrderRepository, OrderRepositoryError, OrderRepositoryResult},
};

/// Thread-safe in-memory order repository.
///
/// Each mutating call holds the write lock for its whole unit of work, so an
/// order and its history entries change together.
#[derive(Debug, Clone, Default)]
pub struct InMemoryOrderRepository {
    state: Arc<RwLock<InMemoryOrderState>>,
}

#[derive(Debug, Default)]
struct InMemoryOrderState {
    orders: HashMap<OrderId, Order>,
    code_index: HashMap<String, OrderId>,
    history: HashMap<OrderId, Vec<StatusHistoryEntry>>,
}

impl InMemoryOrderRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a fully formed order without touching history or priorities.
    ///
    /// Used to seed fixtures with historical data such as past completions.
    ///
    /// # Errors
    ///
    /// Returns [`OrderRepositoryError::DuplicateOrder`] when the identifier is
    /// already present.
    pub fn seed(&self, order: Order) -> OrderRepositoryResult<()> {
        let mut state = self.write()?;
        if state.orders.contains_key(&order.id()) {
            return Err(OrderRepositoryError::DuplicateOrder(order.id().to_string()));
        }
        if let Some(code) = order.code() {
            state.code_index.insert(code.to_owned(), order.id());
        }
        state.orders.insert(order.id(), order);
        Ok(())
    }

    /// Returns the number of stored history entries across all orders.
    ///
    /// # Errors
    ///
    /// Returns [`OrderRepositoryError::Persistence`] when the lock is poisoned.
    pub fn history_len(&self) -> OrderRepositoryResult<usize> {
        let state = self.read()?;
        Ok(state.history.values().map(Vec::len).sum())
    }

    fn read(&self) -> OrderRepositoryResult<RwLockReadGuard<'_, InMemoryOrderState>> {
        self.state.read().map_err(|err| {
            OrderRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> OrderRepositoryResult<RwLockWriteGuard<'_, InMemoryOrderState>> {
        self.state.write().map_err(|err| {
            OrderRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

/// Appends a history entry for an order.
fn append_history(state: &mut InMemoryOrderState, entry: StatusHistoryEntry) {
    state.history.entry(entry.order_id()).or_default().push(entry);
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn create(&self, draft: OrderDraft) -> OrderRepositoryResult<Order> {
        let mut state = self.write()?;
        if state.orders.contains_key(&draft.id) {
            return Err(OrderRepositoryError::DuplicateOrder(draft.id.to_string()));
        }
        if let Some(code) = draft.code.as_deref()
            && state.code_index.contains_key(code)
        {
            return Err(OrderRepositoryError::DuplicateOrder(code.to_owned()));
        }

        let priority = Priority::next_after(state.orders.values().map(Order::priority));
        let (order, entry) = Order::create(draft, priority);

        if let Some(code) = order.code() {
            state.code_index.insert(code.to_owned(), order.id());
        }
        append_history(&mut state, entry);
        state.orders.insert(order.id(), order.clone());
        Ok(order)
    }

    async fn apply_transition(
        &self,
        id: OrderId,
        change: &StatusChange,
    ) -> OrderRepositoryResult<Order> {
        let mut state = self.write()?;
        let mut order = state
            .orders
            .get(&id)
            .ok_or(OrderRepositoryError::NotFound(id))?
            .clone();

        if let Some(entry) = order.apply_transition(change) {
            append_history(&mut state, entry);
        }
        state.orders.insert(id, order.clone());
        Ok(order)
    }

    async fn update_fields(
        &self,
        id: OrderId,
        update: &OrderFieldsUpdate,
    ) -> OrderRepositoryResult<Order> {
        let mut state = self.write()?;
        let order = state
            .orders
            .get_mut(&id)
            .ok_or(OrderRepositoryError::NotFound(id))?;
        order.apply_fields(update);
        Ok(order.clone())
    }

    async fn delete(&self, id: OrderId) -> OrderRepositoryResult<()> {
        let mut state = self.write()?;
        let removed = state
            .orders
            .remove(&id)
            .ok_or(OrderRepositoryError::NotFound(id))?;
        if let Some(code) = removed.code() {
            state.code_index.remove(code);
        }
        state.history.remove(&id);
        Ok(())
    }

    async fn find_by_id(&self, id: OrderId) -> OrderRepositoryResult<Option<Order>> {
        let state = self.read()?;
        Ok(state.orders.get(&id).cloned())
    }

    async fn list(&self, filter: &OrderFilter) -> OrderRepositoryResult<Vec<Order>> {
        let state = self.read()?;
        let mut orders: Vec<Order> = state
            .orders
            .values()
            .filter(|order| filter.matches(order))
            .cloned()
            .collect();
        orders.sort_by(Order::queue_cmp);
        Ok(orders)
    }

    async fn history(&self, id: OrderId) -> OrderRepositoryResult<Vec<StatusHistoryEntry>> {
        let state = self.read()?;
        if !state.orders.contains_key(&id) {
            return Err(OrderRepositoryError::NotFound(id));
        }
        let mut entries = state.history.get(&id).cloned().unwrap_or_default();
        entries.sort_by_key(StatusHistoryEntry::changed_at);
        Ok(entries)
    }
}
