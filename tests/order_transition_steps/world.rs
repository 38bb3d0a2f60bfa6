//! Shared world state for order transition BDD scenarios.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use mockable::DefaultClock;
use pedidos::order::{
    adapters::memory::InMemoryOrderRepository,
    domain::{Order, OrderId},
    services::{OrderLifecycleError, OrderLifecycleService},
};
use rstest::fixture;

/// Service type used by the BDD world.
pub type TestOrderService = OrderLifecycleService<InMemoryOrderRepository, DefaultClock>;

/// Scenario world for order transition behaviour tests.
pub struct OrderTransitionWorld {
    pub service: TestOrderService,
    pub target: Option<OrderId>,
    pub stamped_at: Option<DateTime<Utc>>,
    pub last_transition_result: Option<Result<Order, OrderLifecycleError>>,
}

impl OrderTransitionWorld {
    /// Creates a world with empty pending scenario state.
    #[must_use]
    pub fn new() -> Self {
        let service = OrderLifecycleService::new(
            Arc::new(InMemoryOrderRepository::new()),
            Arc::new(DefaultClock),
        );
        Self {
            service,
            target: None,
            stamped_at: None,
            last_transition_result: None,
        }
    }

    /// Returns the order targeted by the scenario.
    ///
    /// # Errors
    ///
    /// Returns an error when no order has been selected yet.
    pub fn target(&self) -> Result<OrderId, eyre::Report> {
        self.target
            .ok_or_else(|| eyre::eyre!("missing target order in scenario world"))
    }

    /// Returns the order produced by the last successful transition.
    ///
    /// # Errors
    ///
    /// Returns an error when no transition ran or it failed.
    pub fn transitioned(&self) -> Result<&Order, eyre::Report> {
        self.last_transition_result
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing transition result"))?
            .as_ref()
            .map_err(|err| eyre::eyre!("unexpected transition failure: {err}"))
    }
}

impl Default for OrderTransitionWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> OrderTransitionWorld {
    OrderTransitionWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
