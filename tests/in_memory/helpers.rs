//! Shared test helpers for in-memory integration tests.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Local, TimeZone, Utc};
use chrono_tz::America::Sao_Paulo;
use mockable::Clock;
use pedidos::order::{
    adapters::memory::InMemoryOrderRepository,
    domain::{Order, OrderStatus},
    services::{
        CreateOrderRequest, OrderLifecycleError, OrderLifecycleService, TransitionOrderRequest,
    },
};
use rstest::fixture;

/// Clock the test moves forward explicitly.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    /// Creates a clock reading `start`.
    pub const fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Moves the clock to `instant`.
    pub fn set(&self, instant: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = instant;
    }
}

impl Clock for ManualClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Lifecycle service type used across in-memory tests.
pub type TestService = OrderLifecycleService<InMemoryOrderRepository, ManualClock>;

/// Repository, clock and service sharing the same state.
pub struct Harness {
    pub repository: Arc<InMemoryOrderRepository>,
    pub clock: Arc<ManualClock>,
    pub service: TestService,
}

impl Harness {
    /// Creates an order with the clock set to `instant`.
    pub async fn create_at(
        &self,
        instant: DateTime<Utc>,
        request: CreateOrderRequest,
    ) -> Result<Order, OrderLifecycleError> {
        self.clock.set(instant);
        self.service.create_order(request).await
    }

    /// Moves an order to `status` at `instant`, keeping its urgent flag.
    pub async fn move_at(
        &self,
        instant: DateTime<Utc>,
        order: &Order,
        status: OrderStatus,
    ) -> Result<Order, OrderLifecycleError> {
        self.clock.set(instant);
        self.service
            .apply_transition(TransitionOrderRequest::new(
                order.id(),
                status,
                order.is_urgent(),
                "carla",
            ))
            .await
    }
}

/// Provides a harness whose clock starts at 2024-03-01 09:00 in Sao Paulo.
#[fixture]
pub fn harness() -> Harness {
    let repository = Arc::new(InMemoryOrderRepository::new());
    let clock = Arc::new(ManualClock::new(sp(2024, 3, 1, 9, 0)));
    let service = OrderLifecycleService::new(Arc::clone(&repository), Arc::clone(&clock));
    Harness {
        repository,
        clock,
        service,
    }
}

/// Converts a Sao Paulo wall-clock time to UTC, falling back to the epoch.
pub fn sp(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Sao_Paulo
        .with_ymd_and_hms(year, month, day, hour, minute, 0)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
        .unwrap_or_default()
}

/// Request for a plain order with the given reference and quantity.
pub fn request(reference: &str, quantity: i64) -> CreateOrderRequest {
    CreateOrderRequest::new(reference, "Desktop G5", quantity).with_created_by("ana")
}

/// Orders seeded by [`seed_floor`], named by their role on the board.
pub struct Floor {
    pub backlog: Order,
    pub assembling: Order,
    pub pending: Order,
    pub awaiting: Order,
    pub urgent_backlog: Order,
    pub completed_today: Order,
    pub completed_yesterday: Order,
    pub cancelled_today: Order,
}

/// Seeds a small shop floor and leaves the clock at Wednesday
/// 2024-03-06 14:00 in Sao Paulo.
///
/// # Errors
///
/// Returns an error if any lifecycle call fails.
pub async fn seed_floor(harness: &Harness) -> Result<Floor, OrderLifecycleError> {
    let backlog = harness
        .create_at(
            sp(2024, 3, 1, 9, 0),
            request("PV 1", 1).with_status(OrderStatus::Backlog),
        )
        .await?;
    let assembling = harness
        .create_at(
            sp(2024, 3, 1, 9, 10),
            request("PV 2", 1).with_status(OrderStatus::InAssembly),
        )
        .await?;
    let pending = harness
        .create_at(sp(2024, 3, 1, 9, 20), request("TERAVIX 3", 2))
        .await?;
    let awaiting = harness
        .create_at(
            sp(2024, 3, 1, 9, 30),
            request("PV 4", 1).with_status(OrderStatus::AwaitingArrival),
        )
        .await?;
    let urgent_backlog = harness
        .create_at(
            sp(2024, 3, 4, 8, 0),
            request("PV 5", 1)
                .with_status(OrderStatus::Backlog)
                .with_urgent(true),
        )
        .await?;
    let teravix = harness
        .create_at(
            sp(2024, 3, 4, 8, 30),
            request("OP Teravix 6", 4).with_status(OrderStatus::InAssembly),
        )
        .await?;
    let yesterday = harness
        .create_at(
            sp(2024, 3, 4, 9, 0),
            request("PV 7", 2).with_status(OrderStatus::InAssembly),
        )
        .await?;
    let doomed = harness
        .create_at(sp(2024, 3, 4, 9, 30), request("PV 8", 3))
        .await?;

    let completed_yesterday = harness
        .move_at(sp(2024, 3, 5, 11, 0), &yesterday, OrderStatus::Completed)
        .await?;
    let cancelled_today = harness
        .move_at(sp(2024, 3, 6, 9, 0), &doomed, OrderStatus::Cancelled)
        .await?;
    let completed_today = harness
        .move_at(sp(2024, 3, 6, 10, 0), &teravix, OrderStatus::Completed)
        .await?;
    harness.clock.set(sp(2024, 3, 6, 14, 0));

    Ok(Floor {
        backlog,
        assembling,
        pending,
        awaiting,
        urgent_backlog,
        completed_today,
        completed_yesterday,
        cancelled_today,
    })
}
