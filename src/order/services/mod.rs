//! Application services for order lifecycle orchestration.

mod lifecycle;

pub use lifecycle::{
    CreateOrderRequest, OrderLifecycleError, OrderLifecycleResult, OrderLifecycleService,
    TransitionOrderRequest,
};
