//! Then steps for order transition BDD scenarios.

use super::world::{OrderTransitionWorld, run_async};
use pedidos::order::{domain::OrderStatus, services::OrderLifecycleError};
use rstest_bdd_macros::then;

#[then(r#"the order status is "{status}""#)]
fn order_status_is(world: &OrderTransitionWorld, status: String) -> Result<(), eyre::Report> {
    let expected = OrderStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let order = world.transitioned()?;
    if order.status() != expected {
        return Err(eyre::eyre!(
            "expected status {}, found {}",
            expected.as_str(),
            order.status().as_str()
        ));
    }
    Ok(())
}

#[then("the order has a completion time")]
fn order_has_completion_time(world: &OrderTransitionWorld) -> Result<(), eyre::Report> {
    if world.transitioned()?.concluded_at().is_none() {
        return Err(eyre::eyre!("expected a completion time to be stamped"));
    }
    Ok(())
}

#[then("the completion time is unchanged")]
fn completion_time_unchanged(world: &OrderTransitionWorld) -> Result<(), eyre::Report> {
    let stamped = world
        .stamped_at
        .ok_or_else(|| eyre::eyre!("setup should have stamped a completion time"))?;
    let current = world.transitioned()?.concluded_at();
    if current != Some(stamped) {
        return Err(eyre::eyre!(
            "expected completion time {stamped}, found {current:?}"
        ));
    }
    Ok(())
}

#[then("the order is urgent")]
fn order_is_urgent(world: &OrderTransitionWorld) -> Result<(), eyre::Report> {
    if !world.transitioned()?.is_urgent() {
        return Err(eyre::eyre!("expected the order to be flagged urgent"));
    }
    Ok(())
}

#[then("the order history has {count:usize} entries")]
fn history_has_entries(world: &OrderTransitionWorld, count: usize) -> Result<(), eyre::Report> {
    let history = run_async(world.service.history(world.target()?))
        .map_err(|err| eyre::eyre!("history lookup failed: {err}"))?;
    if history.len() != count {
        return Err(eyre::eyre!(
            "expected {count} history entries, found {}",
            history.len()
        ));
    }
    Ok(())
}

#[then("the transition fails with a not found error")]
fn transition_fails_not_found(world: &OrderTransitionWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_transition_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing transition result"))?;
    if !matches!(result, Err(OrderLifecycleError::NotFound(_))) {
        return Err(eyre::eyre!("expected NotFound error, got {result:?}"));
    }
    Ok(())
}
