//! `PostgreSQL` repository behaviour tests.

use super::helpers::{TestDatabase, at, draft};
use chrono_tz::America::Sao_Paulo;
use chrono::{DateTime, Utc};
use pedidos::order::{
    domain::{
        Actor, DateColumn, Order, OrderFieldsUpdate, OrderFilter, OrderId, OrderStatus, PeriodFilter,
        Priority, Quantity, StatusChange,
    },
    ports::{OrderRepository, OrderRepositoryError},
};
use rstest::rstest;

fn change(status: OrderStatus, when: DateTime<Utc>) -> StatusChange {
    StatusChange {
        status,
        urgent: false,
        actor: Actor::new("carla"),
        at: when,
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_round_trips_and_assigns_priorities() -> eyre::Result<()> {
    let Some(db) = TestDatabase::from_env().map_err(|err| eyre::eyre!(err))? else {
        return Ok(());
    };
    let repo = &db.repository;

    let first = repo.create(draft("PV 1", OrderStatus::Backlog, at(2024, 3, 1, 12))).await?;
    let second = repo.create(draft("PV 2", OrderStatus::Pending, at(2024, 3, 1, 13))).await?;

    eyre::ensure!(first.priority() == Priority::new(1), "first priority");
    eyre::ensure!(second.priority() == Priority::new(2), "second priority");

    let loaded = repo
        .find_by_id(first.id())
        .await?
        .ok_or_else(|| eyre::eyre!("order should be persisted"))?;
    eyre::ensure!(loaded == first, "round trip should preserve every field");

    let history = repo.history(first.id()).await?;
    eyre::ensure!(history.len() == 1, "creation writes one history row");
    eyre::ensure!(
        history.first().and_then(|entry| entry.previous_status()).is_none(),
        "creation row has no previous status"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn transitions_stamp_completion_once() -> eyre::Result<()> {
    let Some(db) = TestDatabase::from_env().map_err(|err| eyre::eyre!(err))? else {
        return Ok(());
    };
    let repo = &db.repository;
    let order = repo.create(draft("PV 3", OrderStatus::InAssembly, at(2024, 3, 1, 12))).await?;

    let completed = repo
        .apply_transition(order.id(), &change(OrderStatus::Completed, at(2024, 3, 2, 15)))
        .await?;
    let reopened = repo
        .apply_transition(order.id(), &change(OrderStatus::Backlog, at(2024, 3, 3, 9)))
        .await?;
    let unchanged = repo
        .apply_transition(order.id(), &change(OrderStatus::Backlog, at(2024, 3, 3, 10)))
        .await?;

    eyre::ensure!(
        completed.concluded_at() == Some(at(2024, 3, 2, 15)),
        "completion is stamped"
    );
    eyre::ensure!(
        reopened.concluded_at() == completed.concluded_at(),
        "reopening keeps the stamp"
    );
    eyre::ensure!(unchanged.status() == OrderStatus::Backlog, "same status is accepted");

    let labels: Vec<_> = repo
        .history(order.id())
        .await?
        .iter()
        .map(|entry| (entry.previous_label(), entry.new_status()))
        .collect();
    eyre::ensure!(
        labels
            == vec![
                ("CRIADO", OrderStatus::InAssembly),
                (OrderStatus::InAssembly.label(), OrderStatus::Completed),
                (OrderStatus::Completed.label(), OrderStatus::Backlog),
            ],
        "unexpected history {labels:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_codes_are_rejected() -> eyre::Result<()> {
    let Some(db) = TestDatabase::from_env().map_err(|err| eyre::eyre!(err))? else {
        return Ok(());
    };
    let repo = &db.repository;
    let mut first = draft("PV 4", OrderStatus::Pending, at(2024, 3, 1, 12));
    first.code = Some("OS-1".to_owned());
    let mut second = draft("PV 5", OrderStatus::Pending, at(2024, 3, 1, 13));
    second.code = Some("OS-1".to_owned());

    repo.create(first).await?;
    let result = repo.create(second).await;

    eyre::ensure!(
        matches!(result, Err(OrderRepositoryError::DuplicateOrder(_))),
        "expected duplicate error, got {result:?}"
    );
    eyre::ensure!(
        repo.list(&OrderFilter::all()).await?.len() == 1,
        "failed intake leaves no row behind"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn list_applies_status_reference_and_period_filters() -> eyre::Result<()> {
    let Some(db) = TestDatabase::from_env().map_err(|err| eyre::eyre!(err))? else {
        return Ok(());
    };
    let repo = &db.repository;
    let marked = repo.create(draft("OP TeraVix 9", OrderStatus::Backlog, at(2024, 2, 20, 12))).await?;
    let plain = repo.create(draft("PV 10", OrderStatus::Backlog, at(2024, 2, 21, 12))).await?;
    let february = repo.create(draft("PV 11", OrderStatus::InAssembly, at(2024, 2, 22, 12))).await?;
    // 01:00 UTC on 1 March is still 29 February in Sao Paulo.
    repo.apply_transition(february.id(), &change(OrderStatus::Completed, at(2024, 3, 1, 1)))
        .await?;

    let open: Vec<OrderId> = repo
        .list(&OrderFilter::open())
        .await?
        .iter()
        .map(Order::id)
        .collect();
    eyre::ensure!(open == vec![marked.id(), plain.id()], "open orders in queue order");

    let teravix = repo
        .list(&OrderFilter::all().with_reference_containing("teravix"))
        .await?;
    eyre::ensure!(teravix.len() == 1, "reference filter is case-insensitive");

    let period = PeriodFilter::new(Some(2), Some(2024), DateColumn::ConcludedAt, Sao_Paulo)?;
    let concluded = repo
        .list(&OrderFilter::all().with_period(period))
        .await?;
    eyre::ensure!(
        concluded.iter().map(Order::id).collect::<Vec<_>>()
            == vec![february.id()],
        "completion is bucketed by local month"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn field_edits_and_deletion() -> eyre::Result<()> {
    let Some(db) = TestDatabase::from_env().map_err(|err| eyre::eyre!(err))? else {
        return Ok(());
    };
    let repo = &db.repository;
    let order = repo.create(draft("PV 12", OrderStatus::Pending, at(2024, 3, 1, 12))).await?;

    let update = OrderFieldsUpdate::new(Actor::new("diego"))
        .with_equipment("Notebook X1")?
        .with_system_image(None)
        .with_quantity(Quantity::new(7)?);
    let edited = repo.update_fields(order.id(), &update).await?;
    eyre::ensure!(edited.equipment() == "Notebook X1", "equipment edited");
    eyre::ensure!(edited.system_image().is_none(), "image cleared");
    eyre::ensure!(edited.quantity().value() == 7, "quantity edited");
    eyre::ensure!(
        edited.last_modified_by() == &Actor::new("diego"),
        "editor recorded"
    );

    repo.delete(order.id()).await?;
    eyre::ensure!(repo.find_by_id(order.id()).await?.is_none(), "order deleted");
    eyre::ensure!(
        matches!(
            repo.history(order.id()).await,
            Err(OrderRepositoryError::NotFound(_))
        ),
        "history goes with the order"
    );
    eyre::ensure!(
        matches!(
            repo.delete(order.id()).await,
            Err(OrderRepositoryError::NotFound(_))
        ),
        "second delete reports not found"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn long_free_text_is_stored_unchanged() -> eyre::Result<()> {
    let Some(db) = TestDatabase::from_env().map_err(|err| eyre::eyre!(err))? else {
        return Ok(());
    };
    let repo = &db.repository;
    let reference = format!("PV {}", "9".repeat(300));
    let actor = Actor::new("operadora ".repeat(20));
    let mut long_draft = draft(&reference, OrderStatus::Backlog, at(2024, 3, 1, 12));
    long_draft.code = Some("OP-".repeat(60));
    long_draft.system_image = Some("imagem-".repeat(30));
    long_draft.created_by = actor.clone();

    let created = repo.create(long_draft).await?;
    let moved = repo
        .apply_transition(created.id(), &change(OrderStatus::InAssembly, at(2024, 3, 1, 13)))
        .await?;

    let loaded = repo
        .find_by_id(created.id())
        .await?
        .ok_or_else(|| eyre::eyre!("order should be persisted"))?;
    eyre::ensure!(loaded.reference() == reference, "reference kept in full");
    eyre::ensure!(loaded == moved, "round trip preserves long fields");
    let history = repo.history(created.id()).await?;
    eyre::ensure!(
        history.first().is_some_and(|entry| entry.changed_by() == &actor),
        "long actor kept in history"
    );
    Ok(())
}
