//! In-memory integration tests for dashboard snapshots.

use std::sync::Arc;

use super::helpers::{Harness, ManualClock, harness, request, seed_floor, sp};
use chrono::NaiveDate;
use chrono_tz::America::Sao_Paulo;
use pedidos::order::{
    adapters::memory::InMemoryOrderRepository,
    domain::{Order, OrderId},
};
use pedidos::production::{BoardSettings, DashboardService, DashboardSettings, ReferenceMarker};
use rstest::rstest;

fn dashboard(
    harness: &Harness,
    settings: DashboardSettings,
) -> DashboardService<InMemoryOrderRepository, ManualClock> {
    DashboardService::new(
        Arc::clone(&harness.repository),
        Arc::clone(&harness.clock),
        settings,
    )
}

fn day(year: i32, month: u32, date: u32) -> eyre::Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, date).ok_or_else(|| eyre::eyre!("invalid date"))
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn board_ranks_urgent_work_first_and_dedupes_queues(harness: Harness) -> eyre::Result<()> {
    let floor = seed_floor(&harness).await?;
    let snapshot = dashboard(&harness, DashboardSettings::default())
        .snapshot()
        .await?;
    let board = &snapshot.board;

    let work_set: Vec<(usize, OrderId)> = board
        .work_set
        .iter()
        .map(|entry| (entry.display_rank, entry.order.id()))
        .collect();
    eyre::ensure!(
        work_set
            == vec![
                (1, floor.urgent_backlog.id()),
                (2, floor.backlog.id()),
                (3, floor.assembling.id()),
            ],
        "work set should hold workable orders in rank order, got {work_set:?}"
    );

    eyre::ensure!(board.today == day(2024, 3, 6)?, "board is built for the local day");
    eyre::ensure!(board.backlog.total() == 0, "work-set members leave the backlog list");
    eyre::ensure!(board.in_assembly.total() == 0, "work-set members leave the assembly list");

    let awaiting: Vec<_> = board
        .awaiting_arrival
        .items
        .iter()
        .map(|entry| entry.order.id())
        .collect();
    eyre::ensure!(awaiting == vec![floor.awaiting.id()], "awaiting list");
    let pending: Vec<_> = board.pending.items.iter().map(|entry| entry.order.id()).collect();
    eyre::ensure!(pending == vec![floor.pending.id()], "pending list");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn board_reports_todays_terminal_orders(harness: Harness) -> eyre::Result<()> {
    let floor = seed_floor(&harness).await?;
    let snapshot = dashboard(&harness, DashboardSettings::default())
        .snapshot()
        .await?;
    let completed = &snapshot.board.completed_today;
    let cancelled = &snapshot.board.cancelled_today;

    let completed_ids: Vec<_> = completed.orders.iter().map(Order::id).collect();
    eyre::ensure!(
        completed_ids == vec![floor.completed_today.id()],
        "only today's completion is listed"
    );
    eyre::ensure!(completed.totals.marked.count == 1, "teravix order is marked");
    eyre::ensure!(completed.totals.marked.quantity == 4, "marked quantity");
    eyre::ensure!(completed.totals.unmarked.count == 0, "no unmarked completion today");

    let cancelled_ids: Vec<_> = cancelled.orders.iter().map(Order::id).collect();
    eyre::ensure!(
        cancelled_ids == vec![floor.cancelled_today.id()],
        "today's cancellation is listed"
    );
    eyre::ensure!(cancelled.totals.overall().quantity == 3, "cancelled quantity");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn metrics_cover_the_month_so_far(harness: Harness) -> eyre::Result<()> {
    let floor = seed_floor(&harness).await?;
    let snapshot = dashboard(&harness, DashboardSettings::default())
        .snapshot()
        .await?;
    let metrics = &snapshot.metrics;

    eyre::ensure!(metrics.month_start == day(2024, 3, 1)?, "month start");
    eyre::ensure!(metrics.completed_count == 2, "two completions this month");
    eyre::ensure!(metrics.completed_quantity == 6, "six machines this month");
    eyre::ensure!(metrics.business_days == 4, "Fri 1st plus Mon to Wed");
    eyre::ensure!(
        metrics.daily_average.total_cmp(&0.5).is_eq(),
        "average per business day, got {}",
        metrics.daily_average
    );

    let record = metrics
        .record
        .ok_or_else(|| eyre::eyre!("expected a record day"))?;
    let yesterday = floor
        .completed_yesterday
        .concluded_at()
        .ok_or_else(|| eyre::eyre!("completion should be stamped"))?;
    eyre::ensure!(
        record.date == yesterday.with_timezone(&Sao_Paulo).date_naive(),
        "ties resolve to the earliest day"
    );
    eyre::ensure!(record.quantity == 2, "record day quantity");

    eyre::ensure!(metrics.previous_month.completed_count == 0, "nothing in February");
    eyre::ensure!(metrics.previous_month.business_days == 21, "February 2024 business days");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn weekly_series_ends_with_the_current_week(harness: Harness) -> eyre::Result<()> {
    seed_floor(&harness).await?;
    let settings = DashboardSettings {
        weekly_goal: 5,
        ..DashboardSettings::default()
    };
    let snapshot = dashboard(&harness, settings).snapshot().await?;

    let weeks: Vec<_> = snapshot
        .weekly
        .iter()
        .map(|week| (week.week_start, week.quantity, week.progress, week.is_current))
        .collect();
    eyre::ensure!(
        weeks
            == vec![
                (day(2024, 2, 12)?, 0, 0, false),
                (day(2024, 2, 19)?, 0, 0, false),
                (day(2024, 2, 26)?, 0, 0, false),
                (day(2024, 3, 4)?, 6, 5, true),
            ],
        "unexpected weekly series {weeks:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn secondary_lists_truncate_with_overflow(harness: Harness) -> eyre::Result<()> {
    for minute in 0..4 {
        harness
            .create_at(sp(2024, 3, 1, 9, minute), request("PV fila", 1))
            .await?;
    }
    harness.clock.set(sp(2024, 3, 1, 12, 0));
    let settings = DashboardSettings {
        board: BoardSettings {
            priority_slots: 4,
            preview_limit: 2,
            marker: ReferenceMarker::default(),
        },
        ..DashboardSettings::default()
    };

    let snapshot = dashboard(&harness, settings).snapshot().await?;

    eyre::ensure!(snapshot.board.work_set.is_empty(), "pending orders are not workable");
    eyre::ensure!(snapshot.board.pending.items.len() == 2, "preview limit applies");
    eyre::ensure!(snapshot.board.pending.overflow == 2, "hidden entries are counted");
    eyre::ensure!(
        snapshot.generated_at == sp(2024, 3, 1, 12, 0),
        "snapshot is stamped with the clock"
    );
    Ok(())
}
