//! Dashboard and report services over the order repository.

use super::{
    board::{BoardSettings, ProductionBoard, build_board},
    calendar::local_date,
    metrics::{MonthlyMetrics, WeeklyThroughput, compute_monthly_metrics, compute_weekly_throughput},
    report::{ReportError, ReportPeriod, ReportSettings, generate_report},
};
use crate::order::{
    domain::{OrderFilter, OrderStatus},
    ports::{OrderRepository, OrderRepositoryResult},
};
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use mockable::Clock;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Settings for dashboard snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSettings {
    /// Timezone defining local days.
    pub timezone: Tz,
    /// Weekly machine goal.
    pub weekly_goal: u32,
    /// Board presentation limits.
    pub board: BoardSettings,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            timezone: chrono_tz::America::Sao_Paulo,
            weekly_goal: super::metrics::DEFAULT_WEEKLY_GOAL,
            board: BoardSettings::default(),
        }
    }
}

/// Everything the dashboard shows, computed from one repository read.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    /// Instant the snapshot was computed at.
    pub generated_at: DateTime<Utc>,
    /// Work set, queues and today's totals.
    pub board: ProductionBoard,
    /// Current-month metrics.
    pub metrics: MonthlyMetrics,
    /// Four-week throughput series.
    pub weekly: Vec<WeeklyThroughput>,
}

/// Recomputes the dashboard from scratch on every call.
#[derive(Clone)]
pub struct DashboardService<R, C>
where
    R: OrderRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
    settings: DashboardSettings,
}

impl<R, C> DashboardService<R, C>
where
    R: OrderRepository,
    C: Clock + Send + Sync,
{
    /// Creates a dashboard service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>, settings: DashboardSettings) -> Self {
        Self {
            repository,
            clock,
            settings,
        }
    }

    /// Builds a full dashboard snapshot.
    ///
    /// # Errors
    ///
    /// Returns the repository error when orders cannot be loaded.
    pub async fn snapshot(&self) -> OrderRepositoryResult<DashboardSnapshot> {
        let orders = self.repository.list(&OrderFilter::all()).await?;
        let generated_at = self.clock.utc();
        let now = generated_at.with_timezone(&self.settings.timezone);

        let board = build_board(
            &orders,
            now.date_naive(),
            self.settings.timezone,
            &self.settings.board,
        );
        let metrics = compute_monthly_metrics(&orders, now);
        let weekly = compute_weekly_throughput(&orders, now, self.settings.weekly_goal);

        debug!(
            orders = orders.len(),
            work_set = board.work_set.len(),
            completed_this_month = metrics.completed_count,
            "dashboard snapshot computed"
        );
        Ok(DashboardSnapshot {
            generated_at,
            board,
            metrics,
            weekly,
        })
    }
}

/// Loads report inputs and renders the activity report.
#[derive(Clone)]
pub struct ReportService<R>
where
    R: OrderRepository,
{
    repository: Arc<R>,
    timezone: Tz,
    settings: ReportSettings,
}

impl<R> ReportService<R>
where
    R: OrderRepository,
{
    /// Creates a report service.
    #[must_use]
    pub const fn new(repository: Arc<R>, timezone: Tz, settings: ReportSettings) -> Self {
        Self {
            repository,
            timezone,
            settings,
        }
    }

    /// Renders the report for `start..=end`.
    ///
    /// Completed orders are selected by their local completion date; the
    /// backlog is every order currently in Backlog or In Assembly.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Validation`] when `end` precedes `start`,
    /// [`ReportError::Repository`] when loading fails and
    /// [`ReportError::Render`] when rendering fails.
    pub async fn activity_report(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<String, ReportError> {
        let period = ReportPeriod::new(start, end)?;

        let completed: Vec<_> = self
            .repository
            .list(&OrderFilter::all().with_statuses([OrderStatus::Completed]))
            .await?
            .into_iter()
            .filter(|order| {
                order
                    .concluded_at()
                    .is_some_and(|instant| period.contains(local_date(instant, self.timezone)))
            })
            .collect();
        let backlog = self
            .repository
            .list(&OrderFilter::all().with_statuses(OrderStatus::BACKLOG))
            .await?;

        debug!(
            start = %period.start(),
            end = %period.end(),
            completed = completed.len(),
            backlog = backlog.len(),
            "rendering activity report"
        );
        generate_report(&period, &completed, &backlog, &self.settings)
    }
}
