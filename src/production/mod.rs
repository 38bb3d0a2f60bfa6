//! Production analytics over order snapshots.
//!
//! Everything here is read-only: ranking, board summaries, metrics and the
//! activity report are recomputed from a full order snapshot on each call and
//! never mutate orders.

pub mod board;
pub mod calendar;
pub mod marker;
pub mod metrics;
pub mod ranking;
pub mod report;
pub mod services;

pub use board::{BoardSettings, DailySummary, OrderPreview, ProductionBoard, build_board};
pub use marker::{BucketTotal, BucketTotals, ReferenceMarker};
pub use metrics::{
    MonthlyMetrics, PreviousMonthMetrics, RecordDay, WeeklyThroughput, compute_monthly_metrics,
    compute_weekly_throughput,
};
pub use ranking::{RankedOrder, rank, work_set};
pub use report::{ReportError, ReportLabels, ReportPeriod, ReportSettings, generate_report};
pub use services::{DashboardService, DashboardSettings, DashboardSnapshot, ReportService};

#[cfg(test)]
mod tests;
