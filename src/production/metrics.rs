//! Monthly throughput metrics and the weekly goal series.

use super::calendar::{business_days_inclusive, local_date, month_start, previous_month, week_start};
use crate::order::domain::{Order, OrderStatus};
use chrono::{DateTime, Days, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use std::collections::BTreeMap;

/// Number of weeks in the throughput series.
pub const WEEKS_IN_SERIES: usize = 4;

/// Default weekly machine goal.
pub const DEFAULT_WEEKLY_GOAL: u32 = 500;

/// Completion metrics for the month containing `now`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyMetrics {
    /// First day of the current month.
    pub month_start: NaiveDate,
    /// Orders completed from the month start up to `now`.
    pub completed_count: u32,
    /// Machines in those orders.
    pub completed_quantity: u32,
    /// Monday-to-Friday days from the month start to today inclusive.
    pub business_days: u32,
    /// Completed orders per business day.
    pub daily_average: f64,
    /// Completed machines per business day.
    pub daily_quantity_average: f64,
    /// The same figures for the previous full month.
    pub previous_month: PreviousMonthMetrics,
    /// Best day of the current month, if anything was completed.
    pub record: Option<RecordDay>,
}

/// Comparison figures for the previous calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviousMonthMetrics {
    /// First day of the previous month.
    pub month_start: NaiveDate,
    /// Orders completed during the whole month.
    pub completed_count: u32,
    /// Monday-to-Friday days in the month.
    pub business_days: u32,
    /// Completed orders per business day.
    pub daily_average: f64,
}

/// Local day with the most completions in the current month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RecordDay {
    /// The record date; the earliest one wins ties.
    pub date: NaiveDate,
    /// Orders completed that day.
    pub count: u32,
    /// Machines in those orders.
    pub quantity: u32,
}

/// One week of the throughput series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeeklyThroughput {
    /// Monday of the week.
    pub week_start: NaiveDate,
    /// Machines completed during the week.
    pub quantity: u32,
    /// Weekly goal the quantity is measured against.
    pub goal: u32,
    /// Quantity clamped to the goal, for progress bars.
    pub progress: u32,
    /// `true` for the week containing `now`.
    pub is_current: bool,
}

impl WeeklyThroughput {
    /// Returns the Sunday closing the week.
    #[must_use]
    pub fn week_end(&self) -> NaiveDate {
        self.week_start
            .checked_add_days(Days::new(6))
            .unwrap_or(self.week_start)
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Tally {
    count: u32,
    quantity: u32,
}

impl Tally {
    fn add(&mut self, order: &Order) {
        self.count = self.count.saturating_add(1);
        self.quantity = self.quantity.saturating_add(order.quantity().value());
    }
}

/// Completed orders paired with their local completion date.
fn completions(orders: &[Order], timezone: Tz) -> impl Iterator<Item = (&Order, DateTime<Utc>, NaiveDate)> {
    orders
        .iter()
        .filter(|order| order.status() == OrderStatus::Completed)
        .filter_map(move |order| {
            order
                .concluded_at()
                .map(|instant| (order, instant, local_date(instant, timezone)))
        })
}

#[expect(
    clippy::float_arithmetic,
    reason = "business-day averages are reported as fractional values"
)]
fn per_business_day(total: u32, business_days: u32) -> f64 {
    if business_days == 0 {
        return 0.0;
    }
    f64::from(total) / f64::from(business_days)
}

/// Computes the current month's completion metrics.
///
/// `now` carries the reporting timezone, which defines every day boundary.
/// Orders without a completion timestamp are ignored.
#[must_use]
pub fn compute_monthly_metrics(orders: &[Order], now: DateTime<Tz>) -> MonthlyMetrics {
    let timezone = now.timezone();
    let today = now.date_naive();
    let start = month_start(today);
    let now_utc = now.with_timezone(&Utc);
    let (previous_start, previous_end) = previous_month(today);

    let mut current = Tally::default();
    let mut previous = Tally::default();
    let mut per_day: BTreeMap<NaiveDate, Tally> = BTreeMap::new();

    for (order, instant, date) in completions(orders, timezone) {
        if date >= start && instant <= now_utc {
            current.add(order);
            per_day.entry(date).or_default().add(order);
        } else if date >= previous_start && date <= previous_end {
            previous.add(order);
        }
    }

    // BTreeMap iterates dates ascending, so the first maximum is the earliest.
    let record = per_day
        .into_iter()
        .fold(None::<RecordDay>, |best, (date, tally)| match best {
            Some(found) if found.count >= tally.count => Some(found),
            _ => Some(RecordDay {
                date,
                count: tally.count,
                quantity: tally.quantity,
            }),
        });

    let business_days = business_days_inclusive(start, today);
    let previous_business_days = business_days_inclusive(previous_start, previous_end);

    MonthlyMetrics {
        month_start: start,
        completed_count: current.count,
        completed_quantity: current.quantity,
        business_days,
        daily_average: per_business_day(current.count, business_days),
        daily_quantity_average: per_business_day(current.quantity, business_days),
        previous_month: PreviousMonthMetrics {
            month_start: previous_start,
            completed_count: previous.count,
            business_days: previous_business_days,
            daily_average: per_business_day(previous.count, previous_business_days),
        },
        record,
    }
}

/// Computes machines completed per week for the last four weeks.
///
/// Always returns exactly four entries, oldest first, ending with the week
/// containing `now`. Weeks without completions carry zero.
#[must_use]
pub fn compute_weekly_throughput(
    orders: &[Order],
    now: DateTime<Tz>,
    goal: u32,
) -> Vec<WeeklyThroughput> {
    let timezone = now.timezone();
    let current_week = week_start(now.date_naive());
    let now_utc = now.with_timezone(&Utc);

    let weeks: Vec<NaiveDate> = (0..WEEKS_IN_SERIES)
        .rev()
        .map(|back| {
            let offset = u64::try_from(back).unwrap_or(0).saturating_mul(7);
            current_week
                .checked_sub_days(Days::new(offset))
                .unwrap_or(current_week)
        })
        .collect();

    let mut sums: BTreeMap<NaiveDate, u32> = weeks.iter().map(|week| (*week, 0)).collect();
    for (order, instant, date) in completions(orders, timezone) {
        if instant > now_utc {
            continue;
        }
        if let Some(sum) = sums.get_mut(&week_start(date)) {
            *sum = sum.saturating_add(order.quantity().value());
        }
    }

    weeks
        .into_iter()
        .map(|week| {
            let quantity = sums.get(&week).copied().unwrap_or(0);
            WeeklyThroughput {
                week_start: week,
                quantity,
                goal,
                progress: quantity.min(goal),
                is_current: week == current_week,
            }
        })
        .collect()
}
