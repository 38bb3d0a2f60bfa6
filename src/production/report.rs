//! Plain-text activity report for a date range.
//!
//! The report lists completed work in the period and the current backlog,
//! each split by the reference marker:
//!
//! ```text
//! Relatório de Atividades - sexta-feira, 01/03
//!
//! • 1 PV com 3 unidades
//! • 2 OPs Teravix com 6 unidades
//!
//! Backlog:
//! Nenhuma atividade futura na fila.
//! ```

use super::{
    calendar::weekday_name_pt_br,
    marker::{BucketTotal, ReferenceMarker},
};
use crate::order::{domain::Order, domain::OrderDomainError, ports::OrderRepositoryError};
use chrono::{Datelike, NaiveDate};
use minijinja::{Environment, context};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Sentence shown when nothing was completed in the period.
pub const NO_COMPLETED_ACTIVITY: &str = "Nenhuma atividade realizada no período.";

/// Sentence shown when the backlog is empty.
pub const NO_BACKLOG_ACTIVITY: &str = "Nenhuma atividade futura na fila.";

const TEMPLATE_NAME: &str = "activity_report.txt";
const TEMPLATE: &str = "{{ title }}\n\n{{ completed }}\n\nBacklog:\n{{ backlog }}";

/// Errors returned while producing a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The requested period is invalid.
    #[error(transparent)]
    Validation(#[from] OrderDomainError),
    /// The text template failed to render.
    #[error("failed to render activity report: {0}")]
    Render(#[from] minijinja::Error),
    /// Loading orders failed.
    #[error(transparent)]
    Repository(#[from] OrderRepositoryError),
}

/// Inclusive local-date range covered by a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportPeriod {
    start: NaiveDate,
    end: NaiveDate,
}

impl ReportPeriod {
    /// Creates a period.
    ///
    /// # Errors
    ///
    /// Returns [`OrderDomainError::InvalidDateRange`] when `end` precedes
    /// `start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, OrderDomainError> {
        if end < start {
            return Err(OrderDomainError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Parses a period from `YYYY-MM-DD` strings.
    ///
    /// # Errors
    ///
    /// Returns [`OrderDomainError::InvalidDate`] for unparseable dates and
    /// [`OrderDomainError::InvalidDateRange`] when the range is inverted.
    pub fn parse(start: &str, end: &str) -> Result<Self, OrderDomainError> {
        Self::new(parse_date(start)?, parse_date(end)?)
    }

    /// Returns the first day.
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Returns the last day.
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Returns `true` when the period covers a single day.
    #[must_use]
    pub fn is_single_day(&self) -> bool {
        self.start == self.end
    }

    /// Returns `true` when `date` falls inside the period.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Returns the report title line.
    #[must_use]
    pub fn title(&self) -> String {
        let start = self.start.format("%d/%m");
        if self.is_single_day() {
            let weekday = weekday_name_pt_br(self.start.weekday());
            return format!("Relatório de Atividades - {weekday}, {start}");
        }
        let end = self.end.format("%d/%m");
        format!("Relatório de Atividades - período de {start} a {end}")
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, OrderDomainError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| OrderDomainError::InvalidDate(value.to_owned()))
}

/// Wording of bucket lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportLabels {
    /// Label for one unmarked order.
    pub unmarked_singular: String,
    /// Label for several unmarked orders.
    pub unmarked_plural: String,
    /// Label for one marked order.
    pub marked_singular: String,
    /// Label for several marked orders.
    pub marked_plural: String,
    /// Unit word for a quantity of one.
    pub unit_singular: String,
    /// Unit word for any other quantity.
    pub unit_plural: String,
}

impl Default for ReportLabels {
    fn default() -> Self {
        Self {
            unmarked_singular: "PV".to_owned(),
            unmarked_plural: "PVs".to_owned(),
            marked_singular: "OP Teravix".to_owned(),
            marked_plural: "OPs Teravix".to_owned(),
            unit_singular: "unidade".to_owned(),
            unit_plural: "unidades".to_owned(),
        }
    }
}

/// Marker and labels used to render a report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportSettings {
    /// Marker splitting orders into buckets.
    pub marker: ReferenceMarker,
    /// Bucket line wording.
    pub labels: ReportLabels,
}

fn plural<'a>(count: u32, singular: &'a str, plural: &'a str) -> &'a str {
    if count == 1 { singular } else { plural }
}

fn bucket_line(total: BucketTotal, singular: &str, plural_label: &str, labels: &ReportLabels) -> String {
    format!(
        "• {} {} com {} {}",
        total.count,
        plural(total.count, singular, plural_label),
        total.quantity,
        plural(total.quantity, &labels.unit_singular, &labels.unit_plural),
    )
}

fn section(orders: &[Order], settings: &ReportSettings, placeholder: &str) -> String {
    let totals = settings.marker.totals(orders);
    let labels = &settings.labels;
    let mut lines = Vec::with_capacity(2);
    if !totals.unmarked.is_empty() {
        lines.push(bucket_line(
            totals.unmarked,
            &labels.unmarked_singular,
            &labels.unmarked_plural,
            labels,
        ));
    }
    if !totals.marked.is_empty() {
        lines.push(bucket_line(
            totals.marked,
            &labels.marked_singular,
            &labels.marked_plural,
            labels,
        ));
    }
    if lines.is_empty() {
        return placeholder.to_owned();
    }
    lines.join("\n")
}

/// Renders the activity report text.
///
/// `completed` should hold the orders completed within `period` and
/// `backlog` the orders currently in Backlog or In Assembly; no further
/// filtering happens here.
///
/// # Errors
///
/// Returns [`ReportError::Render`] when the template engine fails.
pub fn generate_report(
    period: &ReportPeriod,
    completed: &[Order],
    backlog: &[Order],
    settings: &ReportSettings,
) -> Result<String, ReportError> {
    let mut env = Environment::new();
    env.add_template(TEMPLATE_NAME, TEMPLATE)?;
    let text = env.get_template(TEMPLATE_NAME)?.render(context! {
        title => period.title(),
        completed => section(completed, settings, NO_COMPLETED_ACTIVITY),
        backlog => section(backlog, settings, NO_BACKLOG_ACTIVITY),
    })?;
    Ok(text)
}
