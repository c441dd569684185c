//! Interactive selection state over a loaded table.

use std::sync::Arc;

use chrono::Weekday;
use macbar_core::models::{Filter, Month, OrderLine, Selections, UnifiedTable};
use macbar_data::aggregator::{aggregate_with, AggregateOptions, Aggregates};
use macbar_data::filter::apply;
use tracing::debug;

// ── DashboardSession ──────────────────────────────────────────────────────────

/// The shared table plus the current month/day selection.
///
/// Option lists are `All` followed by the values present in the table, in
/// first-seen order. Every query re-runs filter and aggregate from scratch.
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
/// use macbar_core::models::UnifiedTable;
/// use macbar_runtime::session::DashboardSession;
///
/// let mut session = DashboardSession::new(Arc::new(UnifiedTable::default()));
/// session.cycle_month(1);
/// println!("{} rows", session.aggregates().row_count);
/// ```
#[derive(Debug, Clone)]
pub struct DashboardSession {
    table: Arc<UnifiedTable>,
    selections: Selections,
    options: AggregateOptions,
    month_options: Vec<Filter<Month>>,
    day_options: Vec<Filter<Weekday>>,
}

impl DashboardSession {
    pub fn new(table: Arc<UnifiedTable>) -> Self {
        Self::with_options(table, AggregateOptions::default())
    }

    pub fn with_options(table: Arc<UnifiedTable>, options: AggregateOptions) -> Self {
        let month_options = std::iter::once(Filter::All)
            .chain(table.months_present().into_iter().map(Filter::Only))
            .collect();
        let day_options = std::iter::once(Filter::All)
            .chain(table.days_present().into_iter().map(Filter::Only))
            .collect();

        Self {
            table,
            selections: Selections::default(),
            options,
            month_options,
            day_options,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn table(&self) -> &UnifiedTable {
        &self.table
    }

    pub fn selections(&self) -> Selections {
        self.selections
    }

    pub fn options(&self) -> AggregateOptions {
        self.options
    }

    pub fn month_options(&self) -> &[Filter<Month>] {
        &self.month_options
    }

    pub fn day_options(&self) -> &[Filter<Weekday>] {
        &self.day_options
    }

    // ── Selection ─────────────────────────────────────────────────────────

    /// Set the month selection. A month absent from the data is allowed and
    /// simply yields an empty view.
    pub fn select_month(&mut self, month: Filter<Month>) {
        self.selections.month = month;
        debug!("Month selection: {}", month);
    }

    pub fn select_day(&mut self, day: Filter<Weekday>) {
        self.selections.day = day;
        debug!("Day selection: {}", day);
    }

    /// Move the month selection `step` places through the option list,
    /// wrapping at either end.
    pub fn cycle_month(&mut self, step: isize) {
        let next = cycle(&self.month_options, &self.selections.month, step);
        self.select_month(next);
    }

    pub fn cycle_day(&mut self, step: isize) {
        let next = cycle(&self.day_options, &self.selections.day, step);
        self.select_day(next);
    }

    /// Back to `All` / `All`.
    pub fn reset_filters(&mut self) {
        self.selections = Selections::default();
        debug!("Filters reset");
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Rows matching the current selection, in table order.
    pub fn filtered_rows(&self) -> Vec<&OrderLine> {
        apply(&self.table, self.selections).rows
    }

    /// Filter then aggregate under the current selection.
    pub fn aggregates(&self) -> Aggregates {
        let view = apply(&self.table, self.selections);
        aggregate_with(&view, &self.options)
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// The option `step` places from `current`; an unlisted current value counts
/// as position 0.
fn cycle<T: Copy + PartialEq>(options: &[T], current: &T, step: isize) -> T {
    if options.is_empty() {
        return *current;
    }
    let len = options.len() as isize;
    let pos = options.iter().position(|o| o == current).unwrap_or(0) as isize;
    options[(pos + step).rem_euclid(len) as usize]
}

// ── Tests ─────────────────────────────────────────────────────────────────────
