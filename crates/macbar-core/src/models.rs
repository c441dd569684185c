use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDateTime, Weekday};
use serde::{Serialize, Serializer};

use crate::error::{DashboardError, Result};

// ── Category ──────────────────────────────────────────────────────────────────

/// A categorical column value with a fixed display label.
pub trait Category: Copy + Eq + Sized {
    /// Display label, e.g. `"April"` or `"Monday"`.
    fn label(&self) -> &'static str;

    /// Parse a label, case-insensitively, ignoring surrounding whitespace.
    fn parse_label(s: &str) -> Result<Self>;
}

// ── Month ─────────────────────────────────────────────────────────────────────

/// The seven tracked months, in their fixed display order.
///
/// The derived `Ord` is the April → October ordinal used to order aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Month {
    April,
    May,
    June,
    July,
    August,
    September,
    October,
}

impl Month {
    /// All tracked months in ordinal order.
    pub const ALL: [Month; 7] = [
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
    ];

    /// Months when school is in session.
    pub const SCHOOL: [Month; 3] = [Month::August, Month::September, Month::October];

    /// Months when school is out.
    pub const NON_SCHOOL: [Month; 4] = [Month::April, Month::May, Month::June, Month::July];

    /// Full English month name.
    pub fn name(&self) -> &'static str {
        match self {
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
            Month::July => "July",
            Month::August => "August",
            Month::September => "September",
            Month::October => "October",
        }
    }

    /// Three-letter abbreviation used on chart axes.
    pub fn abbrev(&self) -> &'static str {
        &self.name()[..3]
    }

    /// Calendar month number (April = 4).
    pub fn number(&self) -> u32 {
        *self as u32 + 4
    }

    /// Inverse of [`Month::number`]; `None` outside April–October.
    pub fn from_number(n: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.number() == n)
    }

    /// Lowercase name as used in export file names (`april_2024.csv`).
    pub fn file_stem(&self) -> String {
        self.name().to_lowercase()
    }

    pub fn is_school_month(&self) -> bool {
        Self::SCHOOL.contains(self)
    }
}

impl Category for Month {
    fn label(&self) -> &'static str {
        self.name()
    }

    fn parse_label(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|m| {
                let name = m.name().to_lowercase();
                name == wanted || (wanted.len() == 3 && name.starts_with(&wanted))
            })
            .ok_or_else(|| DashboardError::UnknownMonth(s.to_string()))
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Month {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_label(s)
    }
}

// ── Weekday ───────────────────────────────────────────────────────────────────

/// Full English weekday name (`"Monday"`), the `DayOfWeek` column value.
pub fn day_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

impl Category for Weekday {
    fn label(&self) -> &'static str {
        day_name(*self)
    }

    fn parse_label(s: &str) -> Result<Self> {
        s.trim()
            .parse::<Weekday>()
            .map_err(|_| DashboardError::UnknownDay(s.to_string()))
    }
}

/// Serialise an optional weekday by its full name.
pub fn serialize_day_name<S: Serializer>(
    day: &Option<Weekday>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match day {
        Some(d) => serializer.serialize_some(day_name(*d)),
        None => serializer.serialize_none(),
    }
}

// ── Filter ────────────────────────────────────────────────────────────────────

/// An equality filter on one categorical column, or the `"All"` sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter<T> {
    All,
    Only(T),
}

impl<T> Default for Filter<T> {
    fn default() -> Self {
        Filter::All
    }
}

impl<T: Category> Filter<T> {
    /// Label shown in selection widgets.
    pub fn label(&self) -> &'static str {
        match self {
            Filter::All => "All",
            Filter::Only(v) => v.label(),
        }
    }

    /// `true` when `value` passes the filter. A missing value only passes `All`.
    pub fn matches(&self, value: Option<T>) -> bool {
        match self {
            Filter::All => true,
            Filter::Only(wanted) => value == Some(*wanted),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Filter::All)
    }
}

impl<T: Category> FromStr for Filter<T> {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(Filter::All)
        } else {
            T::parse_label(s).map(Filter::Only)
        }
    }
}

impl<T: Category> fmt::Display for Filter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl<T: Category> Serialize for Filter<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// The two filter selections driving the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Selections {
    pub month: Filter<Month>,
    pub day: Filter<Weekday>,
}

impl Selections {
    pub fn new(month: Filter<Month>, day: Filter<Weekday>) -> Self {
        Self { month, day }
    }
}

// ── OrderLine ─────────────────────────────────────────────────────────────────

/// One order-line item from a monthly export.
///
/// Empty cells are `None`. Columns the pipeline does not consume are kept in
/// `extra`, keyed by their trimmed header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLine {
    /// `Order #` column.
    pub order_number: Option<String>,
    /// `Order ID` column, the identity used for distinct order counts.
    pub order_id: Option<String>,
    /// Parsed `Sent Date`; `None` when absent or unparseable.
    pub sent_date: Option<NaiveDateTime>,
    pub modifier: Option<String>,
    pub month: Month,
    /// Derived from `sent_date`.
    pub day_of_week: Option<Weekday>,
    pub extra: BTreeMap<String, String>,
}

impl OrderLine {
    /// Build a line for `month` with every other column empty.
    pub fn new(month: Month) -> Self {
        Self {
            order_number: None,
            order_id: None,
            sent_date: None,
            modifier: None,
            month,
            day_of_week: None,
            extra: BTreeMap::new(),
        }
    }

    /// Set `sent_date` and re-derive `day_of_week` from it.
    pub fn with_sent_date(mut self, sent_date: Option<NaiveDateTime>) -> Self {
        use chrono::Datelike as _;
        self.day_of_week = sent_date.map(|ts| ts.weekday());
        self.sent_date = sent_date;
        self
    }
}

// ── UnifiedTable ──────────────────────────────────────────────────────────────

/// All monthly exports concatenated in file-then-row order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnifiedTable {
    /// Trimmed column names in first-seen order, including the derived
    /// `Month` and `DayOfWeek` columns.
    pub columns: Vec<String>,
    pub rows: Vec<OrderLine>,
}

impl UnifiedTable {
    pub fn new(columns: Vec<String>, rows: Vec<OrderLine>) -> Self {
        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct months in order of first appearance.
    pub fn months_present(&self) -> Vec<Month> {
        let mut seen = Vec::new();
        for row in &self.rows {
            if !seen.contains(&row.month) {
                seen.push(row.month);
            }
        }
        seen
    }

    /// Distinct non-missing weekdays in order of first appearance.
    pub fn days_present(&self) -> Vec<Weekday> {
        let mut seen = Vec::new();
        for day in self.rows.iter().filter_map(|r| r.day_of_week) {
            if !seen.contains(&day) {
                seen.push(day);
            }
        }
        seen
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
