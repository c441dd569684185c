//! Sales aggregation over a filtered table view.
//!
//! Every function here is pure: it reads a [`TableView`] and returns owned,
//! serialisable summaries. Nothing is cached and nothing is mutated.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::hash::Hash;

use chrono::{NaiveDate, Timelike, Weekday};
use macbar_core::models::{serialize_day_name, Month};
use macbar_core::time_utils::days_between;
use serde::Serialize;

use crate::filter::TableView;

/// Number of modifiers reported by default.
pub const DEFAULT_TOP_N: usize = 10;

// ── Result types ──────────────────────────────────────────────────────────────

/// Distinct orders placed in one month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthlySales {
    pub month: Month,
    pub orders: u64,
}

/// Mean monthly sales inside and outside the school year.
///
/// `None` when none of the set's months are present.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SeasonAverages {
    pub school: Option<f64>,
    pub non_school: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModifierCount {
    pub modifier: String,
    pub count: u64,
}

/// Distinct orders on one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyOrders {
    pub date: NaiveDate,
    pub orders: u64,
}

/// Order-line rows sent during one hour of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HourlyOrders {
    pub hour: u32,
    pub lines: u64,
}

/// Scalar headline figures. Every field is `None` for an empty view.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Insights {
    #[serde(serialize_with = "serialize_day_name")]
    pub busiest_day: Option<Weekday>,
    pub busiest_hour: Option<u32>,
    pub average_monthly_sales: Option<f64>,
    pub top_modifier: Option<String>,
}

impl Insights {
    pub fn is_empty(&self) -> bool {
        self.busiest_day.is_none()
            && self.busiest_hour.is_none()
            && self.average_monthly_sales.is_none()
            && self.top_modifier.is_none()
    }
}

/// Everything the renderers display for one selection.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Aggregates {
    /// Rows in the view the aggregates were computed from.
    pub row_count: usize,
    pub monthly_sales: Vec<MonthlySales>,
    pub season_averages: SeasonAverages,
    pub top_modifiers: Vec<ModifierCount>,
    pub daily_orders: Vec<DailyOrders>,
    pub hourly_orders: Vec<HourlyOrders>,
    pub insights: Insights,
}

// ── Options ───────────────────────────────────────────────────────────────────

/// How hours without any rows appear in the hourly series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HourlyFill {
    /// Only observed hours.
    #[default]
    Sparse,
    /// Every hour from the first to the last observed, zero where empty.
    ZeroFilled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregateOptions {
    pub hourly_fill: HourlyFill,
    pub top_n: usize,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            hourly_fill: HourlyFill::Sparse,
            top_n: DEFAULT_TOP_N,
        }
    }
}

// ── SalesAggregator ───────────────────────────────────────────────────────────

/// Stateless helper computing each summary from a view.
pub struct SalesAggregator;

impl SalesAggregator {
    /// Distinct non-missing `Order ID`s per month, in month order.
    ///
    /// Months with no rows in the view are omitted; a month whose rows all
    /// lack an ID reports zero.
    pub fn monthly_sales(view: &TableView<'_>) -> Vec<MonthlySales> {
        let mut ids: BTreeMap<Month, HashSet<&str>> = BTreeMap::new();
        for row in view.iter() {
            let set = ids.entry(row.month).or_default();
            if let Some(id) = row.order_id.as_deref() {
                set.insert(id);
            }
        }
        ids.into_iter()
            .map(|(month, set)| MonthlySales {
                month,
                orders: set.len() as u64,
            })
            .collect()
    }

    /// Mean of `monthly` split into school and non-school months.
    pub fn season_averages(monthly: &[MonthlySales]) -> SeasonAverages {
        let mean_of = |school: bool| {
            let values: Vec<f64> = monthly
                .iter()
                .filter(|m| m.month.is_school_month() == school)
                .map(|m| m.orders as f64)
                .collect();
            mean(&values)
        };
        SeasonAverages {
            school: mean_of(true),
            non_school: mean_of(false),
        }
    }

    /// The `n` most frequent non-missing modifiers, most frequent first.
    pub fn top_modifiers(view: &TableView<'_>, n: usize) -> Vec<ModifierCount> {
        ranked_counts(view.iter().filter_map(|r| r.modifier.as_deref()))
            .into_iter()
            .take(n)
            .map(|(modifier, count)| ModifierCount {
                modifier: modifier.to_string(),
                count,
            })
            .collect()
    }

    /// Distinct `Order ID`s per calendar day, covering every day from the
    /// earliest to the latest `Sent Date` in the view.
    pub fn daily_orders(view: &TableView<'_>) -> Vec<DailyOrders> {
        let mut ids: BTreeMap<NaiveDate, HashSet<&str>> = BTreeMap::new();
        for row in view.iter() {
            let Some(sent) = row.sent_date else { continue };
            let set = ids.entry(sent.date()).or_default();
            if let Some(id) = row.order_id.as_deref() {
                set.insert(id);
            }
        }

        let (Some(first), Some(last)) = (
            ids.keys().next().copied(),
            ids.keys().next_back().copied(),
        ) else {
            return Vec::new();
        };

        days_between(first, last)
            .into_iter()
            .map(|date| DailyOrders {
                date,
                orders: ids.get(&date).map_or(0, |s| s.len() as u64),
            })
            .collect()
    }

    /// Rows with a present `Order #`, bucketed by hour of `Sent Date`.
    ///
    /// An hour whose rows all lack `Order #` still appears, with zero.
    pub fn hourly_orders(view: &TableView<'_>, fill: HourlyFill) -> Vec<HourlyOrders> {
        let mut counts: BTreeMap<u32, u64> = BTreeMap::new();
        for row in view.iter() {
            let Some(sent) = row.sent_date else { continue };
            let count = counts.entry(sent.hour()).or_default();
            if row.order_number.is_some() {
                *count += 1;
            }
        }

        match fill {
            HourlyFill::Sparse => counts
                .into_iter()
                .map(|(hour, lines)| HourlyOrders { hour, lines })
                .collect(),
            HourlyFill::ZeroFilled => {
                let (Some(&first), Some(&last)) =
                    (counts.keys().next(), counts.keys().next_back())
                else {
                    return Vec::new();
                };
                (first..=last)
                    .map(|hour| HourlyOrders {
                        hour,
                        lines: counts.get(&hour).copied().unwrap_or(0),
                    })
                    .collect()
            }
        }
    }

    /// Headline figures derived from the view and its monthly series.
    pub fn insights(
        view: &TableView<'_>,
        monthly: &[MonthlySales],
        top: &[ModifierCount],
    ) -> Insights {
        let busiest_day = ranked_counts(view.iter().filter_map(|r| r.day_of_week))
            .first()
            .map(|(day, _)| *day);
        let busiest_hour = ranked_counts(view.iter().filter_map(|r| r.sent_date.map(|t| t.hour())))
            .first()
            .map(|(hour, _)| *hour);
        let totals: Vec<f64> = monthly.iter().map(|m| m.orders as f64).collect();

        Insights {
            busiest_day,
            busiest_hour,
            average_monthly_sales: mean(&totals),
            top_modifier: top.first().map(|m| m.modifier.clone()),
        }
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Compute every summary with default options.
pub fn aggregate(view: &TableView<'_>) -> Aggregates {
    aggregate_with(view, &AggregateOptions::default())
}

pub fn aggregate_with(view: &TableView<'_>, options: &AggregateOptions) -> Aggregates {
    let monthly_sales = SalesAggregator::monthly_sales(view);
    let season_averages = SalesAggregator::season_averages(&monthly_sales);
    let top_modifiers = SalesAggregator::top_modifiers(view, options.top_n);
    let daily_orders = SalesAggregator::daily_orders(view);
    let hourly_orders = SalesAggregator::hourly_orders(view, options.hourly_fill);
    let insights = SalesAggregator::insights(view, &monthly_sales, &top_modifiers);

    Aggregates {
        row_count: view.len(),
        monthly_sales,
        season_averages,
        top_modifiers,
        daily_orders,
        hourly_orders,
        insights,
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Count occurrences and sort by count descending; equal counts keep the
/// order in which each value was first seen.
fn ranked_counts<T, I>(values: I) -> Vec<(T, u64)>
where
    T: Eq + Hash + Copy,
    I: IntoIterator<Item = T>,
{
    let mut index: HashMap<T, usize> = HashMap::new();
    let mut counts: Vec<(T, u64)> = Vec::new();
    for value in values {
        match index.get(&value) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(value, counts.len());
                counts.push((value, 1));
            }
        }
    }
    // Stable sort preserves first-seen order among ties.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
