//! Month / weekday row filtering over a loaded table.

use chrono::Weekday;
use macbar_core::models::{Filter, Month, OrderLine, Selections, UnifiedTable};
use tracing::debug;

/// A borrowed, order-preserving subset of a [`UnifiedTable`].
///
/// Shares the table's column set; never copies row data.
#[derive(Debug, Clone)]
pub struct TableView<'a> {
    pub columns: &'a [String],
    pub rows: Vec<&'a OrderLine>,
}

impl<'a> TableView<'a> {
    /// A view over every row of `table`.
    pub fn all(table: &'a UnifiedTable) -> Self {
        Self {
            columns: &table.columns,
            rows: table.rows.iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a OrderLine> + '_ {
        self.rows.iter().copied()
    }
}

impl<'a> From<&'a UnifiedTable> for TableView<'a> {
    fn from(table: &'a UnifiedTable) -> Self {
        Self::all(table)
    }
}

/// Keep the rows matching both selections, in their original order.
///
/// `Filter::All` imposes no constraint. A row with no weekday (unparseable
/// `Sent Date`) is excluded by any specific day selection.
pub fn filter(table: &UnifiedTable, month: Filter<Month>, day: Filter<Weekday>) -> TableView<'_> {
    let rows: Vec<&OrderLine> = table
        .rows
        .iter()
        .filter(|row| month.matches(Some(row.month)) && day.matches(row.day_of_week))
        .collect();

    debug!(
        "Filter month={} day={}: {} of {} rows",
        month,
        day,
        rows.len(),
        table.len()
    );

    TableView {
        columns: &table.columns,
        rows,
    }
}

/// [`filter`] driven by a [`Selections`] pair.
pub fn apply(table: &UnifiedTable, selections: Selections) -> TableView<'_> {
    filter(table, selections.month, selections.day)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn ts(m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn line(id: &str, month: Month, sent: Option<NaiveDateTime>) -> OrderLine {
        let mut l = OrderLine::new(month).with_sent_date(sent);
        l.order_id = Some(id.to_string());
        l
    }

    fn sample() -> UnifiedTable {
        UnifiedTable::new(
            vec!["Order ID".into(), "Month".into(), "DayOfWeek".into()],
            vec![
                line("a", Month::April, Some(ts(4, 1, 10))), // Mon
                line("b", Month::April, Some(ts(4, 2, 11))), // Tue
                line("c", Month::May, Some(ts(5, 6, 12))),   // Mon
                line("d", Month::May, None),
                line("e", Month::April, Some(ts(4, 8, 13))), // Mon
            ],
        )
    }

    fn ids(view: &TableView<'_>) -> Vec<String> {
        view.iter()
            .map(|r| r.order_id.clone().unwrap_or_default())
            .collect()
    }

    #[test]
    fn test_filter_all_all_is_identity() {
        let table = sample();
        let view = filter(&table, Filter::All, Filter::All);
        assert_eq!(view.len(), table.len());
        assert_eq!(ids(&view), vec!["a", "b", "c", "d", "e"]);
        assert_eq!(view.columns, table.columns.as_slice());
    }

    #[test]
    fn test_filter_by_month_preserves_order() {
        let table = sample();
        let view = filter(&table, Filter::Only(Month::April), Filter::All);
        assert_eq!(ids(&view), vec!["a", "b", "e"]);
    }

    #[test]
    fn test_filter_by_day_excludes_missing_weekday() {
        let table = sample();
        let view = filter(&table, Filter::All, Filter::Only(Weekday::Mon));
        assert_eq!(ids(&view), vec!["a", "c", "e"]);
    }

    #[test]
    fn test_filter_both() {
        let table = sample();
        let view = filter(&table, Filter::Only(Month::May), Filter::Only(Weekday::Mon));
        assert_eq!(ids(&view), vec!["c"]);
    }

    #[test]
    fn test_filter_is_subset_and_matches() {
        let table = sample();
        for month in [Filter::All, Filter::Only(Month::April), Filter::Only(Month::October)] {
            for day in [Filter::All, Filter::Only(Weekday::Mon), Filter::Only(Weekday::Sun)] {
                let view = filter(&table, month, day);
                assert!(view.len() <= table.len());
                for row in view.iter() {
                    assert!(month.matches(Some(row.month)));
                    assert!(day.matches(row.day_of_week));
                }
            }
        }
    }

    #[test]
    fn test_filter_absent_value_is_empty() {
        let table = sample();
        let view = filter(&table, Filter::Only(Month::October), Filter::All);
        assert!(view.is_empty());
    }

    #[test]
    fn test_apply_uses_selections() {
        let table = sample();
        let view = apply(
            &table,
            Selections::new(Filter::Only(Month::April), Filter::Only(Weekday::Tue)),
        );
        assert_eq!(ids(&view), vec!["b"]);
    }

    #[test]
    fn test_view_from_table() {
        let table = sample();
        let view = TableView::from(&table);
        assert_eq!(view.len(), 5);
    }
}
