use macbar_core::formatting::{format_average, format_hour, NO_DATA};
use macbar_core::models::day_name;
use macbar_data::aggregator::Insights;
use ratatui::text::{Line, Span};

use crate::themes::Theme;

/// One formatted insight: label, display value, and whether data backed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsightRow {
    pub label: &'static str,
    pub value: String,
    pub present: bool,
}

impl InsightRow {
    fn new(label: &'static str, value: Option<String>) -> Self {
        Self {
            label,
            present: value.is_some(),
            value: value.unwrap_or_else(|| NO_DATA.to_string()),
        }
    }
}

/// The four headline insights in display order.
pub fn insight_rows(insights: &Insights) -> Vec<InsightRow> {
    vec![
        InsightRow::new("Busiest Day", insights.busiest_day.map(|d| day_name(d).to_string())),
        InsightRow::new("Busiest Hour", insights.busiest_hour.map(format_hour)),
        InsightRow::new(
            "Average Monthly Sales",
            insights
                .average_monthly_sales
                .map(|v| format_average(Some(v))),
        ),
        InsightRow::new("Top Modifier", insights.top_modifier.clone()),
    ]
}

/// "Key Insights" block: a title followed by one `label: value` line each.
pub struct InsightsPanel<'a> {
    pub insights: &'a Insights,
    pub theme: &'a Theme,
}

impl<'a> InsightsPanel<'a> {
    pub fn new(insights: &'a Insights, theme: &'a Theme) -> Self {
        Self { insights, theme }
    }

    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let mut lines = vec![Line::from(Span::styled("Key Insights", self.theme.bold))];
        for row in insight_rows(self.insights) {
            lines.push(Line::from(vec![
                Span::styled(format!("{}: ", row.label), self.theme.insight_label),
                Span::styled(row.value, self.theme.insight_style(row.present)),
            ]));
        }
        lines
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::plain_text;
    use chrono::Weekday;

    fn sample() -> Insights {
        Insights {
            busiest_day: Some(Weekday::Sat),
            busiest_hour: Some(13),
            average_monthly_sales: Some(1_234.6),
            top_modifier: Some("Jalapeño".to_string()),
        }
    }

    #[test]
    fn test_insight_rows_formatting() {
        let rows = insight_rows(&sample());
        let values: Vec<&str> = rows.iter().map(|r| r.value.as_str()).collect();
        assert_eq!(values, vec!["Saturday", "13:00:00", "1,235", "Jalapeño"]);
        assert!(rows.iter().all(|r| r.present));
    }

    #[test]
    fn test_insight_rows_no_data() {
        let rows = insight_rows(&Insights::default());
        assert_eq!(rows.len(), 4);
        assert!(rows.iter().all(|r| r.value == NO_DATA && !r.present));
    }

    #[test]
    fn test_panel_lines() {
        let theme = Theme::dark();
        let insights = sample();
        let lines = InsightsPanel::new(&insights, &theme).to_lines();

        assert_eq!(lines.len(), 5);
        assert_eq!(plain_text(&lines[0]), "Key Insights");
        assert_eq!(plain_text(&lines[2]), "Busiest Hour: 13:00:00");
        assert_eq!(lines[1].spans[1].style, theme.insight_value);
    }

    #[test]
    fn test_panel_no_data_style() {
        let theme = Theme::dark();
        let insights = Insights::default();
        let lines = InsightsPanel::new(&insights, &theme).to_lines();
        assert_eq!(lines[4].spans[1].style, theme.no_data);
        assert_eq!(plain_text(&lines[4]), "Top Modifier: No data");
    }
}
