//! Full-screen terminal dashboard: header, filter/insight sidebar and four
//! charts (monthly, top modifiers, daily, hourly).

use macbar_core::formatting::{format_average, format_count};
use macbar_core::models::{Month, Selections};
use macbar_data::aggregator::{Aggregates, DailyOrders, HourlyOrders, ModifierCount, MonthlySales};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    symbols,
    text::{Line, Span, Text},
    widgets::{Axis, BarChart, Block, Borders, Chart, Dataset, GraphType, Paragraph, Wrap},
    Frame,
};

use crate::components::header::Header;
use crate::components::insights::InsightsPanel;
use crate::themes::Theme;

const SIDEBAR_WIDTH: u16 = 34;

// ── Public API ────────────────────────────────────────────────────────────────

/// Draw the whole dashboard for one selection into `area`.
pub fn render_dashboard(
    frame: &mut Frame,
    area: Rect,
    aggregates: &Aggregates,
    selections: &Selections,
    theme: &Theme,
) {
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(4),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    frame.render_widget(
        Paragraph::new(Text::from(Header::new(selections, theme).to_lines())),
        header_area,
    );

    let [sidebar_area, charts_area] =
        Layout::horizontal([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
            .areas(body_area);
    render_sidebar(frame, sidebar_area, aggregates, selections, theme);

    let [top, bottom] =
        Layout::vertical([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(charts_area);
    let [monthly_area, modifiers_area] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(top);
    let [daily_area, hourly_area] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(bottom);

    if selections.month.is_all() {
        render_monthly_chart(frame, monthly_area, aggregates, theme);
    } else {
        render_month_bar(frame, monthly_area, &aggregates.monthly_sales, theme);
    }
    render_modifier_bars(frame, modifiers_area, &aggregates.top_modifiers, theme);
    render_daily_chart(frame, daily_area, &aggregates.daily_orders, theme);
    render_hourly_chart(frame, hourly_area, &aggregates.hourly_orders, theme);

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            "m/M month  d/D day  r reset  q quit",
            theme.dim,
        ))),
        footer_area,
    );
}

/// Shown in place of a chart whose series is empty.
pub fn render_no_data(frame: &mut Frame, area: Rect, title: &str, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("No data for this selection", theme.no_data)),
        Line::from(Span::styled("Press 'r' to reset filters", theme.dim)),
    ];
    frame.render_widget(Paragraph::new(Text::from(text)).block(panel(title, theme)), area);
}

// ── Sidebar ───────────────────────────────────────────────────────────────────

fn render_sidebar(
    frame: &mut Frame,
    area: Rect,
    aggregates: &Aggregates,
    selections: &Selections,
    theme: &Theme,
) {
    let mut lines = vec![
        Line::from(Span::styled("Filters", theme.bold)),
        Line::from(vec![
            Span::styled("Month: ", theme.label),
            Span::styled(
                selections.month.label(),
                theme.filter_style(selections.month.is_all()),
            ),
        ]),
        Line::from(vec![
            Span::styled("Day:   ", theme.label),
            Span::styled(
                selections.day.label(),
                theme.filter_style(selections.day.is_all()),
            ),
        ]),
        Line::from(vec![
            Span::styled("Rows:  ", theme.label),
            Span::styled(format_count(aggregates.row_count as u64), theme.value),
        ]),
        Line::from(""),
    ];
    lines.extend(InsightsPanel::new(&aggregates.insights, theme).to_lines());

    frame.render_widget(
        Paragraph::new(Text::from(lines))
            .wrap(Wrap { trim: false })
            .block(panel("Dashboard", theme)),
        area,
    );
}

// ── Monthly ───────────────────────────────────────────────────────────────────

fn render_monthly_chart(frame: &mut Frame, area: Rect, aggregates: &Aggregates, theme: &Theme) {
    const TITLE: &str = "Monthly Sales";
    let monthly = &aggregates.monthly_sales;
    let (Some(first), Some(last)) = (monthly.first(), monthly.last()) else {
        return render_no_data(frame, area, TITLE, theme);
    };

    let points: Vec<(f64, f64)> = monthly
        .iter()
        .map(|m| (m.month.number() as f64, m.orders as f64))
        .collect();
    let x_bounds = padded_bounds(first.month.number() as f64, last.month.number() as f64);
    let flat = |y: f64| vec![(x_bounds[0], y), (x_bounds[1], y)];
    let school = aggregates.season_averages.school.map(flat);
    let non_school = aggregates.season_averages.non_school.map(flat);

    let mut datasets = vec![Dataset::default()
        .name("Orders")
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(theme.monthly_series)
        .data(&points)];
    if let Some(data) = school.as_deref() {
        datasets.push(
            Dataset::default()
                .name(format!("School avg {}", format_average(aggregates.season_averages.school)))
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(theme.school_average)
                .data(data),
        );
    }
    if let Some(data) = non_school.as_deref() {
        datasets.push(
            Dataset::default()
                .name(format!(
                    "Non-school avg {}",
                    format_average(aggregates.season_averages.non_school)
                ))
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(theme.non_school_average)
                .data(data),
        );
    }

    let x_labels: Vec<String> = (first.month.number()..=last.month.number())
        .filter_map(Month::from_number)
        .map(|m| m.abbrev().to_string())
        .collect();
    let y_max = y_upper(monthly.iter().map(|m| m.orders as f64).chain([
        aggregates.season_averages.school.unwrap_or(0.0),
        aggregates.season_averages.non_school.unwrap_or(0.0),
    ]));

    let chart = Chart::new(datasets)
        .block(panel(TITLE, theme))
        .x_axis(
            Axis::default()
                .title("Month")
                .style(theme.axis)
                .bounds(x_bounds)
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .title("Orders")
                .style(theme.axis)
                .bounds([0.0, y_max])
                .labels(y_labels(y_max)),
        );
    frame.render_widget(chart, area);
}

/// Single-bar view used when one month is selected.
fn render_month_bar(frame: &mut Frame, area: Rect, monthly: &[MonthlySales], theme: &Theme) {
    const TITLE: &str = "Monthly Sales";
    if monthly.is_empty() {
        return render_no_data(frame, area, TITLE, theme);
    }

    let data: Vec<(&str, u64)> = monthly
        .iter()
        .map(|m| (m.month.name(), m.orders))
        .collect();
    let chart = BarChart::default()
        .block(panel(TITLE, theme))
        .data(&data[..])
        .bar_width(9)
        .bar_style(theme.monthly_series)
        .value_style(theme.bar_value)
        .label_style(theme.axis);
    frame.render_widget(chart, area);
}

// ── Modifiers ─────────────────────────────────────────────────────────────────

fn render_modifier_bars(frame: &mut Frame, area: Rect, top: &[ModifierCount], theme: &Theme) {
    let title = format!("Top {} Modifiers", top.len().max(1));
    if top.is_empty() {
        return render_no_data(frame, area, &title, theme);
    }

    let data: Vec<(&str, u64)> = top.iter().map(|m| (m.modifier.as_str(), m.count)).collect();
    let chart = BarChart::default()
        .block(panel(&title, theme))
        .direction(Direction::Horizontal)
        .data(&data[..])
        .bar_width(1)
        .bar_gap(0)
        .bar_style(theme.modifier_bar)
        .value_style(theme.bar_value)
        .label_style(theme.label);
    frame.render_widget(chart, area);
}

// ── Daily / hourly ────────────────────────────────────────────────────────────

fn render_daily_chart(frame: &mut Frame, area: Rect, daily: &[DailyOrders], theme: &Theme) {
    const TITLE: &str = "Daily Sales Over Time";
    if daily.is_empty() {
        return render_no_data(frame, area, TITLE, theme);
    }

    let points: Vec<(f64, f64)> = daily
        .iter()
        .enumerate()
        .map(|(i, d)| (i as f64, d.orders as f64))
        .collect();
    let x_bounds = padded_bounds(0.0, (daily.len() - 1) as f64);
    let y_max = y_upper(daily.iter().map(|d| d.orders as f64));

    let chart = Chart::new(vec![Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(theme.daily_series)
        .data(&points)])
    .block(panel(TITLE, theme))
    .x_axis(
        Axis::default()
            .style(theme.axis)
            .bounds(x_bounds)
            .labels(month_labels(daily)),
    )
    .y_axis(
        Axis::default()
            .title("Orders")
            .style(theme.axis)
            .bounds([0.0, y_max])
            .labels(y_labels(y_max)),
    );
    frame.render_widget(chart, area);
}

fn render_hourly_chart(frame: &mut Frame, area: Rect, hourly: &[HourlyOrders], theme: &Theme) {
    const TITLE: &str = "Hourly Sales Distribution";
    let (Some(first), Some(last)) = (hourly.first(), hourly.last()) else {
        return render_no_data(frame, area, TITLE, theme);
    };

    let points: Vec<(f64, f64)> = hourly
        .iter()
        .map(|h| (h.hour as f64, h.lines as f64))
        .collect();
    let x_bounds = padded_bounds(first.hour as f64, last.hour as f64);
    let y_max = y_upper(hourly.iter().map(|h| h.lines as f64));
    let mid = (first.hour + last.hour) / 2;
    let x_labels: Vec<String> = [first.hour, mid, last.hour]
        .iter()
        .map(|h| format!("{:02}h", h))
        .collect();

    let chart = Chart::new(vec![Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(theme.hourly_series)
        .data(&points)])
    .block(panel(TITLE, theme))
    .x_axis(
        Axis::default()
            .title("Hour")
            .style(theme.axis)
            .bounds(x_bounds)
            .labels(x_labels),
    )
    .y_axis(
        Axis::default()
            .title("Lines")
            .style(theme.axis)
            .bounds([0.0, y_max])
            .labels(y_labels(y_max)),
    );
    frame.render_widget(chart, area);
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn panel<'a>(title: &str, theme: &Theme) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(theme.chart_border)
        .title(Span::styled(format!(" {} ", title), theme.chart_title))
}

/// Chart x-bounds, widened around a single point so the axis is not empty.
fn padded_bounds(min: f64, max: f64) -> [f64; 2] {
    if max > min {
        [min, max]
    } else {
        [min - 0.5, max + 0.5]
    }
}

/// Ten percent headroom over the largest value, at least 1.
fn y_upper(values: impl Iterator<Item = f64>) -> f64 {
    let max = values.fold(0.0_f64, f64::max);
    (max * 1.1).ceil().max(1.0)
}

fn y_labels(y_max: f64) -> Vec<String> {
    vec![
        "0".to_string(),
        format_count((y_max / 2.0).round() as u64),
        format_count(y_max as u64),
    ]
}

/// Distinct month abbreviations spanned by a daily series, in date order.
fn month_labels(daily: &[DailyOrders]) -> Vec<String> {
    let mut labels: Vec<String> = Vec::new();
    for d in daily {
        let abbrev = d.date.format("%b").to_string();
        if labels.last() != Some(&abbrev) {
            labels.push(abbrev);
        }
    }
    labels
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Weekday};
    use macbar_core::models::Filter;
    use macbar_data::aggregator::{Insights, SeasonAverages};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn sample() -> Aggregates {
        let start = NaiveDate::from_ymd_opt(2024, 4, 28).unwrap();
        Aggregates {
            row_count: 42,
            monthly_sales: vec![
                MonthlySales { month: Month::April, orders: 120 },
                MonthlySales { month: Month::May, orders: 150 },
                MonthlySales { month: Month::August, orders: 200 },
            ],
            season_averages: SeasonAverages {
                school: Some(200.0),
                non_school: Some(135.0),
            },
            top_modifiers: vec![
                ModifierCount { modifier: "Cheese".into(), count: 30 },
                ModifierCount { modifier: "Bacon".into(), count: 12 },
            ],
            daily_orders: (0..5)
                .map(|i| DailyOrders {
                    date: start + chrono::Duration::days(i),
                    orders: (i as u64) * 3,
                })
                .collect(),
            hourly_orders: vec![
                HourlyOrders { hour: 11, lines: 5 },
                HourlyOrders { hour: 12, lines: 9 },
                HourlyOrders { hour: 18, lines: 4 },
            ],
            insights: Insights {
                busiest_day: Some(Weekday::Fri),
                busiest_hour: Some(12),
                average_monthly_sales: Some(156.7),
                top_modifier: Some("Cheese".into()),
            },
        }
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    fn draw(aggregates: &Aggregates, selections: &Selections) -> Terminal<TestBackend> {
        let mut terminal = Terminal::new(TestBackend::new(140, 40)).unwrap();
        let theme = Theme::dark();
        terminal
            .draw(|frame| {
                let area = frame.area();
                render_dashboard(frame, area, aggregates, selections, &theme);
            })
            .unwrap();
        terminal
    }

    #[test]
    fn test_render_dashboard_all_months() {
        let terminal = draw(&sample(), &Selections::default());
        let text = buffer_text(&terminal);

        assert!(text.contains("RONI'S MAC BAR SALES DASHBOARD"));
        assert!(text.contains("Monthly Sales"));
        assert!(text.contains("Top 2 Modifiers"));
        assert!(text.contains("Daily Sales Over Time"));
        assert!(text.contains("Hourly Sales Distribution"));
        assert!(text.contains("Busiest Day: Friday"));
        assert!(text.contains("Busiest Hour: 12:00:00"));
    }

    #[test]
    fn test_render_dashboard_single_month() {
        let mut agg = sample();
        agg.monthly_sales.truncate(1);
        let selections = Selections::new(Filter::Only(Month::April), Filter::All);
        let terminal = draw(&agg, &selections);
        let text = buffer_text(&terminal);

        assert!(text.contains("month: April"));
        assert!(text.contains("April"));
    }

    #[test]
    fn test_render_dashboard_empty_does_not_panic() {
        let selections = Selections::new(Filter::Only(Month::October), Filter::Only(Weekday::Mon));
        let terminal = draw(&Aggregates::default(), &selections);
        let text = buffer_text(&terminal);

        assert!(text.contains("No data for this selection"));
        assert!(text.contains("Top Modifier: No data"));
    }

    #[test]
    fn test_render_dashboard_tiny_terminal_does_not_panic() {
        let mut terminal = Terminal::new(TestBackend::new(20, 6)).unwrap();
        let theme = Theme::classic();
        terminal
            .draw(|frame| {
                let area = frame.area();
                render_dashboard(frame, area, &sample(), &Selections::default(), &theme);
            })
            .unwrap();
    }

    #[test]
    fn test_month_labels_span() {
        let labels = month_labels(&sample().daily_orders);
        assert_eq!(labels, vec!["Apr", "May"]);
    }

    #[test]
    fn test_axis_helpers() {
        assert_eq!(padded_bounds(4.0, 4.0), [3.5, 4.5]);
        assert_eq!(padded_bounds(4.0, 10.0), [4.0, 10.0]);
        assert_eq!(y_upper([0.0].into_iter()), 1.0);
        assert_eq!(y_upper([100.0, 50.0].into_iter()), 110.0);
    }
}
