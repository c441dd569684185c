//! Output backends behind a single [`Renderer`] trait.
//!
//! The pipeline produces [`Aggregates`] for a [`Selections`] pair; a renderer
//! only decides how those figures reach the user.

use std::io::Write;

use macbar_core::error::{DashboardError, Result};
use macbar_core::formatting::{format_average, format_count, format_hour};
use macbar_core::models::{Filter, Selections};
use macbar_data::aggregator::Aggregates;
use ratatui::{backend::Backend, Terminal};
use serde::Serialize;
use unicode_width::UnicodeWidthStr;

use crate::components::header::Header;
use crate::components::insights::insight_rows;
use crate::components::plain_text;
use crate::dashboard_view::render_dashboard;
use crate::themes::Theme;

/// Width of the longest proportional bar in the text report.
const BAR_WIDTH: usize = 30;

/// Something that can present one set of aggregates.
pub trait Renderer {
    fn render(&mut self, aggregates: &Aggregates, selections: &Selections) -> Result<()>;
}

// ── TextRenderer ──────────────────────────────────────────────────────────────

/// Static plain-text report.
pub struct TextRenderer<W: Write> {
    out: W,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_monthly(&mut self, aggregates: &Aggregates, selections: &Selections) -> Result<()> {
        writeln!(self.out, "Monthly Sales")?;
        if aggregates.monthly_sales.is_empty() {
            writeln!(self.out, "  No data")?;
            return Ok(());
        }

        if let Filter::Only(month) = selections.month {
            let orders = aggregates
                .monthly_sales
                .iter()
                .find(|m| m.month == month)
                .map_or(0, |m| m.orders);
            writeln!(self.out, "  Sales for {}: {}", month, format_count(orders))?;
            return Ok(());
        }

        for m in &aggregates.monthly_sales {
            writeln!(self.out, "  {:<10} {:>8}", m.month.name(), format_count(m.orders))?;
        }
        let averages = &aggregates.season_averages;
        writeln!(
            self.out,
            "  {:<27} {:>8}",
            "School months average",
            format_average(averages.school)
        )?;
        writeln!(
            self.out,
            "  {:<27} {:>8}",
            "Non-school months average",
            format_average(averages.non_school)
        )?;
        Ok(())
    }

    fn write_modifiers(&mut self, aggregates: &Aggregates) -> Result<()> {
        let top = &aggregates.top_modifiers;
        writeln!(self.out, "Top {} Modifiers", top.len())?;
        if top.is_empty() {
            writeln!(self.out, "  No data")?;
            return Ok(());
        }

        let name_width = top.iter().map(|m| m.modifier.width()).max().unwrap_or(0);
        let max_count = top.iter().map(|m| m.count).max().unwrap_or(1).max(1);
        for m in top {
            let bar_len = ((m.count as f64 / max_count as f64) * BAR_WIDTH as f64).round() as usize;
            writeln!(
                self.out,
                "  {} {} {}",
                pad_to_width(&m.modifier, name_width),
                "█".repeat(bar_len.max(1)),
                format_count(m.count)
            )?;
        }
        Ok(())
    }

    fn write_series(&mut self, aggregates: &Aggregates) -> Result<()> {
        writeln!(self.out, "Daily Sales Over Time")?;
        if aggregates.daily_orders.is_empty() {
            writeln!(self.out, "  No data")?;
        }
        for d in &aggregates.daily_orders {
            writeln!(self.out, "  {} {:>6}", d.date.format("%Y-%m-%d"), format_count(d.orders))?;
        }
        writeln!(self.out)?;

        writeln!(self.out, "Hourly Sales Distribution")?;
        if aggregates.hourly_orders.is_empty() {
            writeln!(self.out, "  No data")?;
        }
        for h in &aggregates.hourly_orders {
            writeln!(self.out, "  {} {:>6}", format_hour(h.hour), format_count(h.lines))?;
        }
        Ok(())
    }

    fn write_insights(&mut self, aggregates: &Aggregates) -> Result<()> {
        writeln!(self.out, "Key Insights")?;
        for row in insight_rows(&aggregates.insights) {
            writeln!(self.out, "  {:<23}{}", format!("{}:", row.label), row.value)?;
        }
        Ok(())
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn render(&mut self, aggregates: &Aggregates, selections: &Selections) -> Result<()> {
        let theme = Theme::classic();
        for line in Header::new(selections, &theme).to_lines() {
            writeln!(self.out, "{}", plain_text(&line))?;
        }
        self.write_monthly(aggregates, selections)?;
        writeln!(self.out)?;
        self.write_modifiers(aggregates)?;
        writeln!(self.out)?;
        self.write_series(aggregates)?;
        writeln!(self.out)?;
        self.write_insights(aggregates)?;
        self.out.flush()?;
        Ok(())
    }
}

// ── JsonRenderer ──────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct Report<'a> {
    selections: &'a Selections,
    aggregates: &'a Aggregates,
}

/// Pretty-printed `{ "selections": .., "aggregates": .. }` document.
pub struct JsonRenderer<W: Write> {
    out: W,
}

impl<W: Write> JsonRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for JsonRenderer<W> {
    fn render(&mut self, aggregates: &Aggregates, selections: &Selections) -> Result<()> {
        let report = Report {
            selections,
            aggregates,
        };
        serde_json::to_writer_pretty(&mut self.out, &report)?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}

// ── TerminalRenderer ──────────────────────────────────────────────────────────

/// Draws one dashboard frame per call onto any ratatui backend.
pub struct TerminalRenderer<B: Backend> {
    terminal: Terminal<B>,
    theme: Theme,
}

impl<B: Backend> TerminalRenderer<B> {
    pub fn new(terminal: Terminal<B>, theme: Theme) -> Self {
        Self { terminal, theme }
    }

    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    pub fn terminal_mut(&mut self) -> &mut Terminal<B> {
        &mut self.terminal
    }
}

impl<B: Backend> Renderer for TerminalRenderer<B> {
    fn render(&mut self, aggregates: &Aggregates, selections: &Selections) -> Result<()> {
        let theme = &self.theme;
        self.terminal
            .draw(|frame| {
                let area = frame.area();
                render_dashboard(frame, area, aggregates, selections, theme);
            })
            .map_err(|e| DashboardError::Terminal(e.to_string()))?;
        Ok(())
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Right-pad `s` with spaces to `width` display columns.
fn pad_to_width(s: &str, width: usize) -> String {
    let pad = width.saturating_sub(s.width());
    format!("{}{}", s, " ".repeat(pad))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
