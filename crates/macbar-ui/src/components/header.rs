use macbar_core::models::Selections;
use ratatui::text::{Line, Span};

use crate::themes::Theme;

/// Decorative sparkle string placed either side of the dashboard title.
pub const SPARKLES: &str = "✦ ✧ ✦ ✧";

pub const TITLE: &str = "RONI'S MAC BAR SALES DASHBOARD";

/// Dashboard header rendering four lines:
///
/// 1. Title with sparkle decorations.
/// 2. A 60-column `=` separator.
/// 3. Current filters in `[ month: April | day: All ]` format.
/// 4. An empty line.
pub struct Header<'a> {
    pub selections: &'a Selections,
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(selections: &'a Selections, theme: &'a Theme) -> Self {
        Self { selections, theme }
    }

    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let separator = "=".repeat(60);
        let month = self.selections.month;
        let day = self.selections.day;

        vec![
            Line::from(vec![
                Span::styled(SPARKLES, self.theme.header_sparkle),
                Span::styled(format!(" {} ", TITLE), self.theme.header),
                Span::styled(SPARKLES, self.theme.header_sparkle),
            ]),
            Line::from(Span::styled(separator, self.theme.separator)),
            Line::from(vec![
                Span::styled("[ month: ", self.theme.label),
                Span::styled(month.label(), self.theme.filter_style(month.is_all())),
                Span::styled(" | day: ", self.theme.label),
                Span::styled(day.label(), self.theme.filter_style(day.is_all())),
                Span::styled(" ]", self.theme.label),
            ]),
            Line::from(""),
        ]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
