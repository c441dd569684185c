//! Reusable line-based widgets shared by the text report and the terminal
//! dashboard.

pub mod header;
pub mod insights;

use ratatui::text::Line;

/// Concatenate a line's span contents, dropping styling.
pub fn plain_text(line: &Line<'_>) -> String {
    line.spans.iter().map(|s| s.content.as_ref()).collect()
}
