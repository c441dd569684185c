use ratatui::style::{Color, Modifier, Style};

/// Terminal background type detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackgroundType {
    Dark,
    Light,
    Unknown,
}

/// Detect terminal background type from the `COLORFGBG` environment variable.
///
/// The variable has the format `"foreground;background"`. Background values
/// 0–6 are dark, 7–15 light. Absent or unparseable means `Unknown`.
pub fn detect_background() -> BackgroundType {
    std::env::var("COLORFGBG")
        .ok()
        .as_deref()
        .map_or(BackgroundType::Unknown, background_from_colorfgbg)
}

fn background_from_colorfgbg(val: &str) -> BackgroundType {
    match val.split(';').next_back().map(|bg| bg.parse::<u8>()) {
        Some(Ok(n)) if n <= 6 => BackgroundType::Dark,
        Some(Ok(_)) => BackgroundType::Light,
        _ => BackgroundType::Unknown,
    }
}

/// Every style the dashboard views draw with.
#[derive(Debug, Clone)]
pub struct Theme {
    // ── Header ───────────────────────────────────────────────────────────────
    pub header: Style,
    pub header_sparkle: Style,
    pub separator: Style,

    // ── Text ─────────────────────────────────────────────────────────────────
    pub text: Style,
    pub dim: Style,
    pub bold: Style,
    pub label: Style,
    pub value: Style,

    // ── Status ───────────────────────────────────────────────────────────────
    pub info: Style,
    pub warning: Style,
    pub error: Style,

    // ── Charts ───────────────────────────────────────────────────────────────
    pub chart_border: Style,
    pub chart_title: Style,
    pub axis: Style,
    /// Monthly sales line and the single-month bar.
    pub monthly_series: Style,
    pub school_average: Style,
    pub non_school_average: Style,
    pub daily_series: Style,
    pub hourly_series: Style,
    pub modifier_bar: Style,
    pub bar_value: Style,

    // ── Sidebar ──────────────────────────────────────────────────────────────
    pub filter_active: Style,
    pub filter_inactive: Style,
    pub insight_label: Style,
    pub insight_value: Style,
    pub no_data: Style,
}

impl Theme {
    // ── Constructors ─────────────────────────────────────────────────────────

    /// Dark-background terminal theme (default).
    pub fn dark() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            header_sparkle: Style::default().fg(Color::Yellow),
            separator: Style::default().fg(Color::DarkGray),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            bold: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            label: Style::default().fg(Color::Gray),
            value: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),

            info: Style::default().fg(Color::Cyan),
            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red),

            chart_border: Style::default().fg(Color::DarkGray),
            chart_title: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            axis: Style::default().fg(Color::Gray),
            monthly_series: Style::default().fg(Color::Cyan),
            school_average: Style::default().fg(Color::Red),
            non_school_average: Style::default().fg(Color::Green),
            daily_series: Style::default().fg(Color::Magenta),
            hourly_series: Style::default().fg(Color::Yellow),
            modifier_bar: Style::default().fg(Color::Blue),
            bar_value: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),

            filter_active: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            filter_inactive: Style::default().fg(Color::Gray),
            insight_label: Style::default().fg(Color::Gray),
            insight_value: Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
            no_data: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        }
    }

    /// Light-background terminal theme.
    ///
    /// Dark text and saturated accents so charts stay legible on a white
    /// canvas.
    pub fn light() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            header_sparkle: Style::default().fg(Color::Magenta),
            separator: Style::default().fg(Color::Gray),

            text: Style::default().fg(Color::Black),
            dim: Style::default().fg(Color::Gray),
            bold: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            label: Style::default().fg(Color::DarkGray),
            value: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),

            info: Style::default().fg(Color::Blue),
            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red),

            chart_border: Style::default().fg(Color::Gray),
            chart_title: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            axis: Style::default().fg(Color::DarkGray),
            monthly_series: Style::default().fg(Color::Blue),
            school_average: Style::default().fg(Color::Red),
            non_school_average: Style::default().fg(Color::Green),
            daily_series: Style::default().fg(Color::Magenta),
            hourly_series: Style::default().fg(Color::Rgb(180, 90, 0)),
            modifier_bar: Style::default().fg(Color::Blue),
            bar_value: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),

            filter_active: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            filter_inactive: Style::default().fg(Color::DarkGray),
            insight_label: Style::default().fg(Color::DarkGray),
            insight_value: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            no_data: Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
        }
    }

    /// Basic 8-colour ANSI palette with no modifiers, for minimal terminals.
    pub fn classic() -> Self {
        Self {
            header: Style::default().fg(Color::Cyan),
            header_sparkle: Style::default().fg(Color::White),
            separator: Style::default().fg(Color::DarkGray),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            bold: Style::default().fg(Color::White),
            label: Style::default().fg(Color::Gray),
            value: Style::default().fg(Color::White),

            info: Style::default().fg(Color::Cyan),
            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red),

            chart_border: Style::default().fg(Color::DarkGray),
            chart_title: Style::default().fg(Color::Cyan),
            axis: Style::default().fg(Color::Gray),
            monthly_series: Style::default().fg(Color::Cyan),
            school_average: Style::default().fg(Color::Red),
            non_school_average: Style::default().fg(Color::Green),
            daily_series: Style::default().fg(Color::Magenta),
            hourly_series: Style::default().fg(Color::Yellow),
            modifier_bar: Style::default().fg(Color::Blue),
            bar_value: Style::default().fg(Color::White),

            filter_active: Style::default().fg(Color::Yellow),
            filter_inactive: Style::default().fg(Color::Gray),
            insight_label: Style::default().fg(Color::Gray),
            insight_value: Style::default().fg(Color::Green),
            no_data: Style::default().fg(Color::DarkGray),
        }
    }

    /// Choose a theme automatically based on the detected terminal background.
    pub fn auto_detect() -> Self {
        match detect_background() {
            BackgroundType::Light => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Construct a theme by name. Falls back to `auto_detect` for unknown
    /// names, including `"auto"`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            "dark" => Self::dark(),
            "classic" => Self::classic(),
            _ => Self::auto_detect(),
        }
    }

    // ── Style helpers ────────────────────────────────────────────────────────

    /// Style for a filter label: highlighted unless it is the `All` sentinel.
    pub fn filter_style(&self, is_all: bool) -> Style {
        if is_all {
            self.filter_inactive
        } else {
            self.filter_active
        }
    }

    /// Style for an insight value, dimmed when there is nothing to show.
    pub fn insight_style(&self, present: bool) -> Style {
        if present {
            self.insight_value
        } else {
            self.no_data
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
