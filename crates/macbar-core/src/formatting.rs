/// Placeholder shown for an insight that has no underlying data.
pub const NO_DATA: &str = "No data";

/// Format an integer count with thousands separators.
///
/// ```
/// use macbar_core::formatting::format_count;
///
/// assert_eq!(format_count(12_345), "12,345");
/// ```
pub fn format_count(count: u64) -> String {
    group_thousands(&count.to_string())
}

/// Format an hour of day as a clock time, e.g. `13` → `"13:00:00"`.
pub fn format_hour(hour: u32) -> String {
    format!("{:02}:00:00", hour)
}

/// Format an optional mean order count rounded to whole orders, or
/// [`NO_DATA`].
pub fn format_average(value: Option<f64>) -> String {
    match value {
        Some(v) => format_count(v.max(0.0).round() as u64),
        None => NO_DATA.to_string(),
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = chars.len() % 3;
    for (i, &c) in chars.iter().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────
