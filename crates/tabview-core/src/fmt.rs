//! Shared formatting helpers for cell values and pager text.
//!
//! All pure formatting functions (no ratatui styles, no layout) live here.
//! The default column renderer is [`format_value`]; filtering matches against
//! whatever a column renders, so these strings are also what users search.

use chrono::{DateTime, Timelike, Utc};

use crate::value::CellValue;

/// Placeholder shown for null cells.
pub const NULL_PLACEHOLDER: &str = "-";

/// Default rendering of a cell value.
///
/// Text as-is, numbers without a trailing `.0`, dates as `YYYY-MM-DD`
/// (with `HH:MM` when not midnight UTC), bools as `true`/`false`.
pub fn format_value(value: &CellValue) -> String {
    match value {
        CellValue::Text(s) => s.clone(),
        CellValue::Number(n) => format_number(*n),
        CellValue::Date(d) => format_date(d),
        CellValue::Bool(b) => b.to_string(),
        CellValue::Null => NULL_PLACEHOLDER.to_string(),
    }
}

/// Format number: integral values without fraction, others with up to 2 decimals.
pub fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else if n.is_finite() {
        let s = format!("{:.2}", n);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        n.to_string()
    }
}

/// Format date: `2025-03-01` at midnight, `2025-03-01 14:30` otherwise.
pub fn format_date(d: &DateTime<Utc>) -> String {
    if d.hour() == 0 && d.minute() == 0 && d.second() == 0 {
        d.format("%Y-%m-%d").to_string()
    } else {
        d.format("%Y-%m-%d %H:%M").to_string()
    }
}

/// Pager status: `"page 2/3 (25 rows)"`, or `"no rows"` when empty.
pub fn format_pager(current_page: usize, total_pages: usize, total_rows: usize) -> String {
    if total_rows == 0 {
        return "no rows".to_string();
    }
    format!(
        "page {}/{} ({} {})",
        current_page + 1,
        total_pages,
        total_rows,
        if total_rows == 1 { "row" } else { "rows" }
    )
}

/// Truncate to `max` chars, ending with `…` when cut.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out: String = s.chars().take(max - 1).collect();
    out.push('…');
    out
}
