//! Server-rendered pages: template engine and display formatting.

pub mod engine;

pub use engine::render_page;

use chrono::{DateTime, Duration, NaiveDate, Utc};

/// Placeholder for missing optional values
pub const NOT_AVAILABLE: &str = "N/A";

/// Offset of Waktu Indonesia Barat from UTC
const WIB_OFFSET_HOURS: i64 = 7;

/// `dd/mm/yyyy`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Calendar date of a timestamp in WIB, as `dd/mm/yyyy`
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    format_date((at + Duration::hours(WIB_OFFSET_HOURS)).date_naive())
}

/// Trimmed value or `N/A`
pub fn or_not_available(value: Option<&str>) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(NOT_AVAILABLE)
        .to_string()
}
