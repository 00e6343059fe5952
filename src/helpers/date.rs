//! Date helper functions

use chrono::{Month, NaiveDateTime};

/// Format a date with a chrono strftime pattern
///
/// # Examples
/// ```ignore
/// format_date(&date, "%B %-d, %Y") // -> "January 15, 2024"
/// ```
pub fn format_date(date: &NaiveDateTime, format: &str) -> String {
    date.format(format).to_string()
}

/// Format a date for a `datetime` attribute
pub fn date_xml(date: &NaiveDateTime) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// English name of a month number (1-12)
pub fn month_name(month: u32) -> String {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name().to_string())
        .unwrap_or_else(|| month.to_string())
}

/// Generate a <time> HTML element
pub fn time_tag(date: &NaiveDateTime, format: &str) -> String {
    format!(
        r#"<time datetime="{}">{}</time>"#,
        date_xml(date),
        format_date(date, format)
    )
}
