use chrono::{DateTime, Utc};

/// Weekday, month and day, e.g. "Monday, January 1".
#[must_use]
pub fn format_date_line(value: DateTime<Utc>) -> String {
    value.format("%A, %B %-d").to_string()
}
