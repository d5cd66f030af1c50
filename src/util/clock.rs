//! Wall-clock helpers.

use chrono::NaiveDate;

/// Current time in milliseconds since the Unix epoch.
#[must_use]
pub fn now_ms() -> u128 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

/// Current calendar date in UTC.
#[must_use]
pub fn today() -> NaiveDate {
    chrono::Utc::now().date_naive()
}
