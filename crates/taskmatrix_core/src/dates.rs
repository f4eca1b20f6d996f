//! Due-date display helpers.

use chrono::{DateTime, Utc};

const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Whole days until `due`, rounded up. Negative when overdue.
pub fn days_until(due: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let diff_ms = (due - now).num_milliseconds();
    // Ceiling division that also works for negative values.
    diff_ms.div_euclid(MS_PER_DAY) + i64::from(diff_ms.rem_euclid(MS_PER_DAY) != 0)
}

/// Human phrase such as `in 3 hours` or `2 days ago`.
pub fn relative_time(date: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = date - now;
    let is_past = diff.num_milliseconds() < 0;
    let seconds = diff.num_milliseconds().unsigned_abs() / 1000;

    if seconds < 60 {
        return if is_past { "just now" } else { "in a moment" }.to_string();
    }

    let minutes = seconds / 60;
    let hours = minutes / 60;
    let days = hours / 24;
    let (amount, unit) = if minutes < 60 {
        (minutes, "minute")
    } else if hours < 24 {
        (hours, "hour")
    } else if days < 30 {
        (days, "day")
    } else {
        (days / 30, "month")
    };

    let plural = if amount == 1 { "" } else { "s" };
    if is_past {
        format!("{amount} {unit}{plural} ago")
    } else {
        format!("in {amount} {unit}{plural}")
    }
}
