//! Human-readable "time ago" formatting for the stats page.

use chrono::Duration;

/// Formats the age of a record, e.g. `"3 days ago"`.
///
/// Months are approximated as 30 days. Anything under two minutes reads
/// "just now". Negative durations (clock skew) are formatted by magnitude.
pub fn relative_time(age: Duration) -> String {
    let hours = age.num_hours().abs();
    let minutes = age.num_minutes().abs();

    if hours >= 365 * 24 {
        "over a year ago".to_string()
    } else if hours > 30 * 24 {
        format!("{} months ago", hours / (30 * 24))
    } else if hours == 30 * 24 {
        "a month ago".to_string()
    } else if hours > 24 {
        format!("{} days ago", hours / 24)
    } else if hours == 24 {
        "yesterday".to_string()
    } else if hours >= 2 {
        format!("{} hours ago", hours)
    } else if hours == 1 {
        "an hour ago".to_string()
    } else if minutes >= 2 {
        format!("{} minutes ago", minutes)
    } else {
        "just now".to_string()
    }
}
