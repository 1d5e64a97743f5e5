use chrono::{Datelike, NaiveDate};

/// Format a due date relative to `today`:
/// - "yesterday", "today", "tomorrow" next to today
/// - "Mar 15" within the same year
/// - "Mar 15, 2025" otherwise
pub fn format_due(due: NaiveDate, today: NaiveDate) -> String {
    match (due - today).num_days() {
        -1 => "yesterday".to_string(),
        0 => "today".to_string(),
        1 => "tomorrow".to_string(),
        _ if due.year() == today.year() => due.format("%b %-d").to_string(),
        _ => due.format("%b %-d, %Y").to_string(),
    }
}
