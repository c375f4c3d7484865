use time::{Date, macros::format_description};

/// Parse a due date as entered in the add form. Only plain ISO dates are
/// recognized; anything else stays free text and is never rejected.
pub fn parse_due_date(raw: &str) -> Option<Date> {
    let fmt = format_description!("[year]-[month]-[day]");
    Date::parse(raw.trim(), fmt).ok()
}

/// Decide whether a task's due date deserves the overdue marker.
/// Current rule: an ISO due date strictly before today.
pub fn is_overdue(due_date: &str, today: Date) -> bool {
    parse_due_date(due_date).is_some_and(|due| due < today)
}
