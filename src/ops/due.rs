use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"];

/// Parse a stored due date into an instant.
///
/// Accepts RFC 3339, a local date-time (`2026-11-01T09:30`) or a bare date,
/// which means local midnight. Anything else yields `None`.
pub fn parse_due(s: &str) -> Option<DateTime<Local>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local));
    }
    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Local.from_local_datetime(&naive).earliest();
        }
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
    Local.from_local_datetime(&date.and_hms_opt(0, 0, 0)?).earliest()
}

/// True iff a due date is present, parses, and lies strictly before `now`.
pub fn is_overdue(due: Option<&str>, now: DateTime<Local>) -> bool {
    due.and_then(parse_due).is_some_and(|at| at < now)
}

/// `is_overdue` against the wall clock. Not cached: call it per render.
pub fn is_overdue_now(due: Option<&str>) -> bool {
    is_overdue(due, Local::now())
}
