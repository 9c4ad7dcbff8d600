use serde::Serialize;

use crate::io::recovery::RecoveryEntry;
use crate::model::{Filter, Todo};
use crate::ops::due::is_overdue;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoJson {
    pub id: u64,
    pub text: String,
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    pub overdue: bool,
    pub timestamp: String,
}

#[derive(Serialize)]
pub struct TodoListJson {
    pub filter: Filter,
    pub done: usize,
    pub total: usize,
    pub todos: Vec<TodoJson>,
}

#[derive(Serialize)]
pub struct RecoveryEntryJson {
    pub timestamp: String,
    pub category: String,
    pub description: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<(String, String)>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub body: String,
}

pub fn todo_to_json(todo: &Todo, now: chrono::DateTime<chrono::Local>) -> TodoJson {
    TodoJson {
        id: todo.id.0,
        text: todo.text.clone(),
        completed: todo.completed,
        due_date: todo.due_date.clone(),
        overdue: is_overdue(todo.due_date.as_deref(), now),
        timestamp: todo.timestamp.clone(),
    }
}

pub fn recovery_entry_to_json(entry: &RecoveryEntry) -> RecoveryEntryJson {
    RecoveryEntryJson {
        timestamp: entry
            .timestamp
            .to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
        category: entry.category.to_string(),
        description: entry.description.clone(),
        fields: entry.fields.clone(),
        body: entry.body.clone(),
    }
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

/// `  3 [x] Buy milk  (due 2026-10-01, overdue)`
pub fn format_todo_line(todo: &Todo, now: chrono::DateTime<chrono::Local>) -> String {
    let mut line = format!("{:>3} [{}] {}", todo.id, todo.checkbox_char(), todo.text);
    if let Some(due) = &todo.due_date {
        if is_overdue(Some(due), now) {
            line.push_str(&format!("  (due {}, overdue)", due));
        } else {
            line.push_str(&format!("  (due {})", due));
        }
    }
    line
}

pub fn format_recovery_entry(entry: &RecoveryEntry) -> String {
    let mut out = format!(
        "{} [{}] {}",
        entry
            .timestamp
            .to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
        entry.category,
        entry.description,
    );
    for (key, value) in &entry.fields {
        out.push_str(&format!("\n  {}: {}", key, value));
    }
    for line in entry.body.lines() {
        out.push_str(&format!("\n  | {}", line));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TodoId;
    use chrono::{Local, TimeZone};

    fn now() -> chrono::DateTime<Local> {
        Local.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    #[test]
    fn plain_line() {
        let mut todo = Todo::new(TodoId(3), "Buy milk", "x");
        assert_eq!(format_todo_line(&todo, now()), "  3 [ ] Buy milk");
        todo.completed = true;
        assert_eq!(format_todo_line(&todo, now()), "  3 [x] Buy milk");
    }

    #[test]
    fn line_marks_overdue() {
        let todo = Todo::new(TodoId(1), "File taxes", "x").with_due_date("2026-10-01");
        assert_eq!(
            format_todo_line(&todo, now()),
            "  1 [ ] File taxes  (due 2026-10-01, overdue)"
        );
        let todo = Todo::new(TodoId(1), "Party", "x").with_due_date("2026-12-31");
        assert_eq!(format_todo_line(&todo, now()), "  1 [ ] Party  (due 2026-12-31)");
    }

    #[test]
    fn json_skips_missing_due_date() {
        let todo = Todo::new(TodoId(2), "Walk", "1/2/2026, 3:04:05 PM");
        let value = serde_json::to_value(todo_to_json(&todo, now())).unwrap();
        assert!(value.get("dueDate").is_none());
        assert_eq!(value["overdue"], false);
        assert_eq!(value["id"], 2);
    }

    #[test]
    fn json_uses_stored_field_names() {
        let todo = Todo::new(TodoId(4), "Pay rent", "t").with_due_date("2026-11-01");
        let value = serde_json::to_value(todo_to_json(&todo, now())).unwrap();
        assert_eq!(value["dueDate"], "2026-11-01");
        assert!(value.get("due_date").is_none());
    }

    #[test]
    fn wide_ids_stay_aligned() {
        let todo = Todo::new(TodoId(1234), "Many", "t");
        assert_eq!(format_todo_line(&todo, now()), "1234 [ ] Many");
    }
}
