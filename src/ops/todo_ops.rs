use std::collections::HashSet;
use std::fmt::Write as _;

use chrono::{DateTime, Local};

use crate::model::{Todo, TodoId};

/// Error type for todo list operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TodoError {
    #[error("todo text is empty")]
    EmptyInput,
    #[error("no todo with id {0}")]
    NotFound(TodoId),
    #[error("position out of range: {0}")]
    IndexOutOfRange(usize),
    #[error("no todo ids left")]
    IdsExhausted,
}

const FALLBACK_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Render a creation timestamp. An invalid format string falls back to ISO-like output
/// instead of panicking inside chrono's `Display` impl.
pub fn format_timestamp(now: DateTime<Local>, format: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", now.format(format)).is_ok() {
        return out;
    }
    now.format(FALLBACK_TIMESTAMP_FORMAT).to_string()
}

/// The id the next created todo receives, or `None` once ids run out
pub fn next_id(todos: &[Todo]) -> Option<TodoId> {
    max_id(todos).checked_add(1).map(TodoId)
}

fn max_id(todos: &[Todo]) -> u64 {
    todos.iter().map(|t| t.id.0).max().unwrap_or(0)
}

/// Give every record that was stored without an id, or with an id already
/// taken by an earlier record, a fresh one in list order.
///
/// Stored ids too close to `u64::MAX` to leave room for the new ones (and
/// one more add) get the whole list renumbered from 1, keeping order.
/// Returns how many ids were assigned.
pub fn assign_missing_ids(todos: &mut [Todo]) -> usize {
    let mut seen = HashSet::new();
    let needs_id: Vec<bool> = todos
        .iter()
        .map(|t| !(t.id.is_assigned() && seen.insert(t.id)))
        .collect();
    let wanted = needs_id.iter().filter(|n| **n).count() as u64;

    let max = max_id(todos);
    if wanted.checked_add(1).and_then(|n| max.checked_add(n)).is_none() {
        for (i, todo) in todos.iter_mut().enumerate() {
            todo.id = TodoId(i as u64 + 1);
        }
        return todos.len();
    }

    let mut next = max + 1;
    for (todo, needs) in todos.iter_mut().zip(needs_id) {
        if needs {
            todo.id = TodoId(next);
            next += 1;
        }
    }
    wanted as usize
}

/// Append a new todo. Blank text (after trimming) is rejected; the stored text
/// is kept exactly as given.
pub fn add_todo(todos: &mut Vec<Todo>, text: &str, timestamp: String) -> Result<TodoId, TodoError> {
    if text.trim().is_empty() {
        return Err(TodoError::EmptyInput);
    }
    let id = next_id(todos).ok_or(TodoError::IdsExhausted)?;
    todos.push(Todo::new(id, text, timestamp));
    Ok(id)
}

/// Remove the todo with the given id, returning it.
pub fn remove_todo(todos: &mut Vec<Todo>, id: TodoId) -> Result<Todo, TodoError> {
    let pos = position_of(todos, id)?;
    Ok(todos.remove(pos))
}

/// Flip the completed flag. Returns the new value.
pub fn toggle_complete(todos: &mut [Todo], id: TodoId) -> Result<bool, TodoError> {
    let todo = find_mut(todos, id)?;
    todo.completed = !todo.completed;
    Ok(todo.completed)
}

/// Overwrite a todo's text. Emptiness is the caller's policy decision.
pub fn set_text(todos: &mut [Todo], id: TodoId, text: String) -> Result<(), TodoError> {
    find_mut(todos, id)?.text = text;
    Ok(())
}

pub fn find(todos: &[Todo], id: TodoId) -> Result<&Todo, TodoError> {
    todos
        .iter()
        .find(|t| t.id == id)
        .ok_or(TodoError::NotFound(id))
}

fn find_mut(todos: &mut [Todo], id: TodoId) -> Result<&mut Todo, TodoError> {
    todos
        .iter_mut()
        .find(|t| t.id == id)
        .ok_or(TodoError::NotFound(id))
}

fn position_of(todos: &[Todo], id: TodoId) -> Result<usize, TodoError> {
    todos
        .iter()
        .position(|t| t.id == id)
        .ok_or(TodoError::NotFound(id))
}

/// Translate a row position in a rendered (possibly filtered) view into an id.
pub fn id_at<'a>(
    mut view: impl Iterator<Item = &'a Todo>,
    index: usize,
) -> Result<TodoId, TodoError> {
    view.nth(index)
        .map(|t| t.id)
        .ok_or(TodoError::IndexOutOfRange(index))
}
