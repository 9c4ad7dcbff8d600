use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier for a todo. Assigned once at creation and never reused
/// while the item exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(pub u64);

impl TodoId {
    /// Placeholder carried by records that were stored without an id
    pub const UNASSIGNED: TodoId = TodoId(0);

    pub fn is_assigned(self) -> bool {
        self != Self::UNASSIGNED
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A single todo entry, in the exact shape it is stored on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    #[serde(default)]
    pub id: TodoId,
    /// Display text, as the user typed it
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    /// Optional due date. Nothing in the UI sets it; see `with_due_date`.
    #[serde(default)]
    pub due_date: Option<String>,
    /// Creation time, rendered once with the configured format
    #[serde(default)]
    pub timestamp: String,
}

impl Todo {
    /// Create a fresh, uncompleted todo with no due date
    pub fn new(id: TodoId, text: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Todo {
            id,
            text: text.into(),
            completed: false,
            due_date: None,
            timestamp: timestamp.into(),
        }
    }

    pub fn with_due_date(mut self, due: impl Into<String>) -> Self {
        self.due_date = Some(due.into());
        self
    }

    /// The character shown inside the checkbox `[ ]`
    pub fn checkbox_char(&self) -> char {
        if self.completed { 'x' } else { ' ' }
    }
}
