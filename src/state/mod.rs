//! The in-memory state of a todo session and the reducer that drives it.
//!
//! Every user intent becomes an [`Action`]; [`reduce`] applies it to a
//! [`State`] and reports whether the persisted list changed. [`Session`]
//! owns the state together with its store and performs the write-through
//! save after each transition.

pub mod reducer;
pub mod session;

pub use reducer::*;
pub use session::*;

use crate::model::{Filter, Todo, TodoId};
use crate::ops::view::{FilterView, filter_view};

/// An in-progress inline edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditState {
    pub id: TodoId,
    pub text: String,
}

/// Everything a session holds. Only `todos` is ever persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct State {
    pub todos: Vec<Todo>,
    pub filter: Filter,
    /// Scratch buffer for the "new todo" input
    pub new_todo_text: String,
    pub edit: Option<EditState>,
}

impl State {
    pub fn with_todos(todos: Vec<Todo>) -> Self {
        State {
            todos,
            ..Default::default()
        }
    }

    /// The todos the current filter lets through, in list order
    pub fn visible(&self) -> FilterView<'_> {
        filter_view(&self.todos, self.filter)
    }

    pub fn is_editing(&self, id: TodoId) -> bool {
        self.edit.as_ref().is_some_and(|e| e.id == id)
    }
}
