use chrono::{DateTime, Local};

use crate::model::{EditConfig, Filter, TickConfig, TodoId};
use crate::ops::todo_ops::{self, TodoError};

use super::{EditState, State};

/// A single user intent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Replace the new-todo input buffer
    SetInput(String),
    /// Append a todo; blank text is ignored
    Add { text: String },
    Remove(TodoId),
    ToggleComplete(TodoId),
    /// Open the inline editor on a todo, seeded with its text
    BeginEdit(TodoId),
    SetEditText(String),
    /// Write the edit buffer back to the edited todo and close the editor
    SaveEdit,
    CancelEdit,
    SetFilter(Filter),
}

/// What an action touched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Unchanged,
    /// Session-only state (input, filter, edit) changed
    View,
    /// The todo list changed and must be saved
    Todos,
}

/// Source of "now" for creation timestamps
pub trait Clock {
    fn now(&self) -> DateTime<Local>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// A clock stuck at one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Local>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}

/// Dependencies and policy the reducer reads but never changes
pub struct Environment {
    pub clock: Box<dyn Clock>,
    pub timestamp_format: String,
    pub edit: EditConfig,
}

impl Environment {
    pub fn from_config(config: &TickConfig) -> Self {
        Environment {
            clock: Box::new(SystemClock),
            timestamp_format: config.ui.timestamp_format.clone(),
            edit: config.edit.clone(),
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::from_config(&TickConfig::default())
    }
}

/// Apply one action to the state.
///
/// Blank text on `Add` is swallowed (`Unchanged`). Operations on an id that
/// no longer exists fail with `NotFound` and leave the state as it was.
pub fn reduce(state: &mut State, action: Action, env: &Environment) -> Result<Change, TodoError> {
    match action {
        Action::SetInput(text) => {
            state.new_todo_text = text;
            Ok(Change::View)
        }
        Action::Add { text } => {
            let timestamp = todo_ops::format_timestamp(env.clock.now(), &env.timestamp_format);
            match todo_ops::add_todo(&mut state.todos, &text, timestamp) {
                Ok(_) => {
                    state.new_todo_text.clear();
                    Ok(Change::Todos)
                }
                Err(TodoError::EmptyInput) => Ok(Change::Unchanged),
                Err(e) => Err(e),
            }
        }
        Action::Remove(id) => {
            todo_ops::remove_todo(&mut state.todos, id)?;
            if state.is_editing(id) {
                state.edit = None;
            }
            Ok(Change::Todos)
        }
        Action::ToggleComplete(id) => {
            todo_ops::toggle_complete(&mut state.todos, id)?;
            Ok(Change::Todos)
        }
        Action::BeginEdit(id) => {
            let text = todo_ops::find(&state.todos, id)?.text.clone();
            state.edit = Some(EditState { id, text });
            Ok(Change::View)
        }
        Action::SetEditText(text) => match &mut state.edit {
            Some(edit) => {
                edit.text = text;
                Ok(Change::View)
            }
            None => Ok(Change::Unchanged),
        },
        Action::SaveEdit => {
            let Some(edit) = state.edit.take() else {
                return Ok(Change::Unchanged);
            };
            if !env.edit.allow_empty && edit.text.trim().is_empty() {
                state.edit = Some(edit);
                return Err(TodoError::EmptyInput);
            }
            todo_ops::set_text(&mut state.todos, edit.id, edit.text)?;
            Ok(Change::Todos)
        }
        Action::CancelEdit => Ok(if state.edit.take().is_some() {
            Change::View
        } else {
            Change::Unchanged
        }),
        Action::SetFilter(filter) => {
            state.filter = filter;
            Ok(Change::View)
        }
    }
}
