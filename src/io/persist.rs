use crate::model::Todo;
use crate::ops::todo_ops::assign_missing_ids;

use super::kv::{KvStore, StoreError};

/// How the stored list was found at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// Nothing stored under the key yet
    Missing,
    Loaded,
    /// The stored value did not parse; an empty list stands in for it
    Recovered { raw: String, reason: String },
}

#[derive(Debug, Clone)]
pub struct Loaded {
    pub todos: Vec<Todo>,
    pub status: LoadStatus,
}

/// Read the todo list stored under `key`.
///
/// A missing or unparsable value yields an empty list rather than an error;
/// only a failure to read the store at all is propagated.
pub fn load_todos(store: &impl KvStore, key: &str) -> Result<Loaded, StoreError> {
    let Some(raw) = store.get(key)? else {
        return Ok(Loaded {
            todos: Vec::new(),
            status: LoadStatus::Missing,
        });
    };

    match serde_json::from_str::<Option<Vec<Todo>>>(&raw) {
        Ok(todos) => {
            let mut todos = todos.unwrap_or_default();
            assign_missing_ids(&mut todos);
            Ok(Loaded {
                todos,
                status: LoadStatus::Loaded,
            })
        }
        Err(e) => Ok(Loaded {
            todos: Vec::new(),
            status: LoadStatus::Recovered {
                raw,
                reason: e.to_string(),
            },
        }),
    }
}

/// Replace the stored list with `todos`, in full.
pub fn save_todos(store: &mut impl KvStore, key: &str, todos: &[Todo]) -> Result<(), StoreError> {
    let json = serde_json::to_string(todos)?;
    store.set(key, &json)
}
