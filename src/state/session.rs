use std::path::{Path, PathBuf};

use crate::io::config_io::{ConfigError, read_config};
use crate::io::kv::{FileStore, KvStore, StoreError};
use crate::io::persist::{LoadStatus, load_todos, save_todos};
use crate::io::recovery::{self, RecoveryCategory, RecoveryEntry};
use crate::model::TickConfig;
use crate::ops::todo_ops::TodoError;

use super::{Action, Change, Environment, State, reduce};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Todo(#[from] TodoError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// A loaded todo list bound to its store.
///
/// `dispatch` is the only way state changes: it runs the reducer and, when the
/// list changed, writes the whole list back before returning.
pub struct Session<S: KvStore> {
    state: State,
    store: S,
    key: String,
    env: Environment,
    /// Where recovery entries go; `None` disables the recovery log
    recovery_dir: Option<PathBuf>,
    load_status: LoadStatus,
}

/// A session over any store, as the TUI and CLI hold it
pub type DynSession = Session<Box<dyn KvStore>>;

impl DynSession {
    /// Open the list kept in a `.tick/` directory, reading its config.
    pub fn open_dir(dir: &Path) -> Result<Self, SessionError> {
        let config = read_config(dir)?;
        Self::open_dir_with(dir, &config)
    }

    pub fn open_dir_with(dir: &Path, config: &TickConfig) -> Result<Self, SessionError> {
        let store: Box<dyn KvStore> = Box::new(FileStore::new(dir));
        let session = Session::open(
            store,
            &config.storage.key,
            Environment::from_config(config),
            Some(dir.to_path_buf()),
        )?;
        Ok(session)
    }
}

impl<S: KvStore> Session<S> {
    /// Load the list stored under `key`. An unreadable value is copied to the
    /// recovery log and the session starts from an empty list.
    pub fn open(
        store: S,
        key: &str,
        env: Environment,
        recovery_dir: Option<PathBuf>,
    ) -> Result<Self, StoreError> {
        let loaded = load_todos(&store, key)?;
        if let (LoadStatus::Recovered { raw, reason }, Some(dir)) =
            (&loaded.status, recovery_dir.as_deref())
        {
            recovery::log_unreadable_store(dir, key, raw, reason);
        }
        Ok(Session {
            state: State::with_todos(loaded.todos),
            store,
            key: key.to_string(),
            env,
            recovery_dir,
            load_status: loaded.status,
        })
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn load_status(&self) -> &LoadStatus {
        &self.load_status
    }

    /// True if startup found an unreadable stored list
    pub fn recovered_on_load(&self) -> bool {
        matches!(self.load_status, LoadStatus::Recovered { .. })
    }

    /// Apply an action, then save if the todo list changed.
    pub fn dispatch(&mut self, action: Action) -> Result<Change, SessionError> {
        let removed = match &action {
            Action::Remove(id) => self.state.todos.iter().find(|t| t.id == *id).cloned(),
            _ => None,
        };

        let change = reduce(&mut self.state, action, &self.env)?;

        if let (Some(todo), Some(dir)) = (removed, self.recovery_dir.as_deref()) {
            let body = serde_json::to_string(&todo).unwrap_or_default();
            recovery::log_recovery(
                dir,
                RecoveryEntry::new(RecoveryCategory::Delete, format!("todo {} removed", todo.id))
                    .body(body),
            );
        }

        if change == Change::Todos {
            self.save()?;
        }
        Ok(change)
    }

    fn save(&mut self) -> Result<(), StoreError> {
        let result = save_todos(&mut self.store, &self.key, &self.state.todos);
        if let (Err(e), Some(dir)) = (&result, self.recovery_dir.as_deref()) {
            recovery::log_recovery(
                dir,
                RecoveryEntry::new(RecoveryCategory::Write, "save failed")
                    .field("Key", self.key.as_str())
                    .field("Error", e.to_string())
                    .body(serde_json::to_string(&self.state.todos).unwrap_or_default()),
            );
        }
        result
    }
}
