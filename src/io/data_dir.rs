use std::fs;
use std::path::{Path, PathBuf};

/// Name of the store directory kept at the root of a tick workspace
pub const DATA_DIR_NAME: &str = ".tick";

const CONFIG_TEMPLATE: &str = r##"# tick configuration. Every setting is optional.

[storage]
# key the list is stored under (file .tick/<key>.json)
key = "todos"

[edit]
# allow saving an edit that leaves a todo blank
allow_empty = true

[ui]
timestamp_format = "%-m/%-d/%Y, %-I:%M:%S %p"
show_key_hints = true

# [ui.colors]
# background = "#0C001B"
# highlight = "#FB4196"
"##;

#[derive(Debug, thiserror::Error)]
pub enum DirError {
    #[error("no .tick/ directory found (run `tick init`)")]
    NotFound,
    #[error("{} already exists (use --force to reinitialize)", .0.display())]
    AlreadyExists(PathBuf),
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Walk up from `start` looking for a `.tick/` directory.
/// Returns the path of the `.tick/` directory itself.
pub fn discover_data_dir(start: &Path) -> Result<PathBuf, DirError> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(DATA_DIR_NAME);
        if candidate.is_dir() {
            return Ok(candidate);
        }
        if !current.pop() {
            return Err(DirError::NotFound);
        }
    }
}

/// Create `.tick/` under `root` with a commented config template.
pub fn init_data_dir(root: &Path, force: bool) -> Result<PathBuf, DirError> {
    let dir = root.join(DATA_DIR_NAME);
    if dir.is_dir() && !force {
        return Err(DirError::AlreadyExists(dir));
    }
    fs::create_dir_all(&dir)?;
    let config_path = dir.join(super::config_io::CONFIG_FILE);
    if !config_path.exists() {
        fs::write(&config_path, CONFIG_TEMPLATE)?;
    }
    Ok(dir)
}
