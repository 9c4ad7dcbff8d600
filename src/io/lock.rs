use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Exclusive hold on a store directory while a value is written.
///
/// The lock target is `.lock` inside the directory. The file is created once
/// and never removed, so every process contends on the same inode; the flock
/// goes away when the handle is dropped.
#[derive(Debug)]
pub struct StoreLock {
    _file: File,
}

#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("could not open lock file {path}: {source}")]
    OpenError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("timed out waiting for {path}: another tick process is writing")]
    Timeout { path: PathBuf },
}

const LOCK_FILE: &str = ".lock";
const RETRY_INTERVAL: Duration = Duration::from_millis(10);
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

pub fn lock_path(dir: &Path) -> PathBuf {
    dir.join(LOCK_FILE)
}

impl StoreLock {
    /// Take the lock, polling until `timeout` elapses.
    pub fn acquire(dir: &Path, timeout: Duration) -> Result<Self, LockError> {
        let path = lock_path(dir);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| LockError::OpenError {
                path: path.clone(),
                source,
            })?;

        let deadline = Instant::now() + timeout;
        loop {
            if try_lock_exclusive(&file) {
                return Ok(StoreLock { _file: file });
            }
            if Instant::now() >= deadline {
                return Err(LockError::Timeout { path });
            }
            std::thread::sleep(RETRY_INTERVAL);
        }
    }

    pub fn acquire_default(dir: &Path) -> Result<Self, LockError> {
        Self::acquire(dir, DEFAULT_TIMEOUT)
    }
}

#[cfg(unix)]
pub(crate) fn try_lock_exclusive(file: &File) -> bool {
    use std::os::unix::io::AsRawFd;
    unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) == 0 }
}

#[cfg(not(unix))]
pub(crate) fn try_lock_exclusive(_file: &File) -> bool {
    true
}
