use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::ops::Range;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use super::lock::try_lock_exclusive;

/// A log past this size is cut back to its newest entries on the next append
const MAX_LOG_SIZE: u64 = 256 * 1024;
/// Bytes of entries a trim keeps (the newest entry is always kept)
const TRIM_TARGET: usize = 128 * 1024;

/// Header written at the top of a new recovery log.
const FILE_HEADER: &str = "\
<!-- tick recovery log: append-only
     Data tick could not keep (unreadable stores, removed todos,
     failed writes) is copied here before it is lost.
     View with: tick recovery
     Safe to delete. -->

---
";

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryCategory {
    /// A stored value could not be parsed and was replaced by an empty list
    Storage,
    /// A write to the store failed
    Write,
    /// A todo was removed
    Delete,
}

impl fmt::Display for RecoveryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecoveryCategory::Storage => write!(f, "storage"),
            RecoveryCategory::Write => write!(f, "write"),
            RecoveryCategory::Delete => write!(f, "delete"),
        }
    }
}

impl RecoveryCategory {
    pub fn parse_category(s: &str) -> Option<Self> {
        match s {
            "storage" => Some(RecoveryCategory::Storage),
            "write" => Some(RecoveryCategory::Write),
            "delete" => Some(RecoveryCategory::Delete),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecoveryEntry {
    pub timestamp: DateTime<Utc>,
    pub category: RecoveryCategory,
    pub description: String,
    pub fields: Vec<(String, String)>,
    pub body: String,
}

impl RecoveryEntry {
    pub fn new(category: RecoveryCategory, description: impl Into<String>) -> Self {
        RecoveryEntry {
            timestamp: Utc::now(),
            category,
            description: description.into(),
            fields: Vec::new(),
            body: String::new(),
        }
    }

    pub fn field(mut self, key: &str, value: impl Into<String>) -> Self {
        self.fields.push((key.to_string(), value.into()));
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// `## <rfc3339> [<category>] <description>`, fields, fenced body, `---`
    fn to_markdown(&self) -> String {
        let mut out = format!(
            "## {} [{}] {}\n\n",
            self.timestamp
                .to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            self.category,
            self.description,
        );
        for (key, value) in &self.fields {
            out.push_str(&format!("{}: {}\n", key, value));
        }
        if !self.body.is_empty() {
            out.push_str("\n```text\n");
            out.push_str(&self.body);
            if !self.body.ends_with('\n') {
                out.push('\n');
            }
            out.push_str("```\n");
        }
        out.push_str("\n---\n");
        out
    }
}

pub fn recovery_log_path(dir: &Path) -> PathBuf {
    dir.join(".recovery.log")
}

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

/// Append an entry. Failures are reported on stderr and otherwise ignored.
pub fn log_recovery(dir: &Path, entry: RecoveryEntry) {
    if let Err(e) = append_entry(dir, &entry) {
        eprintln!("warning: could not write to recovery log: {}", e);
    }
}

fn append_entry(dir: &Path, entry: &RecoveryEntry) -> io::Result<()> {
    let path = recovery_log_path(dir);
    if std::fs::metadata(&path).is_ok_and(|m| m.len() > MAX_LOG_SIZE)
        && let Err(e) = rewrite_locked(&path, |content| keep_newest(content, TRIM_TARGET), false)
    {
        eprintln!("warning: could not trim recovery log: {}", e);
    }

    let needs_header = std::fs::metadata(&path).map_or(true, |m| m.len() == 0);
    let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
    if needs_header {
        file.write_all(FILE_HEADER.as_bytes())?;
    }
    file.write_all(entry.to_markdown().as_bytes())
}

/// Preserve a stored value that could not be parsed. A value identical to the
/// newest one already preserved under the same key is not logged again.
pub fn log_unreadable_store(dir: &Path, key: &str, raw: &str, reason: &str) {
    let body = logged_body(raw);
    let already_logged = read_recovery_entries(dir, None)
        .into_iter()
        .find(|e| e.category == RecoveryCategory::Storage)
        .is_some_and(|e| e.body == body && e.fields.iter().any(|(k, v)| k == "Key" && v == key));
    if already_logged {
        return;
    }
    log_recovery(
        dir,
        RecoveryEntry::new(RecoveryCategory::Storage, "unreadable todo list replaced")
            .field("Key", key)
            .field("Reason", reason)
            .body(raw),
    );
}

/// Drop entries older than `before`, or every entry when `before` is `None`.
/// Returns how many were removed.
pub fn prune_recovery(dir: &Path, before: Option<DateTime<Utc>>) -> io::Result<usize> {
    let path = recovery_log_path(dir);
    if !path.exists() {
        return Ok(0);
    }
    let mut removed = 0;
    rewrite_locked(
        &path,
        |content| {
            let (header, blocks) = entry_blocks(content);
            let mut out = content[header].to_string();
            for (range, timestamp) in blocks {
                if before.is_some_and(|cutoff| timestamp >= cutoff) {
                    out.push_str(&content[range]);
                } else {
                    removed += 1;
                }
            }
            out
        },
        true,
    )?;
    Ok(removed)
}

/// Rewrite the log in place under an exclusive flock on the log itself.
/// With `wait` false a busy log is left alone.
fn rewrite_locked(
    path: &Path,
    edit: impl FnOnce(&str) -> String,
    wait: bool,
) -> io::Result<()> {
    let mut file = OpenOptions::new().read(true).write(true).open(path)?;
    if !lock_log(&file, wait) {
        return if wait {
            Err(io::Error::new(
                io::ErrorKind::WouldBlock,
                "recovery log is in use, try again later",
            ))
        } else {
            Ok(())
        };
    }

    let mut content = String::new();
    file.read_to_string(&mut content)?;
    let updated = edit(&content);
    if updated.len() < content.len() {
        file.set_len(0)?;
        file.seek(SeekFrom::Start(0))?;
        file.write_all(updated.as_bytes())?;
    }
    Ok(())
}

fn lock_log(file: &File, wait: bool) -> bool {
    let attempts = if wait { 10 } else { 1 };
    for attempt in 0..attempts {
        if try_lock_exclusive(file) {
            return true;
        }
        if attempt + 1 < attempts {
            std::thread::sleep(std::time::Duration::from_millis(100));
        }
    }
    false
}

/// Keep the newest entries that fit in `budget` bytes, plus the file header.
fn keep_newest(content: &str, budget: usize) -> String {
    let (header, blocks) = entry_blocks(content);
    let Some((newest, _)) = blocks.last() else {
        return content.to_string();
    };
    let mut keep_from = newest.start;
    for (range, _) in blocks.iter().rev().skip(1) {
        if content.len() - range.start > budget {
            break;
        }
        keep_from = range.start;
    }
    format!("{}{}", &content[header], &content[keep_from..])
}

/// Split the log into its header and one byte range per entry, oldest first.
fn entry_blocks(content: &str) -> (Range<usize>, Vec<(Range<usize>, DateTime<Utc>)>) {
    let mut starts = Vec::new();
    let mut offset = 0;
    let mut in_code_block = false;
    for line in content.split_inclusive('\n') {
        let bare = line.trim_end_matches(['\r', '\n']);
        if in_code_block {
            in_code_block = bare != "```";
        } else if bare.starts_with("```") {
            in_code_block = true;
        } else if let Some((timestamp, _, _)) =
            bare.strip_prefix("## ").and_then(parse_entry_header)
        {
            starts.push((offset, timestamp));
        }
        offset += line.len();
    }

    let header = 0..starts.first().map_or(content.len(), |(start, _)| *start);
    let blocks = starts
        .iter()
        .enumerate()
        .map(|(i, (start, timestamp))| {
            let end = starts.get(i + 1).map_or(content.len(), |(next, _)| *next);
            (*start..end, *timestamp)
        })
        .collect();
    (header, blocks)
}

/// A body as it reads back from the log
fn logged_body(raw: &str) -> String {
    let mut body = String::new();
    for line in raw.lines() {
        if !body.is_empty() {
            body.push('\n');
        }
        body.push_str(line);
    }
    body
}

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

/// Read entries, most recent first. A missing log reads as empty.
pub fn read_recovery_entries(dir: &Path, limit: Option<usize>) -> Vec<RecoveryEntry> {
    let content = match std::fs::read_to_string(recovery_log_path(dir)) {
        Ok(c) => c,
        Err(_) => return Vec::new(),
    };
    let mut entries = parse_entries(&content);
    entries.reverse();
    if let Some(n) = limit {
        entries.truncate(n);
    }
    entries
}

fn parse_entries(content: &str) -> Vec<RecoveryEntry> {
    let mut entries = Vec::new();
    let mut lines = content.lines();

    while let Some(line) = lines.next() {
        let Some((timestamp, category, description)) =
            line.strip_prefix("## ").and_then(parse_entry_header)
        else {
            continue;
        };

        let mut fields = Vec::new();
        let mut body = String::new();
        let mut in_code_block = false;

        for line in lines.by_ref() {
            if in_code_block {
                if line == "```" {
                    in_code_block = false;
                } else {
                    if !body.is_empty() {
                        body.push('\n');
                    }
                    body.push_str(line);
                }
                continue;
            }
            if line == "---" {
                break;
            }
            if line.starts_with("```") {
                in_code_block = true;
                continue;
            }
            if let Some((key, value)) = line.trim().split_once(": ") {
                fields.push((key.to_string(), value.to_string()));
            }
        }

        entries.push(RecoveryEntry {
            timestamp,
            category,
            description,
            fields,
            body,
        });
    }

    entries
}

/// Parse `<timestamp> [<category>] <description>`
fn parse_entry_header(header: &str) -> Option<(DateTime<Utc>, RecoveryCategory, String)> {
    let (timestamp, rest) = header.split_once(' ')?;
    let timestamp = DateTime::parse_from_rfc3339(timestamp)
        .ok()?
        .with_timezone(&Utc);
    let rest = rest.strip_prefix('[')?;
    let (category, description) = rest.split_once("] ")?;
    let category = RecoveryCategory::parse_category(category)?;
    Some((timestamp, category, description.to_string()))
}
