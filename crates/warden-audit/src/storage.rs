//! Audit sinks: an append-only JSONL file and an in-memory log.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use tracing::debug;

use crate::entry::AuditEntry;
use crate::error::{AuditError, AuditResult};

/// File name of the JSONL log inside its directory.
pub const LOG_FILE_NAME: &str = "audit.log.jsonl";

/// Destination for audit entries.
///
/// Implementations must be thread-safe; entries arrive from whichever thread
/// resolved the path.
pub trait AuditSink: fmt::Debug + Send + Sync {
    /// Persist one entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry cannot be persisted.
    fn record(&self, entry: &AuditEntry) -> AuditResult<()>;
}

/// Appends one JSON object per line to `<dir>/audit.log.jsonl`.
#[derive(Debug)]
pub struct JsonlAuditLog {
    path: PathBuf,
    file: Mutex<File>,
}

impl JsonlAuditLog {
    /// Open (or create) the log in `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::StorageError`] if the directory or file cannot
    /// be created.
    pub fn open(dir: impl AsRef<Path>) -> AuditResult<Self> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let path = dir.join(LOG_FILE_NAME);
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        debug!(path = %path.display(), "Opened audit log");
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    /// Path of the log file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every entry back, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::CorruptEntry`] for a line that does not parse.
    pub fn read_entries(&self) -> AuditResult<Vec<AuditEntry>> {
        read_entries(&self.path)
    }
}

impl AuditSink for JsonlAuditLog {
    fn record(&self, entry: &AuditEntry) -> AuditResult<()> {
        let mut line =
            serde_json::to_vec(entry).map_err(|e| AuditError::SerializationError(e.to_string()))?;
        line.push(b'\n');

        // One write per line keeps concurrent appends from interleaving.
        let mut file = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        file.write_all(&line)?;
        file.flush()?;
        Ok(())
    }
}

/// Parse a JSONL audit file. Blank lines are skipped.
///
/// # Errors
///
/// Returns [`AuditError::StorageError`] if the file cannot be read and
/// [`AuditError::CorruptEntry`] for a line that does not parse.
pub fn read_entries(path: &Path) -> AuditResult<Vec<AuditEntry>> {
    let content = std::fs::read_to_string(path)?;
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str(line).map_err(|e| AuditError::CorruptEntry {
                line: i.saturating_add(1),
                reason: e.to_string(),
            })
        })
        .collect()
}

/// Keeps entries in memory. Useful for tests and short-lived sessions.
#[derive(Debug, Default)]
pub struct MemoryAuditLog {
    entries: Mutex<Vec<AuditEntry>>,
}

impl MemoryAuditLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded entries, oldest first.
    #[must_use]
    pub fn entries(&self) -> Vec<AuditEntry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of recorded entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Check if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AuditSink for MemoryAuditLog {
    fn record(&self, entry: &AuditEntry) -> AuditResult<()> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use warden_workspace::{SandboxViolation, ViolationReason};

    fn denied(candidate: &str) -> AuditEntry {
        let v = SandboxViolation::new(ViolationReason::PathEscapesWorkspace, candidate);
        AuditEntry::denied("read", candidate, &v)
    }

    #[test]
    fn test_jsonl_creates_directory_and_appends() {
        let dir = TempDir::new().unwrap();
        let log_dir = dir.path().join("nested").join("audit");

        let log = JsonlAuditLog::open(&log_dir).unwrap();
        assert_eq!(log.path(), log_dir.join(LOG_FILE_NAME));

        log.record(&denied("../a")).unwrap();
        log.record(&denied("../b")).unwrap();

        let entries = log.read_entries().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].candidate, "../a");
        assert_eq!(entries[1].candidate, "../b");

        let raw = std::fs::read_to_string(log.path()).unwrap();
        assert_eq!(raw.lines().count(), 2);
    }

    #[test]
    fn test_reopen_keeps_history() {
        let dir = TempDir::new().unwrap();
        JsonlAuditLog::open(dir.path())
            .unwrap()
            .record(&denied("first"))
            .unwrap();

        let log = JsonlAuditLog::open(dir.path()).unwrap();
        log.record(&denied("second")).unwrap();

        let candidates: Vec<String> = log
            .read_entries()
            .unwrap()
            .into_iter()
            .map(|e| e.candidate)
            .collect();
        assert_eq!(candidates, ["first", "second"]);
    }

    #[test]
    fn test_corrupt_line_reports_line_number() {
        let dir = TempDir::new().unwrap();
        let log = JsonlAuditLog::open(dir.path()).unwrap();
        log.record(&denied("ok")).unwrap();
        std::fs::OpenOptions::new()
            .append(true)
            .open(log.path())
            .unwrap()
            .write_all(b"\n{not json}\n")
            .unwrap();

        let err = log.read_entries().unwrap_err();
        assert!(matches!(err, AuditError::CorruptEntry { line: 3, .. }));
    }

    #[test]
    fn test_memory_log() {
        let log = MemoryAuditLog::new();
        assert!(log.is_empty());
        log.record(&denied("x")).unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log.entries()[0].candidate, "x");
    }
}
