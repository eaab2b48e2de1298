//! Audit-related error types.

use thiserror::Error;

/// Errors that can occur with audit logging.
#[derive(Debug, Error)]
pub enum AuditError {
    /// The log file could not be opened, written, or read.
    #[error("storage error: {0}")]
    StorageError(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    SerializationError(String),

    /// A stored line is not a valid entry.
    #[error("corrupt audit entry on line {line}: {reason}")]
    CorruptEntry {
        /// 1-based line number in the log file.
        line: usize,
        /// Why the line could not be parsed.
        reason: String,
    },
}

/// Result type for audit operations.
pub type AuditResult<T> = Result<T, AuditError>;
