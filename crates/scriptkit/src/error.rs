//! Error types for script execution.
//!
//! Errors are categorized to drive the retry controller: validation and
//! target-resolution failures are deterministic for a given declaration and
//! are never retried, while statement, timeout, and connection failures are
//! worth another attempt.

use thiserror::Error;

/// Categories of script errors for retry logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// A declared command is malformed (deterministic, not retryable)
    Validation,
    /// The explicitly requested database could not be reached
    TargetUnreachable,
    /// A statement failed during an attempt
    Statement,
    /// The per-attempt deadline elapsed
    Timeout,
    /// Session-level failure outside any particular statement
    Connection,
}

impl ErrorCategory {
    /// Whether another attempt of the whole batch can change the outcome.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Statement | Self::Timeout | Self::Connection)
    }

    /// Get a user-friendly description of this error category.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Validation => "Invalid command declaration",
            Self::TargetUnreachable => "Target database unreachable",
            Self::Statement => "Statement failed",
            Self::Timeout => "Batch timed out",
            Self::Connection => "Connection failure",
        }
    }
}

/// Errors that can occur while applying a script batch.
#[derive(Debug, Error)]
pub enum Error {
    /// A declared command is not a well-formed statement
    #[error("invalid command: {message}")]
    Validation {
        /// What is wrong with the declaration, naming the offending element
        message: String,
    },

    /// The explicitly requested database could not be opened
    #[error("cannot reach database {database:?}: {message}")]
    TargetUnreachable {
        /// The database identifier that was requested
        database: String,
        /// Why the session could not be opened
        message: String,
    },

    /// A statement failed during execution
    #[error("statement {statement:?} failed: {message}")]
    Statement {
        /// The statement that failed
        statement: String,
        /// The database's native error text
        message: String,
    },

    /// The per-attempt deadline elapsed while a statement was in flight
    #[error("statement {statement:?} cancelled: batch deadline elapsed")]
    Timeout {
        /// The statement that was cancelled
        statement: String,
    },

    /// The session failed outside any particular statement
    #[error("connection error: {message}")]
    Connection {
        /// Details from the underlying client
        message: String,
    },
}

impl Error {
    /// Get the error category for retry logic.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Validation { .. } => ErrorCategory::Validation,
            Error::TargetUnreachable { .. } => ErrorCategory::TargetUnreachable,
            Error::Statement { .. } => ErrorCategory::Statement,
            Error::Timeout { .. } => ErrorCategory::Timeout,
            Error::Connection { .. } => ErrorCategory::Connection,
        }
    }

    /// Whether another attempt of the whole batch can change the outcome.
    pub fn is_retryable(&self) -> bool {
        self.category().is_retryable()
    }
}

/// Result type for script operations.
pub type Result<T> = std::result::Result<T, Error>;
