//! Core types for scripted batch execution.

use crate::error::{Error, Result};
use crate::fingerprint;
use serde::Serialize;
use std::time::Duration;

/// An ordered batch of SQL statements declared for one apply.
///
/// A batch is an immutable value: it is constructed fresh from declared
/// input on every apply, validated once at that boundary, and never
/// mutated. Order is significant and duplicates are allowed.
#[derive(Debug, Clone, Serialize)]
pub struct ScriptBatch {
    commands: Vec<String>,
    database: Option<String>,
    tries: u32,
    backoff_delay: Duration,
    timeout: Duration,
}

impl ScriptBatch {
    /// Default number of attempts (no retry).
    pub const DEFAULT_TRIES: u32 = 1;
    /// Default pause between failed attempts.
    pub const DEFAULT_BACKOFF_DELAY: Duration = Duration::from_secs(1);
    /// Default per-attempt deadline for the whole batch.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5 * 60);

    /// Build a batch, rejecting malformed declarations.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] naming the offending element when a
    /// command is blank, when `tries` is zero, or when `timeout` is zero.
    pub fn new(
        commands: Vec<String>,
        database: Option<String>,
        tries: u32,
        backoff_delay: Duration,
        timeout: Duration,
    ) -> Result<Self> {
        validate_commands(&commands)?;
        if tries == 0 {
            return Err(Error::Validation {
                message: "tries must be at least 1".to_string(),
            });
        }
        if timeout.is_zero() {
            return Err(Error::Validation {
                message: "timeout must be greater than zero".to_string(),
            });
        }
        Ok(Self {
            commands,
            database,
            tries,
            backoff_delay,
            timeout,
        })
    }

    /// Build a batch with the default retry policy.
    pub fn with_defaults(commands: Vec<String>, database: Option<String>) -> Result<Self> {
        Self::new(
            commands,
            database,
            Self::DEFAULT_TRIES,
            Self::DEFAULT_BACKOFF_DELAY,
            Self::DEFAULT_TIMEOUT,
        )
    }

    /// The declared statements, in execution order.
    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    /// The explicitly requested database, if any. Absent means the batch
    /// inherits the caller's default connection.
    pub fn database(&self) -> Option<&str> {
        self.database.as_deref()
    }

    /// Number of attempts before the last error is surfaced.
    pub fn tries(&self) -> u32 {
        self.tries
    }

    /// Constant pause between failed attempts.
    pub fn backoff_delay(&self) -> Duration {
        self.backoff_delay
    }

    /// Deadline applied to each attempt as a whole (not per statement, not
    /// cumulative across retries).
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// The batch's stable identity: a digest of its command content and
    /// order. This is what callers persist and compare to detect drift.
    pub fn fingerprint(&self) -> String {
        fingerprint::fingerprint(&self.commands)
    }
}

/// Check that every declared command is a usable statement.
///
/// This is the single conversion-boundary check for declared input; a blank
/// command is rejected here before any connection is opened.
pub fn validate_commands(commands: &[String]) -> Result<()> {
    for (index, command) in commands.iter().enumerate() {
        if command.trim().is_empty() {
            return Err(Error::Validation {
                message: format!("command {} is blank", index),
            });
        }
    }
    Ok(())
}

/// The result of a successful apply, persisted by the caller as current
/// state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Applied {
    /// Digest of the executed command list
    pub fingerprint: String,
    /// The database the batch actually ran against
    pub database: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commands(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_new_with_defaults() {
        let batch = ScriptBatch::with_defaults(commands(&["SELECT 1;"]), None).unwrap();
        assert_eq!(batch.tries(), 1);
        assert_eq!(batch.backoff_delay(), Duration::from_secs(1));
        assert_eq!(batch.timeout(), Duration::from_secs(300));
        assert_eq!(batch.database(), None);
    }

    #[test]
    fn test_blank_command_rejected() {
        let err = ScriptBatch::with_defaults(commands(&["SELECT 1;", "  "]), None).unwrap_err();
        match err {
            Error::Validation { message } => assert!(message.contains("command 1")),
            other => panic!("expected validation error, got: {:?}", other),
        }
    }

    #[test]
    fn test_zero_tries_rejected() {
        let err = ScriptBatch::new(
            commands(&["SELECT 1;"]),
            None,
            0,
            Duration::from_secs(1),
            Duration::from_secs(300),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = ScriptBatch::new(
            commands(&["SELECT 1;"]),
            None,
            1,
            Duration::from_secs(1),
            Duration::ZERO,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
    }

    #[test]
    fn test_empty_batch_is_allowed() {
        // A degenerate declaration; flagged by callers, not rejected here.
        let batch = ScriptBatch::with_defaults(Vec::new(), None).unwrap();
        assert!(batch.commands().is_empty());
    }

    #[test]
    fn test_fingerprint_matches_module() {
        let batch =
            ScriptBatch::with_defaults(commands(&["SELECT 1;", "SELECT 2;"]), None).unwrap();
        assert_eq!(
            batch.fingerprint(),
            fingerprint::fingerprint(batch.commands())
        );
    }
}
