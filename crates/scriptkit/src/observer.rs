//! Callback trait for execution progress notifications.
//!
//! Secondary diagnostics - per-statement progress, retry notices, and
//! cleanup warnings - flow through this trait instead of the primary
//! result, so a failed `ROLLBACK` can be reported without ever replacing
//! the statement error that caused it.

use crate::error::Error;
use std::time::Duration;

/// Callback trait for batch execution notifications.
pub trait ExecutionObserver {
    /// Called before each statement of an attempt is issued.
    ///
    /// # Arguments
    /// * `index` - Position of the statement within the batch (0-indexed)
    /// * `statement` - The statement about to run
    fn on_statement(&self, index: usize, statement: &str) {
        let _ = (index, statement);
    }

    /// Called when an attempt failed and another will follow.
    ///
    /// # Arguments
    /// * `attempt` - The attempt that just failed (1-indexed)
    /// * `tries` - Total number of attempts allowed
    /// * `error` - The error that triggered the retry
    /// * `delay` - Pause before the next attempt begins
    fn on_retry(&self, attempt: u32, tries: u32, error: &Error, delay: Duration) {
        let _ = (attempt, tries, error, delay);
    }

    /// Called when the best-effort `ROLLBACK` after a failure itself failed.
    ///
    /// The original statement error still propagates; this only surfaces
    /// the secondary damage for operators.
    fn on_rollback_failed(&self, error: &Error) {
        let _ = error;
    }
}

/// No-op observer that ignores all notifications.
pub struct NoObserver;

impl ExecutionObserver for NoObserver {}
