//! Bridges engine notifications into the CLI's logging and output.

use scriptkit::{Error, ExecutionObserver};
use std::time::Duration;

use crate::ui;

/// Observer that logs statement progress and prints retry and cleanup
/// warnings.
pub struct LogObserver;

impl ExecutionObserver for LogObserver {
    fn on_statement(&self, index: usize, statement: &str) {
        log::debug!("executing command {}: {}", index, statement);
    }

    fn on_retry(&self, attempt: u32, tries: u32, error: &Error, delay: Duration) {
        ui::warn(&format!(
            "attempt {}/{} failed: {}. Retrying in {}s...",
            attempt,
            tries,
            error,
            delay.as_secs()
        ));
    }

    fn on_rollback_failed(&self, error: &Error) {
        ui::warn(&format!("cleanup rollback also failed: {}", error));
    }
}
