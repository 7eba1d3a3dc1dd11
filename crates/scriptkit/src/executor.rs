//! Sequential execution of one batch attempt.

use crate::backend::Connection;
use crate::error::Result;
use crate::observer::ExecutionObserver;
use std::time::{Duration, Instant};

/// How long the cleanup `ROLLBACK` after a failure may take. The attempt
/// deadline may already have elapsed by then, so the cleanup gets its own
/// short bound instead of running unbounded.
const ROLLBACK_GRACE: Duration = Duration::from_secs(5);

/// Run every command of a batch once, in order, on one session.
///
/// A single deadline derived from `timeout` bounds the entire attempt, not
/// each statement. All statements run on the same session, so
/// session-scoped effects (a `SET ROLE`, a changed setting) stay visible
/// to the statements that follow within this attempt.
///
/// On the first failing statement the attempt stops, one best-effort
/// `ROLLBACK` is issued on the same session, and the original statement
/// error is returned. A failed rollback is reported through the observer
/// and never replaces that error. A deadline elapsing mid-statement takes
/// the same path with a timeout error.
///
/// An empty batch is a degenerate success.
pub fn run_once(
    conn: &mut dyn Connection,
    commands: &[String],
    timeout: Duration,
    observer: &dyn ExecutionObserver,
) -> Result<()> {
    let deadline = Instant::now() + timeout;

    for (index, command) in commands.iter().enumerate() {
        observer.on_statement(index, command);
        if let Err(error) = conn.execute(command, deadline) {
            // A failed attempt can leave an open transaction on the
            // session; clear it so a retry starts clean.
            let cleanup_deadline = Instant::now() + ROLLBACK_GRACE;
            if let Err(rollback_error) = conn.execute("ROLLBACK", cleanup_deadline) {
                observer.on_rollback_failed(&rollback_error);
            }
            return Err(error);
        }
    }

    Ok(())
}
