//! Retry loop around batch execution.

use crate::backend::Connection;
use crate::error::Result;
use crate::executor;
use crate::observer::ExecutionObserver;
use std::thread;
use std::time::Duration;

/// Execute a batch with a bounded retry loop.
///
/// Each attempt re-runs the *whole* batch from its first statement under a
/// fresh deadline; there is no resumption from the failing statement. That
/// means statements which succeeded in a failed attempt run again on the
/// next one - non-idempotent statements (a plain `INSERT`, say) can double
/// their side effects under retry. Declared SQL that must survive retries
/// should be transactional or idempotent.
///
/// The pause between attempts is constant, and only the last attempt's
/// error is surfaced. `tries` below 1 behaves as 1. Total elapsed time is
/// bounded only by `tries * (timeout + backoff_delay)`; callers needing a
/// tighter outer bound must impose it themselves.
pub fn run_with_retry(
    conn: &mut dyn Connection,
    commands: &[String],
    tries: u32,
    backoff_delay: Duration,
    timeout: Duration,
    observer: &dyn ExecutionObserver,
) -> Result<()> {
    let tries = tries.max(1);

    for attempt in 1..=tries {
        match executor::run_once(conn, commands, timeout, observer) {
            Ok(()) => return Ok(()),
            Err(error) => {
                if attempt >= tries {
                    return Err(error);
                }
                observer.on_retry(attempt, tries, &error, backoff_delay);
                thread::sleep(backoff_delay);
            }
        }
    }

    unreachable!("loop returns on the final attempt")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::mock::MockDb;
    use crate::error::Error;
    use crate::observer::NoObserver;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Instant;

    fn commands(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| (*s).to_string()).collect()
    }

    fn failing_db(fail_count: u32) -> MockDb {
        let db = MockDb::new();
        {
            let mut behavior = db.behavior.lock().unwrap();
            behavior.fail_on = Some("INSERT".to_string());
            behavior.fail_count = fail_count;
        }
        db
    }

    struct RetryCounter(AtomicU32);

    impl ExecutionObserver for RetryCounter {
        fn on_retry(&self, _attempt: u32, _tries: u32, _error: &Error, _delay: Duration) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_success_first_try() {
        let db = MockDb::new();
        let mut conn = db.connection("app");
        let batch = commands(&["SELECT 1;"]);

        run_with_retry(
            &mut conn,
            &batch,
            3,
            Duration::from_millis(1),
            Duration::from_secs(5),
            &NoObserver,
        )
        .unwrap();

        assert_eq!(db.executed(), batch);
    }

    #[test]
    fn test_eventual_success_reruns_whole_batch() {
        // First attempt fails on the INSERT; second attempt succeeds.
        let db = failing_db(1);
        let mut conn = db.connection("app");
        let batch = commands(&["CREATE TABLE t (id INT);", "INSERT INTO t VALUES (1);"]);

        run_with_retry(
            &mut conn,
            &batch,
            3,
            Duration::from_millis(1),
            Duration::from_secs(5),
            &NoObserver,
        )
        .unwrap();

        // The retry starts over from the first statement, so the CREATE ran
        // twice even though it succeeded the first time.
        assert_eq!(
            db.executed(),
            commands(&[
                "CREATE TABLE t (id INT);",
                "INSERT INTO t VALUES (1);",
                "ROLLBACK",
                "CREATE TABLE t (id INT);",
                "INSERT INTO t VALUES (1);",
            ])
        );
    }

    #[test]
    fn test_retry_bound_surfaces_last_error() {
        let db = failing_db(u32::MAX);
        let mut conn = db.connection("app");
        let batch = commands(&["INSERT INTO t VALUES (1);"]);

        let err = run_with_retry(
            &mut conn,
            &batch,
            2,
            Duration::from_millis(1),
            Duration::from_secs(5),
            &NoObserver,
        )
        .unwrap_err();

        // Exactly two attempts, and the error is the second attempt's.
        assert_eq!(db.recorder.lock().unwrap().failures_injected, 2);
        match err {
            Error::Statement { message, .. } => assert_eq!(message, "injected failure 2"),
            other => panic!("expected statement error, got: {:?}", other),
        }
    }

    #[test]
    fn test_single_try_means_no_retry() {
        let db = failing_db(u32::MAX);
        let mut conn = db.connection("app");
        let observer = RetryCounter(AtomicU32::new(0));

        let result = run_with_retry(
            &mut conn,
            &commands(&["INSERT INTO t VALUES (1);"]),
            1,
            Duration::from_millis(1),
            Duration::from_secs(5),
            &observer,
        );

        assert!(result.is_err());
        assert_eq!(db.recorder.lock().unwrap().failures_injected, 1);
        assert_eq!(observer.0.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_backoff_pause_between_attempts() {
        let db = failing_db(u32::MAX);
        let mut conn = db.connection("app");
        let delay = Duration::from_millis(50);

        let start = Instant::now();
        let result = run_with_retry(
            &mut conn,
            &commands(&["INSERT INTO t VALUES (1);"]),
            2,
            delay,
            Duration::from_secs(5),
            &NoObserver,
        );

        assert!(result.is_err());
        assert!(start.elapsed() >= delay);
    }

    #[test]
    fn test_observer_notified_per_retry() {
        let db = failing_db(u32::MAX);
        let mut conn = db.connection("app");
        let observer = RetryCounter(AtomicU32::new(0));

        let _ = run_with_retry(
            &mut conn,
            &commands(&["INSERT INTO t VALUES (1);"]),
            3,
            Duration::from_millis(1),
            Duration::from_secs(5),
            &observer,
        );

        // Notified for each retry, not the first attempt and not the last
        // failure.
        assert_eq!(observer.0.load(Ordering::SeqCst), 2);
    }
}
