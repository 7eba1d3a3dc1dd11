//! The script operation: apply a declared batch to its target database.

use crate::backend::{Connection, ConnectionProvider};
use crate::error::Result;
use crate::observer::ExecutionObserver;
use crate::resolve;
use crate::retry::run_with_retry;
use crate::types::{Applied, ScriptBatch};

/// Apply one batch: resolve its target, execute with retries, and return
/// the identity the caller persists as current state.
///
/// Steps, each a hard precondition for the next: the batch was validated
/// when constructed; the target session is resolved (an unreachable
/// explicit target aborts before any statement runs); the batch runs with
/// the declared retry policy on that one session; on success the
/// fingerprint and resolved database are returned for the caller to store.
///
/// On any error the caller's stored state must be left untouched, so a
/// subsequent apply of the same declaration starts again from scratch.
///
/// The resolved session is exclusively owned by this call: a borrowed
/// default is used by nothing else until this returns, and a freshly
/// opened target session is dropped on return. Teardown of whatever the
/// statements created is the declared SQL's own responsibility - the
/// engine performs no cleanup of prior executions.
pub fn apply(
    batch: &ScriptBatch,
    default_conn: &mut dyn Connection,
    default_database: &str,
    provider: &dyn ConnectionProvider,
    observer: &dyn ExecutionObserver,
) -> Result<Applied> {
    let mut target = resolve::resolve(batch.database(), default_conn, default_database, provider)?;
    let database = target.database().to_string();

    run_with_retry(
        target.connection(),
        batch.commands(),
        batch.tries(),
        batch.backoff_delay(),
        batch.timeout(),
        observer,
    )?;

    Ok(Applied {
        fingerprint: batch.fingerprint(),
        database,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::mock::MockDb;
    use crate::error::Error;
    use crate::observer::NoObserver;

    fn commands(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| (*s).to_string()).collect()
    }

    fn batch(raw: &[&str], database: Option<&str>) -> ScriptBatch {
        ScriptBatch::with_defaults(commands(raw), database.map(str::to_string)).unwrap()
    }

    #[test]
    fn test_apply_on_default_connection() {
        let db = MockDb::new();
        let mut conn = db.connection("app");
        let batch = batch(&["SELECT 1;"], None);

        let applied = apply(&batch, &mut conn, "app", &db, &NoObserver).unwrap();

        assert_eq!(applied.database, "app");
        assert_eq!(applied.fingerprint, batch.fingerprint());
        assert_eq!(db.executed_on("app"), commands(&["SELECT 1;"]));
        assert!(db.opened().is_empty());
    }

    #[test]
    fn test_apply_routes_to_explicit_database() {
        let db = MockDb::new();
        let mut conn = db.connection("app");
        let batch = batch(
            &["CREATE TABLE t (id INT);", "INSERT INTO t VALUES (1);"],
            Some("analytics"),
        );

        let applied = apply(&batch, &mut conn, "app", &db, &NoObserver).unwrap();

        assert_eq!(applied.database, "analytics");
        assert_eq!(db.opened(), vec!["analytics".to_string()]);
        assert_eq!(db.executed_on("analytics").len(), 2);
        assert!(db.executed_on("app").is_empty());
    }

    #[test]
    fn test_unreachable_target_runs_nothing() {
        let db = MockDb::new();
        db.behavior.lock().unwrap().unreachable = vec!["nowhere".to_string()];
        let mut conn = db.connection("app");
        let batch = batch(&["SELECT 1;"], Some("nowhere"));

        let err = apply(&batch, &mut conn, "app", &db, &NoObserver).unwrap_err();

        assert!(matches!(err, Error::TargetUnreachable { .. }));
        assert!(db.executed().is_empty());
    }

    #[test]
    fn test_identity_stable_across_applies() {
        let first = batch(&["SELECT 1;"], None);
        let second = batch(&["SELECT 1;"], None);
        assert_eq!(first.fingerprint(), second.fingerprint());
    }
}
