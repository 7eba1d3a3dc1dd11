//! # Scriptkit
//!
//! Scripted SQL batch execution for declarative database management.
//!
//! A [`ScriptBatch`] is an ordered list of SQL statements declared as
//! desired state. [`apply`] runs the batch sequentially on one session of
//! its target database - explicit, or inherited from the caller - under a
//! per-attempt deadline with a bounded, constant-backoff retry loop, and
//! returns the batch's [fingerprint](ScriptBatch::fingerprint): a stable
//! content digest the caller persists and later compares to decide whether
//! a changed declaration needs re-execution.
//!
//! ## Example
//!
//! ```no_run
//! use scriptkit::{apply, NoObserver, PostgresProvider, ScriptBatch};
//! use scriptkit::backend::ConnectionProvider;
//!
//! let provider = PostgresProvider::new("localhost", 5432, "postgres");
//! let mut conn = provider.open("app")?;
//!
//! let batch = ScriptBatch::with_defaults(
//!     vec!["CREATE TABLE IF NOT EXISTS t (id INT);".to_string()],
//!     None,
//! )?;
//!
//! let applied = apply(&batch, conn.as_mut(), "app", &provider, &NoObserver)?;
//! println!("{} applied to {}", applied.fingerprint, applied.database);
//! # Ok::<(), scriptkit::Error>(())
//! ```
//!
//! ## Guarantees and limits
//!
//! Statements of one attempt run strictly in order on one session, so
//! session-scoped effects (`SET ROLE`, settings) carry through the
//! attempt. Execution is not exactly-once: a retry re-runs the whole batch
//! from its first statement, and the engine issues at most one best-effort
//! `ROLLBACK` per failed attempt - it does not parse SQL or manage
//! savepoints.

pub mod backend;
mod error;
mod executor;
mod fingerprint;
mod observer;
mod resolve;
mod retry;
mod script;
mod types;

pub use backend::postgres::PostgresProvider;
pub use backend::{Connection, ConnectionProvider};
pub use error::{Error, ErrorCategory, Result};
pub use executor::run_once;
pub use fingerprint::fingerprint;
pub use observer::{ExecutionObserver, NoObserver};
pub use resolve::{Target, resolve};
pub use retry::run_with_retry;
pub use script::apply;
pub use types::{Applied, ScriptBatch, validate_commands};
