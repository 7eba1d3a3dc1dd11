//! Connection abstraction for batch execution.
//!
//! The [`Connection`] and [`ConnectionProvider`] traits define the seam
//! between the engine and the database, allowing for different
//! implementations (real PostgreSQL sessions, mocks for testing).
//!
//! A connection is a single database session, exclusively owned by one
//! operation for its full duration: statements on it run strictly in
//! order, and session-scoped effects (a `SET ROLE`, a changed
//! `search_path`) stay visible to later statements of the same attempt.

pub mod postgres;

use crate::error::Result;
use std::time::Instant;

/// A single database session capable of running one statement at a time.
pub trait Connection: Send {
    /// Execute one SQL statement, cancelling it if `deadline` elapses
    /// while it is in flight.
    ///
    /// Cancellation must abort the in-flight statement and unblock the
    /// caller promptly, not merely be checked before the next statement is
    /// issued. An elapsed deadline surfaces as [`crate::Error::Timeout`].
    fn execute(&mut self, statement: &str, deadline: Instant) -> Result<()>;
}

/// Opens database sessions by identifier.
pub trait ConnectionProvider: Send + Sync {
    /// Open a fresh session scoped to `database`.
    fn open(&self, database: &str) -> Result<Box<dyn Connection>>;
}
