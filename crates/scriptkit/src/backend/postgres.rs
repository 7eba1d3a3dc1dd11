//! PostgreSQL backend over the blocking rust-postgres client.
//!
//! Statements go through the simple-query protocol so DDL, `SET`, and
//! transaction-control statements behave exactly as they would in psql.
//! The per-attempt deadline is enforced server-side: a watchdog thread
//! fires the session's cancel token when the deadline elapses, which
//! aborts the in-flight statement instead of leaving it running.

use super::{Connection, ConnectionProvider};
use crate::error::{Error, Result};
use postgres::error::SqlState;
use postgres::{Client, NoTls};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

/// Opens PostgreSQL sessions from shared server settings.
#[derive(Debug, Clone)]
pub struct PostgresProvider {
    host: String,
    port: u16,
    user: String,
    password: Option<String>,
    connect_timeout: Duration,
}

impl PostgresProvider {
    /// Create a provider for the given server.
    pub fn new(host: impl Into<String>, port: u16, user: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port,
            user: user.into(),
            password: None,
            connect_timeout: Duration::from_secs(10),
        }
    }

    /// Set the password used for new sessions.
    pub fn with_password(mut self, password: Option<String>) -> Self {
        self.password = password;
        self
    }

    /// Set the timeout for establishing new sessions.
    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }
}

impl ConnectionProvider for PostgresProvider {
    fn open(&self, database: &str) -> Result<Box<dyn Connection>> {
        let mut config = postgres::Config::new();
        config
            .host(&self.host)
            .port(self.port)
            .user(&self.user)
            .dbname(database)
            .application_name("sqlapply");
        if let Some(password) = &self.password {
            config.password(password);
        }
        if !self.connect_timeout.is_zero() {
            config.connect_timeout(self.connect_timeout);
        }

        let client = config.connect(NoTls).map_err(|err| Error::Connection {
            message: err.to_string(),
        })?;

        Ok(Box::new(PostgresConnection { client }))
    }
}

/// One PostgreSQL session, exclusively owned by its operation.
pub struct PostgresConnection {
    client: Client,
}

impl Connection for PostgresConnection {
    fn execute(&mut self, statement: &str, deadline: Instant) -> Result<()> {
        let now = Instant::now();
        if now >= deadline {
            return Err(Error::Timeout {
                statement: statement.to_string(),
            });
        }
        let remaining = deadline - now;

        // The watchdog cancels the in-flight statement server-side if the
        // deadline elapses before the statement completes. Completion is
        // signalled through the channel so an on-time statement never gets
        // cancelled retroactively.
        let token = self.client.cancel_token();
        let (done_tx, done_rx) = mpsc::channel::<()>();
        let watchdog = thread::spawn(move || {
            if done_rx.recv_timeout(remaining).is_err() {
                let _ = token.cancel_query(NoTls);
            }
        });

        let result = self.client.batch_execute(statement);
        let _ = done_tx.send(());
        let _ = watchdog.join();

        result.map_err(|err| map_error(err, statement, deadline))
    }
}

/// Translate a client error into the engine's taxonomy.
///
/// A server-side `57014 query_canceled` after our deadline is the watchdog
/// doing its job and becomes a timeout; any other database error keeps its
/// native message.
fn map_error(err: postgres::Error, statement: &str, deadline: Instant) -> Error {
    if let Some(db_error) = err.as_db_error() {
        if *db_error.code() == SqlState::QUERY_CANCELED && Instant::now() >= deadline {
            return Error::Timeout {
                statement: statement.to_string(),
            };
        }
        return Error::Statement {
            statement: statement.to_string(),
            message: db_error.message().to_string(),
        };
    }
    Error::Connection {
        message: err.to_string(),
    }
}
