//! Target resolution: which database session a batch runs against.
//!
//! A batch either names an explicit target database or inherits the
//! caller's own connection. The caller's default connection and identifier
//! are passed in explicitly rather than read from ambient configuration,
//! so the resolver stays independently testable.

use crate::backend::{Connection, ConnectionProvider};
use crate::error::{Error, Result};

/// The session a batch was resolved to run against.
///
/// Either a borrow of the caller's own session or a newly opened one that
/// this operation exclusively owns and drops when it returns.
pub enum Target<'a> {
    /// The caller's default session, reused without opening anything.
    Default {
        conn: &'a mut dyn Connection,
        database: &'a str,
    },
    /// A fresh session scoped to an explicitly requested database.
    Opened {
        conn: Box<dyn Connection>,
        database: String,
    },
}

impl Target<'_> {
    /// The identifier of the database this target points to.
    pub fn database(&self) -> &str {
        match self {
            Target::Default { database, .. } => database,
            Target::Opened { database, .. } => database,
        }
    }

    /// The session to run the batch on.
    pub fn connection(&mut self) -> &mut dyn Connection {
        match self {
            Target::Default { conn, .. } => *conn,
            Target::Opened { conn, .. } => conn.as_mut(),
        }
    }
}

impl std::fmt::Debug for Target<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Target::Default { database, .. } => f
                .debug_struct("Default")
                .field("database", database)
                .finish_non_exhaustive(),
            Target::Opened { database, .. } => f
                .debug_struct("Opened")
                .field("database", database)
                .finish_non_exhaustive(),
        }
    }
}

/// Resolve the session a batch must run against.
///
/// An absent target, or a target equal to the default identifier, reuses
/// the caller's connection without opening a new session. Any other target
/// opens a fresh session via the provider; failure to open it aborts the
/// whole operation before any statement runs.
///
/// # Errors
/// Returns [`Error::TargetUnreachable`] when the explicitly requested
/// database cannot be opened.
pub fn resolve<'a>(
    explicit: Option<&str>,
    default_conn: &'a mut dyn Connection,
    default_database: &'a str,
    provider: &dyn ConnectionProvider,
) -> Result<Target<'a>> {
    match explicit {
        Some(database) if database != default_database => {
            let conn = provider
                .open(database)
                .map_err(|err| Error::TargetUnreachable {
                    database: database.to_string(),
                    message: err.to_string(),
                })?;
            Ok(Target::Opened {
                conn,
                database: database.to_string(),
            })
        }
        _ => Ok(Target::Default {
            conn: default_conn,
            database: default_database,
        }),
    }
}
