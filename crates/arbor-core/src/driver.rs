//! Wrapper around the driver-native error.

use thiserror::Error;

/// The minimal surface a database driver reports for a failed statement.
///
/// Instances are retained unmodified as the cause of every
/// [`DatabaseError`](crate::DatabaseError). A driver that reports less than
/// this (no statement text, no error name) still yields a constructible
/// value: missing pieces default to empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct DriverError {
    /// The SQL statement that failed, as reported by the driver.
    pub sql: String,
    /// Driver-specific error name or code.
    pub name: String,
    /// Driver-reported message text.
    pub message: String,
}

impl DriverError {
    /// Creates a driver error from its three reported parts.
    pub fn new(
        sql: impl Into<String>,
        name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            sql: sql.into(),
            name: name.into(),
            message: message.into(),
        }
    }
}

impl From<sqlx::Error> for DriverError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) => Self {
                // The failed statement is attached by the dispatching layer,
                // which is the only place that still has it.
                sql: String::new(),
                name: db.code().map(|c| c.into_owned()).unwrap_or_default(),
                message: db.message().to_string(),
            },
            other => Self {
                sql: String::new(),
                name: String::new(),
                message: other.to_string(),
            },
        }
    }
}
