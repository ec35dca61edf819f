//! Database error types.

use thiserror::Error;

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

/// Errors that can occur during database operations.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("Failed to configure database client: {0}")]
    Config(String),

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Database error: {0}")]
    Driver(#[from] mongodb::error::Error),

    #[error("BSON serialization error: {0}")]
    Bson(#[from] mongodb::bson::ser::Error),
}

impl DbError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// True when the underlying failure is a unique-index violation
    /// (duplicate key, server code 11000). Multi-step check-then-create
    /// flows rely on this to classify the losing side of a race.
    pub fn is_duplicate_key(&self) -> bool {
        use mongodb::error::{ErrorKind, WriteFailure};

        let DbError::Driver(err) = self else {
            return false;
        };
        match &*err.kind {
            ErrorKind::Write(WriteFailure::WriteError(we)) => we.code == 11000,
            ErrorKind::Command(ce) => ce.code == 11000,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_driver_errors_are_not_duplicates() {
        assert!(!DbError::config("bad uri").is_duplicate_key());
        assert!(!DbError::Connection("refused".to_string()).is_duplicate_key());
    }
}
