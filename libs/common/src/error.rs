//! Custom error types for the common library
//!
//! This module defines the storage error taxonomy shared by every repository
//! implementation in the workspace.

use sqlx::Error as SqlxError;
use thiserror::Error;

/// Custom error type for database operations
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error occurred during database connection
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Error occurred during database query execution
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// A unique constraint rejected the write
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    /// A foreign key rejected the write; the referenced row is gone
    #[error("Foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),

    /// Error occurred during database migration
    #[error("Database migration error: {0}")]
    Migration(String),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),
}

impl DatabaseError {
    /// Classify a query error, pulling constraint violations out of the generic bucket
    pub fn from_query(err: SqlxError) -> Self {
        match &err {
            SqlxError::Database(db_err) if db_err.is_unique_violation() => {
                DatabaseError::UniqueViolation(constraint_name(&**db_err))
            }
            SqlxError::Database(db_err) if db_err.is_foreign_key_violation() => {
                DatabaseError::ForeignKeyViolation(constraint_name(&**db_err))
            }
            _ => DatabaseError::Query(err),
        }
    }

    /// Whether this error is a uniqueness conflict rather than a storage fault
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, DatabaseError::UniqueViolation(_))
    }

    /// Whether the write referenced a row that does not exist
    pub fn is_foreign_key_violation(&self) -> bool {
        matches!(self, DatabaseError::ForeignKeyViolation(_))
    }
}

fn constraint_name(db_err: &dyn sqlx::error::DatabaseError) -> String {
    db_err
        .constraint()
        .map(str::to_string)
        .unwrap_or_else(|| db_err.message().to_string())
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;
