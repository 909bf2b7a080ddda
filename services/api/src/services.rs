//! Business rules for users, categories and todos
//!
//! Services validate input, enforce existence and uniqueness rules, and then
//! delegate to the repositories. Uniqueness is checked before the write; the
//! storage unique constraints catch whatever slips between check and write.

use common::error::DatabaseError;
use thiserror::Error;

pub mod category;
pub mod todo;
pub mod user;

pub use category::CategoryService;
pub use todo::ToDoService;
pub use user::UserService;

/// Failure raised by a service operation
#[derive(Error, Debug)]
pub enum ServiceError {
    /// No entity with the given identifier
    #[error("{0}")]
    NotFound(String),

    /// A unique key (user email, category name) is already taken
    #[error("{0}")]
    DuplicateKey(String),

    /// Malformed input: failed field validation or unparseable date
    #[error("{0}")]
    InvalidFormat(String),

    /// Anything else; never echoed to clients
    #[error("Unexpected error: {0}")]
    Unexpected(#[source] DatabaseError),
}

impl From<DatabaseError> for ServiceError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::UniqueViolation(constraint) => {
                ServiceError::DuplicateKey(format!("Duplicate value rejected by {}", constraint))
            }
            DatabaseError::ForeignKeyViolation(constraint) => ServiceError::NotFound(format!(
                "Referenced record no longer exists ({})",
                constraint
            )),
            other => ServiceError::Unexpected(other),
        }
    }
}

/// Type alias for service results
pub type ServiceResult<T> = Result<T, ServiceError>;
