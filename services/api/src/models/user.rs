//! User model and related payloads

use serde::{Deserialize, Serialize};

/// User entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    /// Stored exactly as provided
    pub password: String,
}

/// Payload for creating a user or replacing its fields
#[derive(Debug, Clone, Deserialize)]
pub struct UserInput {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Response for user operations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
        }
    }
}
