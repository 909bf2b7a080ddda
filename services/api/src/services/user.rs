//! User service

use std::sync::Arc;
use tracing::info;

use super::{ServiceError, ServiceResult};
use crate::{
    models::{User, UserInput},
    repositories::UserRepository,
    validation::validate_user,
};

pub struct UserService {
    users: Arc<dyn UserRepository>,
}

fn not_found(id: i64) -> ServiceError {
    ServiceError::NotFound(format!("User not found with id: {}", id))
}

fn email_taken() -> ServiceError {
    ServiceError::DuplicateKey("A user with the given email already exists".to_string())
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Create a user; the email must not belong to anyone yet
    pub async fn create(&self, input: UserInput) -> ServiceResult<User> {
        validate_user(&input).map_err(ServiceError::InvalidFormat)?;

        if self.users.exists_by_email(&input.email).await? {
            return Err(email_taken());
        }

        let user = self.users.insert(&input).await?;
        info!("Created user {}", user.id);
        Ok(user)
    }

    pub async fn find_by_id(&self, id: i64) -> ServiceResult<User> {
        self.users.find_by_id(id).await?.ok_or_else(|| not_found(id))
    }

    pub async fn find_all(&self) -> ServiceResult<Vec<User>> {
        Ok(self.users.find_all().await?)
    }

    /// Replace username, email and password of an existing user
    pub async fn update(&self, id: i64, input: UserInput) -> ServiceResult<User> {
        validate_user(&input).map_err(ServiceError::InvalidFormat)?;

        let mut existing = self.find_by_id(id).await?;

        if existing.email != input.email {
            if let Some(owner) = self.users.find_by_email(&input.email).await? {
                if owner.id != id {
                    return Err(email_taken());
                }
            }
        }

        existing.username = input.username;
        existing.email = input.email;
        existing.password = input.password;

        let user = self.users.update(&existing).await?;
        info!("Updated user {}", id);
        Ok(user)
    }

    /// Delete a user together with every todo it owns
    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        if !self.users.delete_by_id(id).await? {
            return Err(not_found(id));
        }
        info!("Deleted user {} and its todos", id);
        Ok(())
    }
}
