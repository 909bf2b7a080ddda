//! Repositories for database operations
//!
//! Each entity gets an async repository trait. Services only see the traits,
//! so the same business rules run over PostgreSQL in production and over
//! the in-memory store in tests.

use async_trait::async_trait;
use common::error::DatabaseResult;

use crate::models::{Category, CategoryInput, Status, ToDo, ToDoDraft, User, UserInput};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::{MIGRATOR, PgCategoryRepository, PgToDoRepository, PgUserRepository};

/// Persistence of users. Deleting a user removes its todos.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> DatabaseResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<User>>;

    async fn find_all(&self) -> DatabaseResult<Vec<User>>;

    async fn exists_by_id(&self, id: i64) -> DatabaseResult<bool>;

    async fn exists_by_email(&self, email: &str) -> DatabaseResult<bool>;

    /// Store a new user and return it with its assigned id
    async fn insert(&self, user: &UserInput) -> DatabaseResult<User>;

    /// Overwrite the stored fields of `user.id`
    async fn update(&self, user: &User) -> DatabaseResult<User>;

    /// Returns false when nothing was deleted
    async fn delete_by_id(&self, id: i64) -> DatabaseResult<bool>;
}

/// Persistence of categories. Deleting a category removes its todos.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> DatabaseResult<Option<Category>>;

    async fn find_by_name(&self, name: &str) -> DatabaseResult<Option<Category>>;

    async fn find_all(&self) -> DatabaseResult<Vec<Category>>;

    async fn exists_by_id(&self, id: i64) -> DatabaseResult<bool>;

    async fn exists_by_name(&self, name: &str) -> DatabaseResult<bool>;

    async fn insert(&self, category: &CategoryInput) -> DatabaseResult<Category>;

    async fn update(&self, category: &Category) -> DatabaseResult<Category>;

    async fn delete_by_id(&self, id: i64) -> DatabaseResult<bool>;
}

/// Persistence of todos
#[async_trait]
pub trait ToDoRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> DatabaseResult<Option<ToDo>>;

    async fn find_by_user_id(&self, user_id: i64) -> DatabaseResult<Vec<ToDo>>;

    async fn find_by_category_id(&self, category_id: i64) -> DatabaseResult<Vec<ToDo>>;

    async fn find_by_status(&self, status: Status) -> DatabaseResult<Vec<ToDo>>;

    async fn exists_by_id(&self, id: i64) -> DatabaseResult<bool>;

    /// Fails with a foreign key violation when the user or category is gone
    async fn insert(&self, todo: &ToDoDraft) -> DatabaseResult<ToDo>;

    /// Replace every field of `todo.id`
    async fn update(&self, todo: &ToDo) -> DatabaseResult<ToDo>;

    async fn delete_by_id(&self, id: i64) -> DatabaseResult<bool>;
}
