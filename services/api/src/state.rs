//! Application state shared across handlers

use sqlx::PgPool;
use std::sync::Arc;

use crate::{
    repositories::{
        CategoryRepository, MemoryStore, PgCategoryRepository, PgToDoRepository,
        PgUserRepository, ToDoRepository, UserRepository,
    },
    services::{CategoryService, ToDoService, UserService},
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub category_service: Arc<CategoryService>,
    pub todo_service: Arc<ToDoService>,
}

impl AppState {
    /// Wire the services over the given repositories
    pub fn new(
        users: Arc<dyn UserRepository>,
        categories: Arc<dyn CategoryRepository>,
        todos: Arc<dyn ToDoRepository>,
    ) -> Self {
        Self {
            user_service: Arc::new(UserService::new(users.clone())),
            category_service: Arc::new(CategoryService::new(categories.clone())),
            todo_service: Arc::new(ToDoService::new(todos, users, categories)),
        }
    }

    /// State backed by PostgreSQL
    pub fn postgres(pool: PgPool) -> Self {
        Self::new(
            Arc::new(PgUserRepository::new(pool.clone())),
            Arc::new(PgCategoryRepository::new(pool.clone())),
            Arc::new(PgToDoRepository::new(pool)),
        )
    }

    /// State backed by a fresh in-memory store
    pub fn in_memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::new(store.clone(), store.clone(), store)
    }
}
