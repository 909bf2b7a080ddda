//! ToDo service
//!
//! A todo always points at an existing user and, optionally, at an existing
//! category. Both references are resolved before anything is written.

use chrono::NaiveDate;
use std::sync::Arc;
use tracing::info;

use super::{ServiceError, ServiceResult};
use crate::{
    models::{Status, ToDo, ToDoDraft, ToDoInput},
    repositories::{CategoryRepository, ToDoRepository, UserRepository},
    validation::{parse_due_date, parse_due_date_lenient, validate_title},
};

pub struct ToDoService {
    todos: Arc<dyn ToDoRepository>,
    users: Arc<dyn UserRepository>,
    categories: Arc<dyn CategoryRepository>,
}

fn not_found(id: i64) -> ServiceError {
    ServiceError::NotFound(format!("ToDo not found with id: {}", id))
}

impl ToDoService {
    pub fn new(
        todos: Arc<dyn ToDoRepository>,
        users: Arc<dyn UserRepository>,
        categories: Arc<dyn CategoryRepository>,
    ) -> Self {
        Self {
            todos,
            users,
            categories,
        }
    }

    /// Check title, user and category, then parse the due date with `parse`
    async fn draft(
        &self,
        input: ToDoInput,
        parse: fn(&str) -> Result<NaiveDate, String>,
    ) -> ServiceResult<ToDoDraft> {
        validate_title(&input.title).map_err(ServiceError::InvalidFormat)?;

        if !self.users.exists_by_id(input.user_id).await? {
            return Err(ServiceError::NotFound(format!(
                "User not found with id: {}",
                input.user_id
            )));
        }

        if let Some(category_id) = input.category_id {
            if !self.categories.exists_by_id(category_id).await? {
                return Err(ServiceError::NotFound(format!(
                    "Category not found with id: {}",
                    category_id
                )));
            }
        }

        let due_date = parse(&input.due_date).map_err(ServiceError::InvalidFormat)?;

        Ok(ToDoDraft {
            title: input.title,
            description: input.description,
            status: input.status,
            due_date,
            user_id: input.user_id,
            category_id: input.category_id,
        })
    }

    /// Create a todo. `due_date` must be `dd/MM/yyyy`; it is stored as a date
    /// and rendered back as `yyyy-MM-dd`.
    pub async fn create(&self, input: ToDoInput) -> ServiceResult<ToDo> {
        let draft = self.draft(input, parse_due_date).await?;

        let todo = self.todos.insert(&draft).await?;
        info!("Created todo {} for user {}", todo.id, todo.user_id);
        Ok(todo)
    }

    pub async fn find_by_id(&self, id: i64) -> ServiceResult<ToDo> {
        self.todos.find_by_id(id).await?.ok_or_else(|| not_found(id))
    }

    /// Empty when the user has no todos or does not exist
    pub async fn find_by_user_id(&self, user_id: i64) -> ServiceResult<Vec<ToDo>> {
        Ok(self.todos.find_by_user_id(user_id).await?)
    }

    /// Empty when nothing is filed under the category or it does not exist
    pub async fn find_by_category_id(&self, category_id: i64) -> ServiceResult<Vec<ToDo>> {
        Ok(self.todos.find_by_category_id(category_id).await?)
    }

    pub async fn find_by_status(&self, status: Status) -> ServiceResult<Vec<ToDo>> {
        Ok(self.todos.find_by_status(status).await?)
    }

    /// Replace every field of todo `id` with `input`
    pub async fn update(&self, id: i64, input: ToDoInput) -> ServiceResult<ToDo> {
        if !self.todos.exists_by_id(id).await? {
            return Err(not_found(id));
        }

        let replacement = self.draft(input, parse_due_date_lenient).await?.with_id(id);

        let todo = self.todos.update(&replacement).await?;
        info!("Updated todo {}", id);
        Ok(todo)
    }

    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        if !self.todos.delete_by_id(id).await? {
            return Err(not_found(id));
        }
        info!("Deleted todo {}", id);
        Ok(())
    }
}
