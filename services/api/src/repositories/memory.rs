//! In-memory store implementing every repository trait
//!
//! All three tables sit behind one lock so a cascading delete is a single
//! critical section. Unique keys and todo references are enforced at write
//! time the same way the PostgreSQL constraints are, and ids are assigned
//! sequentially from 1.

use async_trait::async_trait;
use common::error::{DatabaseError, DatabaseResult};
use std::{collections::BTreeMap, sync::Arc};
use tokio::sync::RwLock;

use super::{CategoryRepository, ToDoRepository, UserRepository};
use crate::models::{Category, CategoryInput, Status, ToDo, ToDoDraft, User, UserInput};

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    categories: BTreeMap<i64, Category>,
    todos: BTreeMap<i64, ToDo>,
    last_user_id: i64,
    last_category_id: i64,
    last_todo_id: i64,
}

fn next_id(last: &mut i64) -> i64 {
    *last += 1;
    *last
}

fn missing_row() -> DatabaseError {
    DatabaseError::Query(sqlx::Error::RowNotFound)
}

impl Tables {
    fn check_references(&self, user_id: i64, category_id: Option<i64>) -> DatabaseResult<()> {
        if !self.users.contains_key(&user_id) {
            return Err(DatabaseError::ForeignKeyViolation(
                "fk_tb_todo_user".to_string(),
            ));
        }
        match category_id {
            Some(id) if !self.categories.contains_key(&id) => Err(
                DatabaseError::ForeignKeyViolation("fk_tb_todo_category".to_string()),
            ),
            _ => Ok(()),
        }
    }
}

/// Shared handle to the in-memory tables; clones see the same data
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: i64) -> DatabaseResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_all(&self) -> DatabaseResult<Vec<User>> {
        Ok(self.tables.read().await.users.values().cloned().collect())
    }

    async fn exists_by_id(&self, id: i64) -> DatabaseResult<bool> {
        Ok(self.tables.read().await.users.contains_key(&id))
    }

    async fn exists_by_email(&self, email: &str) -> DatabaseResult<bool> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().any(|u| u.email == email))
    }

    async fn insert(&self, user: &UserInput) -> DatabaseResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(DatabaseError::UniqueViolation("uq_tb_user_email".to_string()));
        }

        let id = next_id(&mut tables.last_user_id);
        let stored = User {
            id,
            username: user.username.clone(),
            email: user.email.clone(),
            password: user.password.clone(),
        };
        tables.users.insert(id, stored.clone());
        Ok(stored)
    }

    async fn update(&self, user: &User) -> DatabaseResult<User> {
        let mut tables = self.tables.write().await;
        if tables
            .users
            .values()
            .any(|u| u.id != user.id && u.email == user.email)
        {
            return Err(DatabaseError::UniqueViolation("uq_tb_user_email".to_string()));
        }

        let slot = tables.users.get_mut(&user.id).ok_or_else(missing_row)?;
        *slot = user.clone();
        Ok(user.clone())
    }

    async fn delete_by_id(&self, id: i64) -> DatabaseResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.users.remove(&id).is_none() {
            return Ok(false);
        }
        tables.todos.retain(|_, todo| todo.user_id != id);
        Ok(true)
    }
}

#[async_trait]
impl CategoryRepository for MemoryStore {
    async fn find_by_id(&self, id: i64) -> DatabaseResult<Option<Category>> {
        Ok(self.tables.read().await.categories.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> DatabaseResult<Option<Category>> {
        let tables = self.tables.read().await;
        Ok(tables.categories.values().find(|c| c.name == name).cloned())
    }

    async fn find_all(&self) -> DatabaseResult<Vec<Category>> {
        Ok(self.tables.read().await.categories.values().cloned().collect())
    }

    async fn exists_by_id(&self, id: i64) -> DatabaseResult<bool> {
        Ok(self.tables.read().await.categories.contains_key(&id))
    }

    async fn exists_by_name(&self, name: &str) -> DatabaseResult<bool> {
        let tables = self.tables.read().await;
        Ok(tables.categories.values().any(|c| c.name == name))
    }

    async fn insert(&self, category: &CategoryInput) -> DatabaseResult<Category> {
        let mut tables = self.tables.write().await;
        if tables.categories.values().any(|c| c.name == category.name) {
            return Err(DatabaseError::UniqueViolation(
                "uq_tb_category_name".to_string(),
            ));
        }

        let id = next_id(&mut tables.last_category_id);
        let stored = Category {
            id,
            name: category.name.clone(),
        };
        tables.categories.insert(id, stored.clone());
        Ok(stored)
    }

    async fn update(&self, category: &Category) -> DatabaseResult<Category> {
        let mut tables = self.tables.write().await;
        if tables
            .categories
            .values()
            .any(|c| c.id != category.id && c.name == category.name)
        {
            return Err(DatabaseError::UniqueViolation(
                "uq_tb_category_name".to_string(),
            ));
        }

        let slot = tables
            .categories
            .get_mut(&category.id)
            .ok_or_else(missing_row)?;
        *slot = category.clone();
        Ok(category.clone())
    }

    async fn delete_by_id(&self, id: i64) -> DatabaseResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.categories.remove(&id).is_none() {
            return Ok(false);
        }
        tables.todos.retain(|_, todo| todo.category_id != Some(id));
        Ok(true)
    }
}

#[async_trait]
impl ToDoRepository for MemoryStore {
    async fn find_by_id(&self, id: i64) -> DatabaseResult<Option<ToDo>> {
        Ok(self.tables.read().await.todos.get(&id).cloned())
    }

    async fn find_by_user_id(&self, user_id: i64) -> DatabaseResult<Vec<ToDo>> {
        let tables = self.tables.read().await;
        Ok(tables
            .todos
            .values()
            .filter(|todo| todo.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_by_category_id(&self, category_id: i64) -> DatabaseResult<Vec<ToDo>> {
        let tables = self.tables.read().await;
        Ok(tables
            .todos
            .values()
            .filter(|todo| todo.category_id == Some(category_id))
            .cloned()
            .collect())
    }

    async fn find_by_status(&self, status: Status) -> DatabaseResult<Vec<ToDo>> {
        let tables = self.tables.read().await;
        Ok(tables
            .todos
            .values()
            .filter(|todo| todo.status == status)
            .cloned()
            .collect())
    }

    async fn exists_by_id(&self, id: i64) -> DatabaseResult<bool> {
        Ok(self.tables.read().await.todos.contains_key(&id))
    }

    async fn insert(&self, todo: &ToDoDraft) -> DatabaseResult<ToDo> {
        let mut tables = self.tables.write().await;
        tables.check_references(todo.user_id, todo.category_id)?;

        let id = next_id(&mut tables.last_todo_id);
        let stored = todo.clone().with_id(id);
        tables.todos.insert(id, stored.clone());
        Ok(stored)
    }

    async fn update(&self, todo: &ToDo) -> DatabaseResult<ToDo> {
        let mut tables = self.tables.write().await;
        tables.check_references(todo.user_id, todo.category_id)?;

        let slot = tables.todos.get_mut(&todo.id).ok_or_else(missing_row)?;
        *slot = todo.clone();
        Ok(todo.clone())
    }

    async fn delete_by_id(&self, id: i64) -> DatabaseResult<bool> {
        Ok(self.tables.write().await.todos.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn user_input(email: &str) -> UserInput {
        UserInput {
            username: "ana".to_string(),
            email: email.to_string(),
            password: "password123".to_string(),
        }
    }

    fn draft(user_id: i64, category_id: Option<i64>, status: Status) -> ToDoDraft {
        ToDoDraft {
            title: "Water plants".to_string(),
            description: None,
            status,
            due_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            user_id,
            category_id,
        }
    }

    #[tokio::test]
    async fn ids_are_sequential_per_table() -> DatabaseResult<()> {
        let store = MemoryStore::new();

        let first = UserRepository::insert(&store, &user_input("a@example.com")).await?;
        let second = UserRepository::insert(&store, &user_input("b@example.com")).await?;
        let category = CategoryRepository::insert(
            &store,
            &CategoryInput {
                name: "Home".to_string(),
            },
        )
        .await?;

        assert_eq!((first.id, second.id, category.id), (1, 2, 1));
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_email_is_a_unique_violation() -> DatabaseResult<()> {
        let store = MemoryStore::new();
        UserRepository::insert(&store, &user_input("a@example.com")).await?;

        let err = UserRepository::insert(&store, &user_input("a@example.com"))
            .await
            .unwrap_err();
        assert!(err.is_unique_violation());
        Ok(())
    }

    #[tokio::test]
    async fn deleting_user_cascades_to_its_todos_only() -> DatabaseResult<()> {
        let store = MemoryStore::new();
        let ana = UserRepository::insert(&store, &user_input("a@example.com")).await?;
        let bob = UserRepository::insert(&store, &user_input("b@example.com")).await?;
        let ana_todo = ToDoRepository::insert(&store, &draft(ana.id, None, Status::Pending)).await?;
        let bob_todo = ToDoRepository::insert(&store, &draft(bob.id, None, Status::Pending)).await?;

        assert!(UserRepository::delete_by_id(&store, ana.id).await?);

        assert!(!ToDoRepository::exists_by_id(&store, ana_todo.id).await?);
        assert!(ToDoRepository::exists_by_id(&store, bob_todo.id).await?);
        Ok(())
    }

    #[tokio::test]
    async fn deleting_category_cascades_to_its_todos_only() -> DatabaseResult<()> {
        let store = MemoryStore::new();
        let user = UserRepository::insert(&store, &user_input("a@example.com")).await?;
        let work = CategoryRepository::insert(
            &store,
            &CategoryInput {
                name: "Work".to_string(),
            },
        )
        .await?;
        let filed = ToDoRepository::insert(&store, &draft(user.id, Some(work.id), Status::Pending))
            .await?;
        let loose = ToDoRepository::insert(&store, &draft(user.id, None, Status::Pending)).await?;

        assert!(CategoryRepository::delete_by_id(&store, work.id).await?);

        assert!(!ToDoRepository::exists_by_id(&store, filed.id).await?);
        assert!(ToDoRepository::exists_by_id(&store, loose.id).await?);
        Ok(())
    }

    #[tokio::test]
    async fn delete_of_missing_row_reports_false() -> DatabaseResult<()> {
        let store = MemoryStore::new();
        assert!(!UserRepository::delete_by_id(&store, 42).await?);
        assert!(!CategoryRepository::delete_by_id(&store, 42).await?);
        assert!(!ToDoRepository::delete_by_id(&store, 42).await?);
        Ok(())
    }

    #[tokio::test]
    async fn filters_by_status_and_user() -> DatabaseResult<()> {
        let store = MemoryStore::new();
        let user = UserRepository::insert(&store, &user_input("a@example.com")).await?;
        ToDoRepository::insert(&store, &draft(user.id, None, Status::Pending)).await?;
        ToDoRepository::insert(&store, &draft(user.id, None, Status::Completed)).await?;

        let pending = store.find_by_status(Status::Pending).await?;
        assert_eq!(pending.len(), 1);
        assert!(store.find_by_status(Status::Cancelled).await?.is_empty());
        assert_eq!(store.find_by_user_id(user.id).await?.len(), 2);
        assert!(store.find_by_user_id(user.id + 1).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn filters_by_category() -> DatabaseResult<()> {
        let store = MemoryStore::new();
        let user = UserRepository::insert(&store, &user_input("a@example.com")).await?;
        let work = CategoryRepository::insert(
            &store,
            &CategoryInput {
                name: "Work".to_string(),
            },
        )
        .await?;
        let filed = ToDoRepository::insert(&store, &draft(user.id, Some(work.id), Status::Pending))
            .await?;
        ToDoRepository::insert(&store, &draft(user.id, None, Status::Pending)).await?;

        assert_eq!(store.find_by_category_id(work.id).await?, vec![filed]);
        assert!(store.find_by_category_id(work.id + 1).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn todo_referencing_missing_rows_is_a_foreign_key_violation() -> DatabaseResult<()> {
        let store = MemoryStore::new();
        let user = UserRepository::insert(&store, &user_input("a@example.com")).await?;

        let no_user = ToDoRepository::insert(&store, &draft(user.id + 1, None, Status::Pending))
            .await
            .unwrap_err();
        let no_category = ToDoRepository::insert(&store, &draft(user.id, Some(9), Status::Pending))
            .await
            .unwrap_err();

        assert!(matches!(no_user, DatabaseError::ForeignKeyViolation(c) if c == "fk_tb_todo_user"));
        assert!(
            matches!(no_category, DatabaseError::ForeignKeyViolation(c) if c == "fk_tb_todo_category")
        );

        let todo = ToDoRepository::insert(&store, &draft(user.id, None, Status::Pending)).await?;
        UserRepository::delete_by_id(&store, user.id).await?;
        let mut stale = todo;
        stale.title = "Rewritten".to_string();
        let err = ToDoRepository::update(&store, &stale).await.unwrap_err();
        assert!(err.is_foreign_key_violation());
        Ok(())
    }
}
