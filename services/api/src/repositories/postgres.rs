//! PostgreSQL repositories
//!
//! Referential integrity lives in the schema: `tb_todo` rows cascade away
//! with their user or category, and email / category name carry unique
//! constraints.

use async_trait::async_trait;
use common::error::{DatabaseError, DatabaseResult};
use sqlx::{PgPool, Row, migrate::Migrator, postgres::PgRow};

use super::{CategoryRepository, ToDoRepository, UserRepository};
use crate::models::{Category, CategoryInput, Status, ToDo, ToDoDraft, User, UserInput};

/// Embedded schema migrations for the todo tables
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

fn user_from_row(row: &PgRow) -> User {
    User {
        id: row.get("id"),
        username: row.get("username"),
        email: row.get("email"),
        password: row.get("password"),
    }
}

fn category_from_row(row: &PgRow) -> Category {
    Category {
        id: row.get("id"),
        name: row.get("name"),
    }
}

fn todo_from_row(row: &PgRow) -> DatabaseResult<ToDo> {
    let status: String = row.get("status");
    let status = status
        .parse::<Status>()
        .map_err(|e| DatabaseError::Query(sqlx::Error::Decode(Box::new(e))))?;

    Ok(ToDo {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        status,
        due_date: row.get("due_date"),
        user_id: row.get("user_id"),
        category_id: row.get("category_id"),
    })
}

/// User repository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: i64) -> DatabaseResult<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, username, email, password
            FROM tb_user
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        Ok(row.as_ref().map(user_from_row))
    }

    async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, username, email, password
            FROM tb_user
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        Ok(row.as_ref().map(user_from_row))
    }

    async fn find_all(&self) -> DatabaseResult<Vec<User>> {
        let rows = sqlx::query(
            r#"
            SELECT id, username, email, password
            FROM tb_user
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        Ok(rows.iter().map(user_from_row).collect())
    }

    async fn exists_by_id(&self, id: i64) -> DatabaseResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM tb_user WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(DatabaseError::from_query)
    }

    async fn exists_by_email(&self, email: &str) -> DatabaseResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM tb_user WHERE email = $1)")
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .map_err(DatabaseError::from_query)
    }

    async fn insert(&self, user: &UserInput) -> DatabaseResult<User> {
        let row = sqlx::query(
            r#"
            INSERT INTO tb_user (username, email, password)
            VALUES ($1, $2, $3)
            RETURNING id, username, email, password
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        Ok(user_from_row(&row))
    }

    async fn update(&self, user: &User) -> DatabaseResult<User> {
        let row = sqlx::query(
            r#"
            UPDATE tb_user
            SET username = $2, email = $3, password = $4
            WHERE id = $1
            RETURNING id, username, email, password
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        Ok(user_from_row(&row))
    }

    async fn delete_by_id(&self, id: i64) -> DatabaseResult<bool> {
        let result = sqlx::query("DELETE FROM tb_user WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::from_query)?;

        Ok(result.rows_affected() > 0)
    }
}

/// Category repository
#[derive(Clone)]
pub struct PgCategoryRepository {
    pool: PgPool,
}

impl PgCategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn find_by_id(&self, id: i64) -> DatabaseResult<Option<Category>> {
        let row = sqlx::query("SELECT id, name FROM tb_category WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::from_query)?;

        Ok(row.as_ref().map(category_from_row))
    }

    async fn find_by_name(&self, name: &str) -> DatabaseResult<Option<Category>> {
        let row = sqlx::query("SELECT id, name FROM tb_category WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::from_query)?;

        Ok(row.as_ref().map(category_from_row))
    }

    async fn find_all(&self) -> DatabaseResult<Vec<Category>> {
        let rows = sqlx::query("SELECT id, name FROM tb_category ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::from_query)?;

        Ok(rows.iter().map(category_from_row).collect())
    }

    async fn exists_by_id(&self, id: i64) -> DatabaseResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM tb_category WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(DatabaseError::from_query)
    }

    async fn exists_by_name(&self, name: &str) -> DatabaseResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM tb_category WHERE name = $1)")
            .bind(name)
            .fetch_one(&self.pool)
            .await
            .map_err(DatabaseError::from_query)
    }

    async fn insert(&self, category: &CategoryInput) -> DatabaseResult<Category> {
        let row = sqlx::query("INSERT INTO tb_category (name) VALUES ($1) RETURNING id, name")
            .bind(&category.name)
            .fetch_one(&self.pool)
            .await
            .map_err(DatabaseError::from_query)?;

        Ok(category_from_row(&row))
    }

    async fn update(&self, category: &Category) -> DatabaseResult<Category> {
        let row =
            sqlx::query("UPDATE tb_category SET name = $2 WHERE id = $1 RETURNING id, name")
                .bind(category.id)
                .bind(&category.name)
                .fetch_one(&self.pool)
                .await
                .map_err(DatabaseError::from_query)?;

        Ok(category_from_row(&row))
    }

    async fn delete_by_id(&self, id: i64) -> DatabaseResult<bool> {
        let result = sqlx::query("DELETE FROM tb_category WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::from_query)?;

        Ok(result.rows_affected() > 0)
    }
}

/// ToDo repository
#[derive(Clone)]
pub struct PgToDoRepository {
    pool: PgPool,
}

impl PgToDoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ToDoRepository for PgToDoRepository {
    async fn find_by_id(&self, id: i64) -> DatabaseResult<Option<ToDo>> {
        let row = sqlx::query(
            r#"
            SELECT id, title, description, status, due_date, user_id, category_id
            FROM tb_todo
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        row.as_ref().map(todo_from_row).transpose()
    }

    async fn find_by_user_id(&self, user_id: i64) -> DatabaseResult<Vec<ToDo>> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, description, status, due_date, user_id, category_id
            FROM tb_todo
            WHERE user_id = $1
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        rows.iter().map(todo_from_row).collect()
    }

    async fn find_by_category_id(&self, category_id: i64) -> DatabaseResult<Vec<ToDo>> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, description, status, due_date, user_id, category_id
            FROM tb_todo
            WHERE category_id = $1
            ORDER BY id
            "#,
        )
        .bind(category_id)
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        rows.iter().map(todo_from_row).collect()
    }

    async fn find_by_status(&self, status: Status) -> DatabaseResult<Vec<ToDo>> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, description, status, due_date, user_id, category_id
            FROM tb_todo
            WHERE status = $1
            ORDER BY id
            "#,
        )
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        rows.iter().map(todo_from_row).collect()
    }

    async fn exists_by_id(&self, id: i64) -> DatabaseResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM tb_todo WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(DatabaseError::from_query)
    }

    async fn insert(&self, todo: &ToDoDraft) -> DatabaseResult<ToDo> {
        let row = sqlx::query(
            r#"
            INSERT INTO tb_todo (title, description, status, due_date, user_id, category_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, title, description, status, due_date, user_id, category_id
            "#,
        )
        .bind(&todo.title)
        .bind(&todo.description)
        .bind(todo.status.as_str())
        .bind(todo.due_date)
        .bind(todo.user_id)
        .bind(todo.category_id)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        todo_from_row(&row)
    }

    async fn update(&self, todo: &ToDo) -> DatabaseResult<ToDo> {
        let row = sqlx::query(
            r#"
            UPDATE tb_todo
            SET title = $2, description = $3, status = $4, due_date = $5,
                user_id = $6, category_id = $7
            WHERE id = $1
            RETURNING id, title, description, status, due_date, user_id, category_id
            "#,
        )
        .bind(todo.id)
        .bind(&todo.title)
        .bind(&todo.description)
        .bind(todo.status.as_str())
        .bind(todo.due_date)
        .bind(todo.user_id)
        .bind(todo.category_id)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        todo_from_row(&row)
    }

    async fn delete_by_id(&self, id: i64) -> DatabaseResult<bool> {
        let result = sqlx::query("DELETE FROM tb_todo WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::from_query)?;

        Ok(result.rows_affected() > 0)
    }
}
