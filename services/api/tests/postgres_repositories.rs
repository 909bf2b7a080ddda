//! PostgreSQL repository tests
//!
//! These tests need a reachable PostgreSQL instance (`DATABASE_URL`) and are
//! ignored by default. Run them with `cargo test -- --ignored`.

use chrono::{NaiveDate, Utc};
use common::database::{DatabaseConfig, init_pool, run_migrations};
use sqlx::PgPool;

use todo_api::{
    models::{CategoryInput, Status, ToDoDraft, UserInput},
    repositories::{
        CategoryRepository, MIGRATOR, PgCategoryRepository, PgToDoRepository, PgUserRepository,
        ToDoRepository, UserRepository,
    },
};

async fn pool() -> Result<PgPool, Box<dyn std::error::Error>> {
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;
    run_migrations(&pool, &MIGRATOR).await?;
    Ok(pool)
}

/// Suffix that keeps rows from separate runs apart
fn unique(tag: &str) -> String {
    format!("{}-{}", tag, Utc::now().timestamp_nanos_opt().unwrap_or_default())
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_todos_cascade_with_their_user_and_category() -> Result<(), Box<dyn std::error::Error>>
{
    let pool = pool().await?;
    let users = PgUserRepository::new(pool.clone());
    let categories = PgCategoryRepository::new(pool.clone());
    let todos = PgToDoRepository::new(pool);

    let user = users
        .insert(&UserInput {
            username: "ana".to_string(),
            email: format!("{}@example.com", unique("ana")),
            password: "password123".to_string(),
        })
        .await?;
    let category = categories
        .insert(&CategoryInput {
            name: unique("Home"),
        })
        .await?;

    let draft = ToDoDraft {
        title: "Buy gifts".to_string(),
        description: None,
        status: Status::Pending,
        due_date: NaiveDate::from_ymd_opt(2024, 12, 25).ok_or("bad date")?,
        user_id: user.id,
        category_id: Some(category.id),
    };
    let todo = todos.insert(&draft).await?;
    assert_eq!(todos.find_by_id(todo.id).await?, Some(todo.clone()));
    assert_eq!(todos.find_by_category_id(category.id).await?, vec![todo.clone()]);

    assert!(categories.delete_by_id(category.id).await?);
    assert!(!todos.exists_by_id(todo.id).await?);

    let orphan = todos
        .insert(&ToDoDraft {
            category_id: None,
            ..draft
        })
        .await?;
    assert!(users.delete_by_id(user.id).await?);
    assert!(!todos.exists_by_id(orphan.id).await?);

    Ok(())
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_todo_for_missing_user_is_a_foreign_key_violation()
-> Result<(), Box<dyn std::error::Error>> {
    let pool = pool().await?;
    let todos = PgToDoRepository::new(pool);

    let err = todos
        .insert(&ToDoDraft {
            title: "Orphan".to_string(),
            description: None,
            status: Status::Pending,
            due_date: NaiveDate::from_ymd_opt(2024, 12, 25).ok_or("bad date")?,
            user_id: i64::MAX,
            category_id: None,
        })
        .await
        .expect_err("insert must violate the user foreign key");

    assert!(err.is_foreign_key_violation());
    Ok(())
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_duplicate_email_is_a_unique_violation() -> Result<(), Box<dyn std::error::Error>> {
    let pool = pool().await?;
    let users = PgUserRepository::new(pool);
    let input = UserInput {
        username: "ana".to_string(),
        email: format!("{}@example.com", unique("dup")),
        password: "password123".to_string(),
    };

    let first = users.insert(&input).await?;
    let err = users
        .insert(&input)
        .await
        .expect_err("second insert must violate the unique email");

    assert!(err.is_unique_violation());
    users.delete_by_id(first.id).await?;
    Ok(())
}
