//! Integration tests for the PostgreSQL plumbing
//!
//! These tests need a reachable PostgreSQL instance (`DATABASE_URL`) and are
//! ignored by default. Run them with `cargo test -- --ignored`.

use common::{
    database::{DatabaseConfig, health_check, init_pool},
    error::DatabaseError,
};
use sqlx::Row;

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_database_connectivity() -> Result<(), Box<dyn std::error::Error>> {
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    assert!(health_check(&pool).await?, "Database health check failed");

    let row = sqlx::query("SELECT 1 as result").fetch_one(&pool).await?;
    let result: i32 = row.get("result");
    assert_eq!(result, 1, "PostgreSQL simple query test failed");

    Ok(())
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_unique_violation_is_classified() -> Result<(), Box<dyn std::error::Error>> {
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;
    // Temporary tables are per connection
    let mut conn = pool.acquire().await?;

    sqlx::query("CREATE TEMPORARY TABLE uniq_probe (name TEXT NOT NULL UNIQUE)")
        .execute(&mut *conn)
        .await?;
    sqlx::query("INSERT INTO uniq_probe (name) VALUES ('dup')")
        .execute(&mut *conn)
        .await?;

    let err = sqlx::query("INSERT INTO uniq_probe (name) VALUES ('dup')")
        .execute(&mut *conn)
        .await
        .expect_err("second insert must violate the unique constraint");

    assert!(DatabaseError::from_query(err).is_unique_violation());
    Ok(())
}
