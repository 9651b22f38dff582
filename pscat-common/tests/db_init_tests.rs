//! Database initialization tests
//!
//! Verifies automatic database creation, idempotent schema creation and the
//! constraints the catalog relies on (unique custom ids, foreign keys).

use pscat_common::db::{create_schema, init_database, init_memory_database};
use sqlx::SqlitePool;
use tempfile::TempDir;

async fn table_names(pool: &SqlitePool) -> Vec<String> {
    sqlx::query_scalar::<_, String>(
        "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
    )
    .fetch_all(pool)
    .await
    .unwrap()
}

async fn insert_user(pool: &SqlitePool, guid: &str) {
    sqlx::query(
        "INSERT INTO users (guid, name, email, role, token_hash, created_at) VALUES (?, 'T', ?, 'admin', ?, '2024-01-01T00:00:00Z')",
    )
    .bind(guid)
    .bind(format!("{}@example.edu", guid))
    .bind(format!("hash-{}", guid))
    .execute(pool)
    .await
    .unwrap();
}

async fn insert_problem(
    pool: &SqlitePool,
    guid: &str,
    custom_id: &str,
    created_by: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO problem_statements (
            guid, custom_id, title, abstract, domain, category, difficulty, duration,
            created_by, created_at, updated_at
        ) VALUES (?, ?, 'T', 'A', 'Blockchain', 'Major', 'Beginner', '1 month', ?, 'now', 'now')
        "#,
    )
    .bind(guid)
    .bind(custom_id)
    .bind(created_by)
    .execute(pool)
    .await
    .map(|_| ())
}

#[tokio::test]
async fn test_init_database_creates_file_and_tables() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("nested").join("pscat.db");

    let pool = init_database(&db_path).await.expect("init should succeed");

    assert!(db_path.exists());
    assert_eq!(
        table_names(&pool).await,
        vec!["domain_sequences", "problem_statements", "users"]
    );
}

#[tokio::test]
async fn test_schema_creation_is_idempotent() {
    let pool = init_memory_database().await.unwrap();
    create_schema(&pool).await.expect("second run should be a no-op");
    create_schema(&pool).await.expect("third run should be a no-op");
    assert_eq!(table_names(&pool).await.len(), 3);
}

#[tokio::test]
async fn test_reopen_existing_database_keeps_rows() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("pscat.db");

    let pool = init_database(&db_path).await.unwrap();
    insert_user(&pool, "u1").await;
    pool.close().await;

    let pool = init_database(&db_path).await.unwrap();
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_custom_id_is_unique() {
    let pool = init_memory_database().await.unwrap();
    insert_user(&pool, "u1").await;

    insert_problem(&pool, "p1", "BLK001", "u1").await.unwrap();
    let err = insert_problem(&pool, "p2", "BLK001", "u1").await.unwrap_err();

    match err {
        sqlx::Error::Database(db_err) => {
            assert!(db_err.is_unique_violation());
            assert!(db_err.message().contains("custom_id"));
        }
        other => panic!("expected unique violation, got {:?}", other),
    }
}

#[tokio::test]
async fn test_created_by_must_reference_user() {
    let pool = init_memory_database().await.unwrap();
    let result = insert_problem(&pool, "p1", "BLK001", "missing-user").await;
    assert!(result.is_err(), "foreign key should reject unknown owner");
}

#[tokio::test]
async fn test_indexes_exist() {
    let pool = init_memory_database().await.unwrap();
    let indexes: Vec<String> = sqlx::query_scalar(
        "SELECT name FROM sqlite_master WHERE type='index' AND tbl_name='problem_statements' AND name LIKE 'idx_%'",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    for expected in [
        "idx_problem_statements_domain_status",
        "idx_problem_statements_difficulty_status",
        "idx_problem_statements_featured_status",
        "idx_problem_statements_created_by",
        "idx_problem_statements_view_count",
    ] {
        assert!(indexes.iter().any(|i| i == expected), "missing index {}", expected);
    }
}
