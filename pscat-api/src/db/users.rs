//! User database operations
//!
//! Users are the owners of problem statements and the authenticated callers
//! of write endpoints.

use chrono::{DateTime, Utc};
use pscat_common::auth::{generate_token, hash_token, Role};
use pscat_common::{Error, Result};
use serde::Serialize;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

use super::{now_timestamp, parse_guid, parse_timestamp};

/// User record
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Create a user and return it together with its plaintext API token
///
/// The token is shown once; only its digest is stored.
pub async fn create_user(
    pool: &SqlitePool,
    name: &str,
    email: &str,
    role: Role,
) -> Result<(User, String)> {
    let name = name.trim();
    let email = email.trim().to_lowercase();
    if name.is_empty() || email.is_empty() {
        return Err(Error::InvalidInput("name and email are required".to_string()));
    }

    let id = Uuid::new_v4();
    let token = generate_token();

    sqlx::query(
        r#"
        INSERT INTO users (guid, name, email, role, token_hash, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(id.to_string())
    .bind(name)
    .bind(&email)
    .bind(role.as_str())
    .bind(hash_token(&token))
    .bind(now_timestamp())
    .execute(pool)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            Error::InvalidInput(format!("A user with email {} already exists", email))
        }
        other => Error::Database(other),
    })?;

    let user = load_user(pool, id)
        .await?
        .ok_or_else(|| Error::Internal("User vanished after insert".to_string()))?;

    Ok((user, token))
}

/// Load user by id
pub async fn load_user(pool: &SqlitePool, id: Uuid) -> Result<Option<User>> {
    let row = sqlx::query("SELECT guid, name, email, role, created_at FROM users WHERE guid = ?")
        .bind(id.to_string())
        .fetch_optional(pool)
        .await?;

    row.map(|r| row_to_user(&r)).transpose()
}

/// Resolve a plaintext bearer token to its user
pub async fn find_user_by_token(pool: &SqlitePool, token: &str) -> Result<Option<User>> {
    let row = sqlx::query(
        "SELECT guid, name, email, role, created_at FROM users WHERE token_hash = ?",
    )
    .bind(hash_token(token))
    .fetch_optional(pool)
    .await?;

    row.map(|r| row_to_user(&r)).transpose()
}

fn row_to_user(row: &SqliteRow) -> Result<User> {
    let guid: String = row.try_get("guid")?;
    let role: String = row.try_get("role")?;
    let created_at: String = row.try_get("created_at")?;

    Ok(User {
        id: parse_guid(&guid)?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        role: role.parse()?,
        created_at: parse_timestamp(&created_at)?,
    })
}
