//! Problem statement database operations
//!
//! Inserts go through the identifier allocator inside one transaction. A
//! UNIQUE violation on `custom_id` surfaces as `Error::IdentifierConflict`;
//! inserts with a generated identifier retry with a fresh allocation.

use pscat_common::{Category, Difficulty, Error, Result, Status};
use sqlx::{sqlite::SqliteRow, QueryBuilder, Row, Sqlite, SqliteConnection, SqlitePool};
use tracing::{debug, warn};
use uuid::Uuid;

use super::{now_timestamp, parse_guid, parse_timestamp};
use crate::models::{NewProblemStatement, ProblemStatement};
use crate::services::id_allocator::{self, MAX_ALLOCATION_ATTEMPTS};

const SELECT_COLUMNS: &str = r#"
    SELECT guid, custom_id, title, abstract, domain, category, difficulty, duration,
           technologies, deliverables, prerequisites, learning_outcomes, tags,
           status, featured, view_count, created_by, created_at, updated_at
    FROM problem_statements
"#;

/// List ordering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Most recently created first
    #[default]
    Newest,
    /// Highest view count first
    Popular,
}

/// Filters for listing problem statements
#[derive(Debug, Clone, Default)]
pub struct ProblemFilter {
    pub domain: Option<String>,
    pub category: Option<Category>,
    pub difficulty: Option<Difficulty>,
    pub status: Option<Status>,
    pub featured: Option<bool>,
    /// Substring match on title or abstract
    pub search: Option<String>,
    /// Exact match on one tag
    pub tag: Option<String>,
    pub sort: SortOrder,
}

/// Insert a new problem statement, allocating its custom id if needed
pub async fn insert_problem_statement(
    pool: &SqlitePool,
    new: &NewProblemStatement,
) -> Result<ProblemStatement> {
    new.check_storage_constraints()?;

    let generated = id_allocator::needs_allocation(new.custom_id.as_deref());
    let mut attempt = 1;

    // The counter serializes allocations; a conflict here means a writer
    // stored the candidate without advancing it
    loop {
        match try_insert(pool, new).await {
            Err(Error::IdentifierConflict(custom_id))
                if generated && attempt < MAX_ALLOCATION_ATTEMPTS =>
            {
                warn!(
                    custom_id = %custom_id,
                    attempt,
                    "Custom id taken by a concurrent insert, retrying allocation"
                );
                attempt += 1;
            }
            other => return other,
        }
    }
}

async fn try_insert(pool: &SqlitePool, new: &NewProblemStatement) -> Result<ProblemStatement> {
    let mut tx = pool.begin().await?;

    let custom_id = match new.preserved_custom_id() {
        Some(id) => id.to_string(),
        None => id_allocator::allocate_custom_id(&mut tx, &new.domain).await?,
    };

    let id = Uuid::new_v4();
    let now = now_timestamp();

    sqlx::query(
        r#"
        INSERT INTO problem_statements (
            guid, custom_id, title, abstract, domain, category, difficulty, duration,
            technologies, deliverables, prerequisites, learning_outcomes, tags,
            status, featured, view_count, created_by, created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 0, ?, ?, ?)
        "#,
    )
    .bind(id.to_string())
    .bind(&custom_id)
    .bind(&new.title)
    .bind(&new.abstract_text)
    .bind(&new.domain)
    .bind(new.category.as_str())
    .bind(new.difficulty.as_str())
    .bind(&new.duration)
    .bind(encode_list(&new.technologies)?)
    .bind(encode_list(&new.deliverables)?)
    .bind(encode_list(&new.prerequisites)?)
    .bind(encode_list(&new.learning_outcomes)?)
    .bind(encode_list(&new.tags)?)
    .bind(new.status.as_str())
    .bind(new.featured)
    .bind(new.created_by.to_string())
    .bind(&now)
    .bind(&now)
    .execute(&mut *tx)
    .await
    .map_err(|e| map_write_error(e, &custom_id))?;

    let record = load_by_guid(&mut tx, id)
        .await?
        .ok_or_else(|| Error::Internal(format!("Problem statement {} vanished after insert", id)))?;

    tx.commit().await?;

    debug!(id = %id, custom_id = %record.custom_id, "Inserted problem statement");

    Ok(record)
}

/// Whether a record already uses `custom_id`
pub async fn custom_id_exists(conn: &mut SqliteConnection, custom_id: &str) -> Result<bool> {
    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM problem_statements WHERE custom_id = ?)",
    )
    .bind(custom_id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(exists)
}

/// Look up by internal UUID or by custom id
pub async fn find_problem_statement(
    pool: &SqlitePool,
    key: &str,
) -> Result<Option<ProblemStatement>> {
    let row = match Uuid::parse_str(key) {
        Ok(id) => {
            sqlx::query(&format!("{} WHERE guid = ?", SELECT_COLUMNS))
                .bind(id.to_string())
                .fetch_optional(pool)
                .await?
        }
        Err(_) => {
            sqlx::query(&format!("{} WHERE custom_id = ?", SELECT_COLUMNS))
                .bind(key.trim().to_uppercase())
                .fetch_optional(pool)
                .await?
        }
    };

    row.map(|r| row_to_problem(&r)).transpose()
}

async fn load_by_guid(conn: &mut SqliteConnection, id: Uuid) -> Result<Option<ProblemStatement>> {
    let row = sqlx::query(&format!("{} WHERE guid = ?", SELECT_COLUMNS))
        .bind(id.to_string())
        .fetch_optional(&mut *conn)
        .await?;

    row.map(|r| row_to_problem(&r)).transpose()
}

async fn load_required(pool: &SqlitePool, id: Uuid) -> Result<ProblemStatement> {
    let mut conn = pool.acquire().await?;
    load_by_guid(&mut conn, id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Problem statement {}", id)))
}

/// Page of problem statements matching `filter`, plus the total match count
pub async fn list_problem_statements(
    pool: &SqlitePool,
    filter: &ProblemFilter,
    limit: i64,
    offset: i64,
) -> Result<(Vec<ProblemStatement>, i64)> {
    let mut count_query =
        QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM problem_statements WHERE 1 = 1");
    push_filters(&mut count_query, filter);
    let total: i64 = count_query.build_query_scalar().fetch_one(pool).await?;

    let mut query = QueryBuilder::<Sqlite>::new(SELECT_COLUMNS);
    query.push(" WHERE 1 = 1");
    push_filters(&mut query, filter);
    match filter.sort {
        SortOrder::Newest => query.push(" ORDER BY created_at DESC, rowid DESC"),
        SortOrder::Popular => {
            query.push(" ORDER BY view_count DESC, created_at DESC, rowid DESC")
        }
    };
    query.push(" LIMIT ").push_bind(limit);
    query.push(" OFFSET ").push_bind(offset);

    let rows = query.build().fetch_all(pool).await?;
    let records = rows
        .iter()
        .map(row_to_problem)
        .collect::<Result<Vec<_>>>()?;

    Ok((records, total))
}

fn push_filters(query: &mut QueryBuilder<'_, Sqlite>, filter: &ProblemFilter) {
    if let Some(domain) = &filter.domain {
        query.push(" AND domain = ").push_bind(domain.clone());
    }
    if let Some(category) = filter.category {
        query.push(" AND category = ").push_bind(category.as_str());
    }
    if let Some(difficulty) = filter.difficulty {
        query.push(" AND difficulty = ").push_bind(difficulty.as_str());
    }
    if let Some(status) = filter.status {
        query.push(" AND status = ").push_bind(status.as_str());
    }
    if let Some(featured) = filter.featured {
        query.push(" AND featured = ").push_bind(featured);
    }
    if let Some(search) = &filter.search {
        let pattern = format!("%{}%", escape_like(search));
        query
            .push(" AND (title LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR abstract LIKE ")
            .push_bind(pattern)
            .push(" ESCAPE '\\')");
    }
    if let Some(tag) = &filter.tag {
        query
            .push(" AND EXISTS (SELECT 1 FROM json_each(problem_statements.tags)")
            .push(" WHERE json_each.value = ")
            .push_bind(tag.clone())
            .push(")");
    }
}

/// Make `%`, `_` and `\` match literally under `ESCAPE '\'`
fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Persist edited fields of an existing record
///
/// `custom_id`, `created_by`, `view_count` and `created_at` are never written.
pub async fn update_problem_statement(
    pool: &SqlitePool,
    record: &ProblemStatement,
) -> Result<ProblemStatement> {
    record.check_storage_constraints()?;

    let result = sqlx::query(
        r#"
        UPDATE problem_statements
        SET title = ?, abstract = ?, domain = ?, category = ?, difficulty = ?, duration = ?,
            technologies = ?, deliverables = ?, prerequisites = ?, learning_outcomes = ?,
            tags = ?, status = ?, featured = ?, updated_at = ?
        WHERE guid = ?
        "#,
    )
    .bind(&record.title)
    .bind(&record.abstract_text)
    .bind(&record.domain)
    .bind(record.category.as_str())
    .bind(record.difficulty.as_str())
    .bind(&record.duration)
    .bind(encode_list(&record.technologies)?)
    .bind(encode_list(&record.deliverables)?)
    .bind(encode_list(&record.prerequisites)?)
    .bind(encode_list(&record.learning_outcomes)?)
    .bind(encode_list(&record.tags)?)
    .bind(record.status.as_str())
    .bind(record.featured)
    .bind(now_timestamp())
    .bind(record.id.to_string())
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("Problem statement {}", record.id)));
    }

    load_required(pool, record.id).await
}

/// Move a record to `status`
pub async fn set_status(pool: &SqlitePool, id: Uuid, status: Status) -> Result<ProblemStatement> {
    let result =
        sqlx::query("UPDATE problem_statements SET status = ?, updated_at = ? WHERE guid = ?")
            .bind(status.as_str())
            .bind(now_timestamp())
            .bind(id.to_string())
            .execute(pool)
            .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("Problem statement {}", id)));
    }

    load_required(pool, id).await
}

/// Flip the featured flag
pub async fn toggle_featured(pool: &SqlitePool, id: Uuid) -> Result<ProblemStatement> {
    let result = sqlx::query(
        "UPDATE problem_statements SET featured = NOT featured, updated_at = ? WHERE guid = ?",
    )
    .bind(now_timestamp())
    .bind(id.to_string())
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("Problem statement {}", id)));
    }

    load_required(pool, id).await
}

/// Count one view; `updated_at` is left alone
pub async fn increment_view_count(pool: &SqlitePool, id: Uuid) -> Result<()> {
    sqlx::query("UPDATE problem_statements SET view_count = view_count + 1 WHERE guid = ?")
        .bind(id.to_string())
        .execute(pool)
        .await?;

    Ok(())
}

/// Remove a record; returns false when it did not exist
pub async fn delete_problem_statement(pool: &SqlitePool, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM problem_statements WHERE guid = ?")
        .bind(id.to_string())
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Number of records stored under `domain`
pub async fn count_by_domain(pool: &SqlitePool, domain: &str) -> Result<i64> {
    let count = sqlx::query_scalar("SELECT COUNT(*) FROM problem_statements WHERE domain = ?")
        .bind(domain)
        .fetch_one(pool)
        .await?;

    Ok(count)
}

fn map_write_error(err: sqlx::Error, custom_id: &str) -> Error {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.is_unique_violation() && db_err.message().contains("custom_id") {
            return Error::IdentifierConflict(custom_id.to_string());
        }
    }
    Error::Database(err)
}

fn encode_list(values: &[String]) -> Result<String> {
    serde_json::to_string(values).map_err(|e| Error::Internal(format!("Encode list failed: {}", e)))
}

fn decode_list(raw: &str) -> Result<Vec<String>> {
    serde_json::from_str(raw)
        .map_err(|e| Error::Internal(format!("Invalid stored list '{}': {}", raw, e)))
}

fn row_to_problem(row: &SqliteRow) -> Result<ProblemStatement> {
    let guid: String = row.try_get("guid")?;
    let category: String = row.try_get("category")?;
    let difficulty: String = row.try_get("difficulty")?;
    let status: String = row.try_get("status")?;
    let created_by: String = row.try_get("created_by")?;
    let created_at: String = row.try_get("created_at")?;
    let updated_at: String = row.try_get("updated_at")?;

    Ok(ProblemStatement {
        id: parse_guid(&guid)?,
        custom_id: row.try_get("custom_id")?,
        title: row.try_get("title")?,
        abstract_text: row.try_get("abstract")?,
        domain: row.try_get("domain")?,
        category: category.parse()?,
        difficulty: difficulty.parse()?,
        duration: row.try_get("duration")?,
        technologies: decode_list(row.try_get("technologies")?)?,
        deliverables: decode_list(row.try_get("deliverables")?)?,
        prerequisites: decode_list(row.try_get("prerequisites")?)?,
        learning_outcomes: decode_list(row.try_get("learning_outcomes")?)?,
        tags: decode_list(row.try_get("tags")?)?,
        status: status.parse()?,
        featured: row.try_get("featured")?,
        view_count: row.try_get("view_count")?,
        created_by: parse_guid(&created_by)?,
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}
