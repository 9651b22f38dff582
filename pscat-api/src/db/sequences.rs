//! Per-domain identifier sequence counters
//!
//! One row per domain holds the last sequence number handed out. The counter
//! advances with a single upsert statement, so two writers can never read the
//! same value.

use pscat_common::Result;
use sqlx::SqliteConnection;

/// Advance and return the sequence for `domain`
///
/// The first call for a domain seeds the counter with the number of records
/// already stored under it plus one. Must run on the connection of the insert
/// transaction so the increment commits or rolls back with the record.
pub async fn next_sequence(conn: &mut SqliteConnection, domain: &str) -> Result<i64> {
    let sequence: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO domain_sequences (domain, last_seq)
        VALUES (?, (SELECT COUNT(*) FROM problem_statements WHERE domain = ?) + 1)
        ON CONFLICT(domain) DO UPDATE SET last_seq = last_seq + 1
        RETURNING last_seq
        "#,
    )
    .bind(domain)
    .bind(domain)
    .fetch_one(&mut *conn)
    .await?;

    Ok(sequence)
}
