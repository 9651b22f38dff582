//! Bulk CSV import
//!
//! **Flow:** decode the whole upload, then validate and insert each row in
//! source order. Rows are independent: a rejected row is recorded and the
//! next one is processed. There is no batch transaction, so rows imported
//! before a failure stay imported.

use sqlx::SqlitePool;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::csv_rows::{parse_csv, ImportError};
use super::row_validator::validate_row;
use crate::db::problems::insert_problem_statement;
use crate::models::import_outcome::DATABASE_FIELD;
use crate::models::{ImportOutcome, RowError};

/// Row number of the first data line; the header is row 1
const FIRST_DATA_ROW: usize = 2;

/// Import an uploaded CSV document on behalf of `created_by`
///
/// Fails as a whole only when the document cannot be decoded; every other
/// problem is reported per row in the returned [`ImportOutcome`].
pub async fn bulk_import(
    pool: &SqlitePool,
    bytes: &[u8],
    created_by: Uuid,
) -> Result<ImportOutcome, ImportError> {
    info!(bytes = bytes.len(), created_by = %created_by, "Starting bulk import");

    let rows = parse_csv(bytes).map_err(|e| {
        warn!(error = %e, "Bulk import rejected");
        e
    })?;

    let mut outcome = ImportOutcome::default();

    for (idx, row) in rows.iter().enumerate() {
        let row_num = idx + FIRST_DATA_ROW;

        let record = match validate_row(row, row_num, created_by) {
            Ok(record) => record,
            Err(errors) => {
                warn!(row = row_num, errors = errors.len(), "Row failed validation");
                outcome.record_failed(errors);
                continue;
            }
        };

        match insert_problem_statement(pool, &record).await {
            Ok(stored) => {
                debug!(row = row_num, custom_id = %stored.custom_id, "Imported row");
                outcome.record_imported();
            }
            Err(e) => {
                warn!(row = row_num, error = %e, "Row failed to persist");
                outcome.record_failed(vec![RowError::new(row_num, DATABASE_FIELD, e.to_string())]);
            }
        }
    }

    info!(
        imported = outcome.imported,
        failed = outcome.failed,
        "Bulk import completed"
    );

    Ok(outcome)
}
