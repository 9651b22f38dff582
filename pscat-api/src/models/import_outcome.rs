//! Bulk import results
//!
//! Ephemeral, returned to the caller of one bulk upload and never persisted.

use serde::{Deserialize, Serialize};

/// Field name used for storage failures of an otherwise valid row
pub const DATABASE_FIELD: &str = "database";

/// One problem with one row of the uploaded file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowError {
    /// Source row number; the header is row 1, so data rows start at 2
    pub row: usize,
    pub field: String,
    pub message: String,
}

impl RowError {
    pub fn new(row: usize, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            row,
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Aggregate result of one bulk import call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportOutcome {
    /// Rows persisted
    pub imported: usize,
    /// Rows rejected at validation or persistence, each counted once
    pub failed: usize,
    /// Row errors in row order; one row may contribute several
    pub errors: Vec<RowError>,
}

impl ImportOutcome {
    pub fn record_imported(&mut self) {
        self.imported += 1;
    }

    /// Count one failed row and keep all of its errors
    pub fn record_failed(&mut self, errors: Vec<RowError>) {
        self.failed += 1;
        self.errors.extend(errors);
    }

    /// Human-readable summary line
    pub fn summary(&self) -> String {
        format!(
            "Bulk upload completed: {} imported, {} failed",
            self.imported, self.failed
        )
    }
}
