//! Problem statement records

use chrono::{DateTime, Utc};
use pscat_common::custom_id::is_valid_custom_id;
use pscat_common::{Category, Difficulty, Error, Result, Status};
use serde::Serialize;
use uuid::Uuid;

/// Maximum title length in characters
pub const MAX_TITLE_CHARS: usize = 200;
/// Maximum abstract length in characters
pub const MAX_ABSTRACT_CHARS: usize = 5000;
/// Minimum abstract length for manually created records
pub const MIN_ABSTRACT_CHARS: usize = 50;
/// Maximum duration text length in characters
pub const MAX_DURATION_CHARS: usize = 50;

/// Stored catalog entry
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemStatement {
    /// Internal storage key
    pub id: Uuid,
    /// Human-readable key (`AIM001`), immutable once assigned
    pub custom_id: String,
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    /// Stored as text so legacy values outside [`pscat_common::Domain`] survive
    pub domain: String,
    pub category: Category,
    pub difficulty: Difficulty,
    pub duration: String,
    pub technologies: Vec<String>,
    pub deliverables: Vec<String>,
    pub prerequisites: Vec<String>,
    pub learning_outcomes: Vec<String>,
    pub tags: Vec<String>,
    pub status: Status,
    pub featured: bool,
    pub view_count: i64,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Record handed to persistence for insertion
///
/// `custom_id` is kept only when already format-valid; otherwise the
/// identifier allocator assigns one inside the insert transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProblemStatement {
    pub custom_id: Option<String>,
    pub title: String,
    pub abstract_text: String,
    pub domain: String,
    pub category: Category,
    pub difficulty: Difficulty,
    pub duration: String,
    pub technologies: Vec<String>,
    pub deliverables: Vec<String>,
    pub prerequisites: Vec<String>,
    pub learning_outcomes: Vec<String>,
    pub tags: Vec<String>,
    pub status: Status,
    pub featured: bool,
    pub created_by: Uuid,
}

impl NewProblemStatement {
    /// Supplied identifier, if it is one the allocator must preserve
    pub fn preserved_custom_id(&self) -> Option<&str> {
        self.custom_id
            .as_deref()
            .filter(|id| is_valid_custom_id(id))
    }

    /// Length limits enforced on every write, whatever the entry path
    pub fn check_storage_constraints(&self) -> Result<()> {
        check_text_limits(&self.title, &self.abstract_text, &self.duration)
    }
}

impl ProblemStatement {
    /// Same length limits as [`NewProblemStatement::check_storage_constraints`]
    pub fn check_storage_constraints(&self) -> Result<()> {
        check_text_limits(&self.title, &self.abstract_text, &self.duration)
    }
}

/// First text field over its storage limit, if any
fn check_text_limits(title: &str, abstract_text: &str, duration: &str) -> Result<()> {
    check_length("title", title, MAX_TITLE_CHARS)?;
    check_length("abstract", abstract_text, MAX_ABSTRACT_CHARS)?;
    check_length("duration", duration, MAX_DURATION_CHARS)
}

fn check_length(field: &str, value: &str, max: usize) -> Result<()> {
    let len = value.chars().count();
    if len > max {
        return Err(Error::InvalidInput(format!(
            "{} must be at most {} characters (got {})",
            field, max, len
        )));
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::fixtures::new_problem;
    use super::*;

    #[test]
    fn test_preserved_custom_id_requires_valid_format() {
        let mut record = new_problem("Blockchain", Uuid::new_v4());
        assert_eq!(record.preserved_custom_id(), None);

        record.custom_id = Some("BLK007".to_string());
        assert_eq!(record.preserved_custom_id(), Some("BLK007"));

        record.custom_id = Some("blk7".to_string());
        assert_eq!(record.preserved_custom_id(), None);
    }

    #[test]
    fn test_storage_constraints() {
        let mut record = new_problem("Blockchain", Uuid::new_v4());
        assert!(record.check_storage_constraints().is_ok());

        record.title = "x".repeat(MAX_TITLE_CHARS);
        assert!(record.check_storage_constraints().is_ok());

        record.title = "x".repeat(MAX_TITLE_CHARS + 1);
        let err = record.check_storage_constraints().unwrap_err();
        assert!(err.to_string().contains("title"));
    }

    #[test]
    fn test_text_limits_report_first_offending_field() {
        assert!(check_text_limits("t", "a", "d").is_ok());

        let long_abstract = "a".repeat(MAX_ABSTRACT_CHARS + 1);
        let long_duration = "d".repeat(MAX_DURATION_CHARS + 1);
        let err = check_text_limits("t", &long_abstract, &long_duration).unwrap_err();
        assert!(err.to_string().starts_with("Invalid input: abstract"), "{}", err);

        let err = check_text_limits("t", "a", &long_duration).unwrap_err();
        assert!(err.to_string().contains("duration must be at most 50"));
    }

    #[test]
    fn test_stored_record_uses_same_limits() {
        let pending = new_problem("Blockchain", Uuid::new_v4());
        let now = Utc::now();
        let mut stored = ProblemStatement {
            id: Uuid::new_v4(),
            custom_id: "BLK001".to_string(),
            title: pending.title,
            abstract_text: pending.abstract_text,
            domain: pending.domain,
            category: pending.category,
            difficulty: pending.difficulty,
            duration: pending.duration,
            technologies: pending.technologies,
            deliverables: pending.deliverables,
            prerequisites: pending.prerequisites,
            learning_outcomes: pending.learning_outcomes,
            tags: pending.tags,
            status: pending.status,
            featured: pending.featured,
            view_count: 0,
            created_by: pending.created_by,
            created_at: now,
            updated_at: now,
        };
        assert!(stored.check_storage_constraints().is_ok());

        stored.duration = "d".repeat(MAX_DURATION_CHARS + 1);
        let err = stored.check_storage_constraints().unwrap_err();
        assert!(err.to_string().contains("duration"));
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        let mut record = new_problem("Blockchain", Uuid::new_v4());
        record.duration = "é".repeat(MAX_DURATION_CHARS);
        assert!(record.check_storage_constraints().is_ok());
    }
}
