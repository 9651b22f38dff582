//! Per-row validation for bulk import
//!
//! Looser than manual creation: only presence and vocabulary are checked.
//! Every failing field of a row is reported; a row is never cut short after
//! its first error.

use pscat_common::{Category, Difficulty, Domain, Status};
use std::fmt::Display;
use std::str::FromStr;
use uuid::Uuid;

use super::csv_rows::{parse_featured, split_list, CsvRow};
use crate::models::{NewProblemStatement, RowError};

/// Check one row and build the record to persist
///
/// `row_num` is the source row number used in error entries.
pub fn validate_row(
    row: &CsvRow,
    row_num: usize,
    created_by: Uuid,
) -> Result<NewProblemStatement, Vec<RowError>> {
    let mut errors = Vec::new();

    let title = required(row_num, "title", &row.title, &mut errors);
    let abstract_text = required(row_num, "abstract", &row.abstract_text, &mut errors);
    let duration = required(row_num, "duration", &row.duration, &mut errors);

    let domain = member::<Domain>(
        row_num,
        "domain",
        &row.domain,
        &Domain::allowed_values(),
        &mut errors,
    );
    let category = member::<Category>(
        row_num,
        "category",
        &row.category,
        &allowed(&Category::ALL),
        &mut errors,
    );
    let difficulty = member::<Difficulty>(
        row_num,
        "difficulty",
        &row.difficulty,
        &allowed(&Difficulty::ALL),
        &mut errors,
    );

    let status = match row.status.trim() {
        "" => Some(Status::default()),
        raw => match raw.parse::<Status>() {
            Ok(status) => Some(status),
            Err(_) => {
                errors.push(invalid(row_num, "status", raw, &allowed(&Status::ALL)));
                None
            }
        },
    };

    match (domain, category, difficulty, status) {
        (Some(domain), Some(category), Some(difficulty), Some(status)) if errors.is_empty() => {
            Ok(NewProblemStatement {
                custom_id: None,
                title,
                abstract_text,
                domain: domain.as_str().to_string(),
                category,
                difficulty,
                duration,
                technologies: split_list(&row.technologies),
                deliverables: split_list(&row.deliverables),
                prerequisites: split_list(&row.prerequisites),
                learning_outcomes: split_list(&row.learning_outcomes),
                tags: split_list(&row.tags),
                status,
                featured: parse_featured(&row.featured),
                created_by,
            })
        }
        _ => Err(errors),
    }
}

fn required(row_num: usize, field: &str, raw: &str, errors: &mut Vec<RowError>) -> String {
    let value = raw.trim();
    if value.is_empty() {
        errors.push(RowError::new(row_num, field, format!("{} is required", field)));
    }
    value.to_string()
}

/// Blank values only get the "required" error, never a vocabulary one
fn member<T: FromStr>(
    row_num: usize,
    field: &str,
    raw: &str,
    allowed_values: &str,
    errors: &mut Vec<RowError>,
) -> Option<T> {
    let value = raw.trim();
    if value.is_empty() {
        errors.push(RowError::new(row_num, field, format!("{} is required", field)));
        return None;
    }

    match value.parse::<T>() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            errors.push(invalid(row_num, field, value, allowed_values));
            None
        }
    }
}

fn invalid(row_num: usize, field: &str, value: &str, allowed_values: &str) -> RowError {
    RowError::new(
        row_num,
        field,
        format!("Invalid {}: {}. Must be one of: {}", field, value, allowed_values),
    )
}

fn allowed<T: Display>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
