//! Request bodies for manual create/update
//!
//! Manual submission uses stricter rules than bulk import: the abstract must
//! be at least 50 characters and technologies/deliverables need at least one
//! entry. The two rule sets are kept apart on purpose; bulk rules live in
//! `services::row_validator`.

use pscat_common::{Category, Difficulty, Domain, Status};
use serde::Deserialize;
use std::str::FromStr;
use uuid::Uuid;

use super::problem_statement::{
    NewProblemStatement, ProblemStatement, MAX_ABSTRACT_CHARS, MAX_DURATION_CHARS,
    MAX_TITLE_CHARS, MIN_ABSTRACT_CHARS,
};
use crate::error::FieldError;

/// Body of `POST /api/problem-statements`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateProblemRequest {
    pub custom_id: Option<String>,
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub domain: String,
    pub category: String,
    pub difficulty: String,
    pub duration: String,
    pub technologies: Vec<String>,
    pub deliverables: Vec<String>,
    pub prerequisites: Vec<String>,
    pub learning_outcomes: Vec<String>,
    pub tags: Vec<String>,
    pub status: Option<String>,
    pub featured: Option<bool>,
}

impl CreateProblemRequest {
    /// Apply the manual-creation rules, collecting every field error
    pub fn validate(self, created_by: Uuid) -> Result<NewProblemStatement, Vec<FieldError>> {
        let mut errors = Vec::new();

        let title = bounded_text("title", &self.title, 1, MAX_TITLE_CHARS, &mut errors);
        let abstract_text = bounded_text(
            "abstract",
            &self.abstract_text,
            MIN_ABSTRACT_CHARS,
            MAX_ABSTRACT_CHARS,
            &mut errors,
        );
        let domain = vocabulary::<Domain>("domain", &self.domain, &mut errors);
        let category = vocabulary::<Category>("category", &self.category, &mut errors);
        let difficulty = vocabulary::<Difficulty>("difficulty", &self.difficulty, &mut errors);
        let duration = bounded_text("duration", &self.duration, 1, MAX_DURATION_CHARS, &mut errors);
        let technologies = non_empty_list("technologies", self.technologies, &mut errors);
        let deliverables = non_empty_list("deliverables", self.deliverables, &mut errors);
        let status = match self.status.as_deref().map(str::trim) {
            None | Some("") => Some(Status::default()),
            Some(raw) => vocabulary::<Status>("status", raw, &mut errors),
        };

        match (domain, category, difficulty, status) {
            (Some(domain), Some(category), Some(difficulty), Some(status)) if errors.is_empty() => {
                Ok(NewProblemStatement {
                    custom_id: self.custom_id.map(|id| id.trim().to_string()),
                    title,
                    abstract_text,
                    domain: domain.as_str().to_string(),
                    category,
                    difficulty,
                    duration,
                    technologies,
                    deliverables,
                    prerequisites: clean_list(self.prerequisites),
                    learning_outcomes: clean_list(self.learning_outcomes),
                    tags: clean_list(self.tags),
                    status,
                    featured: self.featured.unwrap_or(false),
                    created_by,
                })
            }
            _ => Err(errors),
        }
    }
}

/// Body of `PUT /api/problem-statements/:id`
///
/// Only provided fields change. `customId` is not accepted: identifiers are
/// immutable once assigned.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateProblemRequest {
    pub title: Option<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub domain: Option<String>,
    pub category: Option<String>,
    pub difficulty: Option<String>,
    pub duration: Option<String>,
    pub technologies: Option<Vec<String>>,
    pub deliverables: Option<Vec<String>>,
    pub prerequisites: Option<Vec<String>>,
    pub learning_outcomes: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub status: Option<String>,
}

impl UpdateProblemRequest {
    /// Merge into `existing`, validating provided fields with the manual rules
    pub fn apply_to(
        self,
        existing: &ProblemStatement,
    ) -> Result<ProblemStatement, Vec<FieldError>> {
        let mut errors = Vec::new();
        let mut updated = existing.clone();

        if let Some(title) = self.title {
            updated.title = bounded_text("title", &title, 1, MAX_TITLE_CHARS, &mut errors);
        }
        if let Some(abstract_text) = self.abstract_text {
            updated.abstract_text = bounded_text(
                "abstract",
                &abstract_text,
                MIN_ABSTRACT_CHARS,
                MAX_ABSTRACT_CHARS,
                &mut errors,
            );
        }
        if let Some(domain) = self.domain {
            if let Some(domain) = vocabulary::<Domain>("domain", &domain, &mut errors) {
                updated.domain = domain.as_str().to_string();
            }
        }
        if let Some(category) = self.category {
            if let Some(category) = vocabulary::<Category>("category", &category, &mut errors) {
                updated.category = category;
            }
        }
        if let Some(difficulty) = self.difficulty {
            let parsed = vocabulary::<Difficulty>("difficulty", &difficulty, &mut errors);
            if let Some(difficulty) = parsed {
                updated.difficulty = difficulty;
            }
        }
        if let Some(duration) = self.duration {
            updated.duration =
                bounded_text("duration", &duration, 1, MAX_DURATION_CHARS, &mut errors);
        }
        if let Some(technologies) = self.technologies {
            updated.technologies = non_empty_list("technologies", technologies, &mut errors);
        }
        if let Some(deliverables) = self.deliverables {
            updated.deliverables = non_empty_list("deliverables", deliverables, &mut errors);
        }
        if let Some(prerequisites) = self.prerequisites {
            updated.prerequisites = clean_list(prerequisites);
        }
        if let Some(learning_outcomes) = self.learning_outcomes {
            updated.learning_outcomes = clean_list(learning_outcomes);
        }
        if let Some(tags) = self.tags {
            updated.tags = clean_list(tags);
        }
        if let Some(status) = self.status {
            if let Some(status) = vocabulary::<Status>("status", status.trim(), &mut errors) {
                updated.status = status;
            }
        }

        if errors.is_empty() {
            Ok(updated)
        } else {
            Err(errors)
        }
    }
}

/// Body of `PATCH /api/problem-statements/:id/status`
#[derive(Debug, Clone, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
}

impl StatusUpdateRequest {
    pub fn parse(&self) -> Result<Status, Vec<FieldError>> {
        let mut errors = Vec::new();
        vocabulary::<Status>("status", self.status.trim(), &mut errors).ok_or(errors)
    }
}

/// Trim and drop empty entries
pub fn clean_list(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

fn bounded_text(
    field: &str,
    raw: &str,
    min: usize,
    max: usize,
    errors: &mut Vec<FieldError>,
) -> String {
    let value = raw.trim().to_string();
    let len = value.chars().count();

    if len == 0 {
        errors.push(FieldError::new(field, format!("{} is required", field)));
    } else if len < min {
        errors.push(FieldError::new(
            field,
            format!("{} must be at least {} characters", field, min),
        ));
    } else if len > max {
        errors.push(FieldError::new(
            field,
            format!("{} must be at most {} characters", field, max),
        ));
    }

    value
}

fn vocabulary<T: FromStr>(field: &str, raw: &str, errors: &mut Vec<FieldError>) -> Option<T> {
    let value = raw.trim();
    if value.is_empty() {
        errors.push(FieldError::new(field, format!("{} is required", field)));
        return None;
    }

    match value.parse::<T>() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            errors.push(FieldError::new(
                field,
                format!("Invalid {}: {}. Must be one of: {}", field, value, allowed_for(field)),
            ));
            None
        }
    }
}

fn allowed_for(field: &str) -> String {
    match field {
        "domain" => Domain::allowed_values(),
        "category" => join(Category::ALL.iter().map(|c| c.as_str())),
        "difficulty" => join(Difficulty::ALL.iter().map(|d| d.as_str())),
        "status" => join(Status::ALL.iter().map(|s| s.as_str())),
        _ => String::new(),
    }
}

fn join<'a>(values: impl Iterator<Item = &'a str>) -> String {
    values.collect::<Vec<_>>().join(", ")
}

fn non_empty_list(field: &str, values: Vec<String>, errors: &mut Vec<FieldError>) -> Vec<String> {
    let cleaned = clean_list(values);
    if cleaned.is_empty() {
        errors.push(FieldError::new(
            field,
            format!("At least one entry in {} is required", field),
        ));
    }
    cleaned
}
