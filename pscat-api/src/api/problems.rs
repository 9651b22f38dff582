//! Problem statement endpoints
//!
//! Reads are public. Writes need an authenticated [`AuthUser`]: creation is
//! open to admins and faculty, edits to the owning faculty member or an
//! admin, and featuring or deleting to admins only.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use pscat_common::auth::Role;
use pscat_common::{Category, Difficulty, Status};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::info;

use super::auth::AuthUser;
use crate::db::problems::{self, ProblemFilter, SortOrder};
use crate::error::{ApiError, ApiResult, FieldError};
use crate::models::{
    CreateProblemRequest, ProblemStatement, StatusUpdateRequest, UpdateProblemRequest,
};
use crate::pagination::{PageMeta, PageRequest};
use crate::AppState;

/// Query string of `GET /api/problem-statements`
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub domain: Option<String>,
    pub category: Option<String>,
    pub difficulty: Option<String>,
    pub status: Option<String>,
    pub featured: Option<bool>,
    /// Substring of title or abstract
    pub q: Option<String>,
    pub tag: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
    /// `newest` (default) or `popular`
    pub sort: Option<String>,
}

impl ListQuery {
    fn into_filter(self) -> Result<(ProblemFilter, PageRequest), Vec<FieldError>> {
        let mut errors = Vec::new();

        let filter = ProblemFilter {
            domain: non_blank(self.domain),
            category: parse_filter::<Category>("category", self.category, &mut errors),
            difficulty: parse_filter::<Difficulty>("difficulty", self.difficulty, &mut errors),
            status: parse_filter::<Status>("status", self.status, &mut errors),
            featured: self.featured,
            search: non_blank(self.q),
            tag: non_blank(self.tag),
            sort: match self.sort.as_deref().map(str::trim) {
                None | Some("") | Some("newest") => SortOrder::Newest,
                Some("popular") => SortOrder::Popular,
                Some(other) => {
                    errors.push(FieldError::new(
                        "sort",
                        format!("Invalid sort: {}. Must be one of: newest, popular", other),
                    ));
                    SortOrder::Newest
                }
            },
        };

        if errors.is_empty() {
            Ok((filter, PageRequest::new(self.page, self.limit)))
        } else {
            Err(errors)
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_filter<T: FromStr>(
    field: &str,
    value: Option<String>,
    errors: &mut Vec<FieldError>,
) -> Option<T> {
    let value = non_blank(value)?;
    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            errors.push(FieldError::new(field, format!("Invalid {}: {}", field, value)));
            None
        }
    }
}

/// Page of records plus pagination metadata
#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub data: Vec<ProblemStatement>,
    pub pagination: PageMeta,
}

/// GET /api/problem-statements
pub async fn list_problems(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<ListResponse>> {
    let (filter, page) = query.into_filter().map_err(ApiError::Validation)?;

    let (data, total) =
        problems::list_problem_statements(&state.db, &filter, page.limit, page.offset()).await?;

    Ok(Json(ListResponse {
        data,
        pagination: page.meta(total),
    }))
}

/// GET /api/problem-statements/:id
///
/// Accepts the internal UUID or the custom id. Each read counts as a view.
pub async fn get_problem(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult<Json<ProblemStatement>> {
    let mut record = load(&state, &key).await?;

    problems::increment_view_count(&state.db, record.id).await?;
    record.view_count += 1;

    Ok(Json(record))
}

/// POST /api/problem-statements
pub async fn create_problem(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<CreateProblemRequest>,
) -> ApiResult<(StatusCode, Json<ProblemStatement>)> {
    user.require_role(&Role::AUTHORS)?;

    let new = request.validate(user.id).map_err(ApiError::Validation)?;
    let record = problems::insert_problem_statement(&state.db, &new).await?;

    info!(
        custom_id = %record.custom_id,
        created_by = %user.id,
        "Created problem statement"
    );

    Ok((StatusCode::CREATED, Json(record)))
}

/// PUT /api/problem-statements/:id
pub async fn update_problem(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(key): Path<String>,
    Json(request): Json<UpdateProblemRequest>,
) -> ApiResult<Json<ProblemStatement>> {
    let existing = load(&state, &key).await?;
    user.require_owner_or_admin(&existing)?;

    let updated = request.apply_to(&existing).map_err(ApiError::Validation)?;
    let record = problems::update_problem_statement(&state.db, &updated).await?;

    Ok(Json(record))
}

/// PATCH /api/problem-statements/:id/status
pub async fn update_status(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(key): Path<String>,
    Json(request): Json<StatusUpdateRequest>,
) -> ApiResult<Json<ProblemStatement>> {
    let existing = load(&state, &key).await?;
    user.require_owner_or_admin(&existing)?;

    let status = request.parse().map_err(ApiError::Validation)?;
    let record = problems::set_status(&state.db, existing.id, status).await?;

    info!(custom_id = %record.custom_id, status = %status, "Changed problem statement status");

    Ok(Json(record))
}

/// PATCH /api/problem-statements/:id/featured
pub async fn toggle_featured(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(key): Path<String>,
) -> ApiResult<Json<ProblemStatement>> {
    user.require_role(&[Role::Admin])?;

    let existing = load(&state, &key).await?;
    let record = problems::toggle_featured(&state.db, existing.id).await?;

    Ok(Json(record))
}

/// DELETE /api/problem-statements/:id
pub async fn delete_problem(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(key): Path<String>,
) -> ApiResult<StatusCode> {
    user.require_role(&[Role::Admin])?;

    let existing = load(&state, &key).await?;
    if !problems::delete_problem_statement(&state.db, existing.id).await? {
        return Err(ApiError::NotFound(format!("Problem statement {}", key)));
    }

    info!(custom_id = %existing.custom_id, deleted_by = %user.id, "Deleted problem statement");

    Ok(StatusCode::NO_CONTENT)
}

async fn load(state: &AppState, key: &str) -> ApiResult<ProblemStatement> {
    problems::find_problem_statement(&state.db, key)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Problem statement {}", key)))
}
