//! Authentication middleware for pscat-api
//!
//! Resolves `Authorization: Bearer <token>` to a user and attaches an
//! [`AuthUser`] to the request. Applied to write routes only; listing and
//! reading records stays public.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use pscat_common::auth::{parse_bearer, Role};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::db::users::{find_user_by_token, User};
use crate::error::{ApiError, ApiResult};
use crate::models::ProblemStatement;
use crate::AppState;

/// Authenticated caller, available to handlers as an `Extension`
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub role: Role,
}

impl From<User> for AuthUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            role: user.role,
        }
    }
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// 403 unless the caller holds one of `allowed`
    pub fn require_role(&self, allowed: &[Role]) -> ApiResult<()> {
        if allowed.contains(&self.role) {
            Ok(())
        } else {
            Err(ApiError::Forbidden(format!(
                "Role {} may not perform this action",
                self.role
            )))
        }
    }

    /// Admins may edit anything; faculty only what they created
    pub fn require_owner_or_admin(&self, record: &ProblemStatement) -> ApiResult<()> {
        if self.is_admin() || (self.role == Role::Faculty && record.created_by == self.id) {
            Ok(())
        } else {
            Err(ApiError::Forbidden(format!(
                "Not allowed to modify problem statement {}",
                record.custom_id
            )))
        }
    }
}

/// Authentication middleware
///
/// Returns 401 when the header is missing, malformed or names no user.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_bearer)
        .map(str::to_string)
        .ok_or_else(|| ApiError::Unauthorized("Missing bearer token".to_string()))?;

    let user = match find_user_by_token(&state.db, &token).await? {
        Some(user) => user,
        None => {
            warn!(uri = %request.uri(), "Rejected unknown API token");
            return Err(ApiError::Unauthorized("Invalid API token".to_string()));
        }
    };

    debug!(user = %user.id, role = %user.role, "Authenticated request");
    request.extensions_mut().insert(AuthUser::from(user));

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pscat_common::{Category, Difficulty, Status};

    fn caller(role: Role) -> AuthUser {
        AuthUser {
            id: Uuid::new_v4(),
            role,
        }
    }

    fn record_owned_by(owner: Uuid) -> ProblemStatement {
        ProblemStatement {
            id: Uuid::new_v4(),
            custom_id: "WEB001".to_string(),
            title: "T".to_string(),
            abstract_text: "A".to_string(),
            domain: "Web Development".to_string(),
            category: Category::Minor,
            difficulty: Difficulty::Beginner,
            duration: "1 month".to_string(),
            technologies: Vec::new(),
            deliverables: Vec::new(),
            prerequisites: Vec::new(),
            learning_outcomes: Vec::new(),
            tags: Vec::new(),
            status: Status::Draft,
            featured: false,
            view_count: 0,
            created_by: owner,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_require_role() {
        assert!(caller(Role::Faculty).require_role(&Role::AUTHORS).is_ok());
        assert!(caller(Role::Student).require_role(&Role::AUTHORS).is_err());
        assert!(caller(Role::Faculty).require_role(&[Role::Admin]).is_err());
    }

    #[test]
    fn test_owner_or_admin() {
        let faculty = caller(Role::Faculty);
        assert!(faculty.require_owner_or_admin(&record_owned_by(faculty.id)).is_ok());
        assert!(faculty.require_owner_or_admin(&record_owned_by(Uuid::new_v4())).is_err());

        let admin = caller(Role::Admin);
        assert!(admin.require_owner_or_admin(&record_owned_by(Uuid::new_v4())).is_ok());

        // Students cannot edit even records attributed to them
        let student = caller(Role::Student);
        assert!(student.require_owner_or_admin(&record_owned_by(student.id)).is_err());
    }
}
