//! HTTP API handlers for pscat-api

pub mod auth;
pub mod bulk_upload;
pub mod health;
pub mod problems;

pub use auth::{auth_middleware, AuthUser};
pub use bulk_upload::{bulk_upload, download_template_csv};
pub use health::health_routes;
pub use problems::{
    create_problem, delete_problem, get_problem, list_problems, toggle_featured, update_problem,
    update_status,
};
