//! Data models for the catalog API

pub mod import_outcome;
pub mod problem_request;
pub mod problem_statement;

pub use import_outcome::{ImportOutcome, RowError};
pub use problem_request::{CreateProblemRequest, StatusUpdateRequest, UpdateProblemRequest};
pub use problem_statement::{NewProblemStatement, ProblemStatement};
