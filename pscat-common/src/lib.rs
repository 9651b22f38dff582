//! # Problem Statement Catalog Common Library
//!
//! Shared code for the catalog service including:
//! - Catalog vocabulary (domains, categories, difficulties, statuses)
//! - Custom identifier format rules
//! - API token hashing and user roles
//! - Configuration loading
//! - Database schema initialization

pub mod auth;
pub mod catalog;
pub mod config;
pub mod custom_id;
pub mod db;
pub mod error;

pub use catalog::{Category, Difficulty, Domain, Status};
pub use error::{Error, Result};
