//! Catalog business logic
//!
//! Identifier allocation and the bulk CSV import pipeline.

pub mod bulk_import;
pub mod csv_rows;
pub mod id_allocator;
pub mod row_validator;
pub mod template;

pub use bulk_import::bulk_import;
pub use csv_rows::ImportError;
pub use template::{download_template, TEMPLATE_FILENAME};
