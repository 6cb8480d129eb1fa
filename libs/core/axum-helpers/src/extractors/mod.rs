//! Custom extractors for Axum handlers.
//!
//! Both extractors reject through [`AppError`](crate::errors::AppError), so
//! failures share the JSON error envelope.

pub mod positive_id_path;
pub mod validated_json;

pub use positive_id_path::{PathOperation, PositiveIdPath};
pub use validated_json::{ValidateWith, ValidatedJson};
