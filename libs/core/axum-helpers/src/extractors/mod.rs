//! Request extractors shared by the API handlers.
//!
//! Both wrap the stock Axum extractors so rejections flow through the
//! unified [`crate::AppError`] response shape.

pub mod uuid_path;
pub mod validated_json;

pub use uuid_path::UuidPath;
pub use validated_json::ValidatedJson;
