//! Drop-in replacements for axum's `Json`, `Path` and `Form` extractors.
//!
//! axum's own rejections answer with plain-text bodies. These wrappers turn
//! every rejection into an [`ApiError`](crate::error::ApiError) so that bad
//! input gets the same JSON error body as every other failure.

mod form;
mod json;
mod path;

pub use form::Form;
pub use json::Json;
pub use path::Path;
