//! # Extraction Helpers
//!
//! JSON body extraction with structured error mapping. Deserialization
//! failures become 400 responses; domain validation happens downstream
//! and surfaces as 422.

use axum::extract::rejection::JsonRejection;
use axum::Json;

use crate::error::AppError;

/// Extract a JSON body, mapping deserialization errors to [`AppError::BadRequest`].
///
/// Handlers take `Result<Json<T>, JsonRejection>` and call this helper so
/// a malformed body produces the standard error envelope instead of
/// Axum's plain-text rejection.
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    result
        .map(|Json(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}
