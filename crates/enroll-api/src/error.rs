//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps domain errors from enroll-core, enroll-engine, and enroll-catalog
//! to HTTP status codes. Returns JSON error response bodies with error
//! code, message, and details. Never exposes internal error details in
//! production responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use enroll_catalog::CancelError;
use enroll_core::EnrollError;
use enroll_engine::{CancelRejection, ScheduleError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured JSON error response body.
///
/// All error responses use this format for consistency across the API
/// surface. The `details` field carries additional context for 422
/// validation errors but is omitted for 500-class errors to prevent
/// information leakage.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "SESSION_FULL").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Additional details, present only for client errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
///
/// Maps domain errors to appropriate HTTP status codes and structured
/// JSON error bodies. Internal error details are never exposed to clients.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Request validation failed (422).
    #[error("validation error: {0}")]
    Validation(String),

    /// Request body could not be parsed (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Missing or malformed caller identity (401).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Authorization failure — insufficient role or disabled feature (403).
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Conflict with current resource state (409).
    #[error("conflict: {message}")]
    Conflict { code: &'static str, message: String },

    /// Internal server error (500). Message is logged but not returned to client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Return the HTTP status code and machine-readable error code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            Self::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            Self::Conflict { code, .. } => (StatusCode::CONFLICT, code),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        // Never expose internal error messages to clients.
        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            Self::Conflict { message, .. } => message.clone(),
            other => other.to_string(),
        };

        // Log internal errors for operator visibility.
        if matches!(&self, Self::Internal(_)) {
            tracing::error!(error = %self, "internal server error");
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                details: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Convert enrollment domain errors to API errors.
///
/// Conflict-class errors keep distinct machine-readable codes so clients
/// can tell a full session from a duplicate join without parsing messages.
impl From<EnrollError> for AppError {
    fn from(err: EnrollError) -> Self {
        let message = err.to_string();
        match err {
            EnrollError::SessionNotFound { .. } => Self::NotFound(message),
            EnrollError::SessionNotJoinable { .. } => Self::Conflict {
                code: "SESSION_NOT_JOINABLE",
                message,
            },
            EnrollError::SessionFull { .. } => Self::Conflict {
                code: "SESSION_FULL",
                message,
            },
            EnrollError::AlreadyEnrolled { .. } => Self::Conflict {
                code: "ALREADY_ENROLLED",
                message,
            },
            EnrollError::NotEnrolled { .. } => Self::Conflict {
                code: "NOT_ENROLLED",
                message,
            },
            EnrollError::FeatureDisabled { .. } => Self::Forbidden(message),
            EnrollError::InvalidCapacity { .. } => Self::Internal(message),
            EnrollError::InvalidSession { .. } => Self::Validation(message),
        }
    }
}

/// Convert scheduling failures to API errors.
impl From<ScheduleError> for AppError {
    fn from(err: ScheduleError) -> Self {
        match err {
            ScheduleError::NotPermitted { .. } => Self::Forbidden(err.to_string()),
            ScheduleError::Invalid(inner) => inner.into(),
        }
    }
}

/// Convert cancellation failures to API errors.
impl From<CancelRejection> for AppError {
    fn from(err: CancelRejection) -> Self {
        match err {
            CancelRejection::NotPermitted { .. } => Self::Forbidden(err.to_string()),
            CancelRejection::Catalog(CancelError::NotFound(_)) => Self::NotFound(err.to_string()),
            CancelRejection::Catalog(CancelError::Lifecycle(_)) => Self::Conflict {
                code: "ALREADY_TERMINAL",
                message: err.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use enroll_core::{FeatureKey, ParticipantId, SessionId, SessionStatus};

    #[test]
    fn not_found_status_code() {
        let err = AppError::NotFound("missing session".to_string());
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(code, "NOT_FOUND");
    }

    #[test]
    fn validation_status_code() {
        let err = AppError::Validation("bad field".to_string());
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(code, "VALIDATION_ERROR");
    }

    #[test]
    fn session_full_maps_to_conflict_with_distinct_code() {
        let err = AppError::from(EnrollError::SessionFull {
            session_id: SessionId::new(),
        });
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(code, "SESSION_FULL");
    }

    #[test]
    fn not_joinable_maps_to_conflict() {
        let err = AppError::from(EnrollError::SessionNotJoinable {
            session_id: SessionId::new(),
            status: SessionStatus::Cancelled,
        });
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(code, "SESSION_NOT_JOINABLE");
    }

    #[test]
    fn already_enrolled_and_not_enrolled_have_distinct_codes() {
        let already = AppError::from(EnrollError::AlreadyEnrolled {
            session_id: SessionId::new(),
            participant_id: ParticipantId::new(),
        });
        let not = AppError::from(EnrollError::NotEnrolled {
            session_id: SessionId::new(),
            participant_id: ParticipantId::new(),
        });
        assert_eq!(already.status_and_code().1, "ALREADY_ENROLLED");
        assert_eq!(not.status_and_code().1, "NOT_ENROLLED");
    }

    #[test]
    fn feature_disabled_maps_to_forbidden() {
        let err = AppError::from(EnrollError::FeatureDisabled {
            feature: FeatureKey::Masterclass,
        });
        let (status, _) = err.status_and_code();
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[test]
    fn invalid_capacity_maps_to_internal() {
        let err = AppError::from(EnrollError::InvalidCapacity {
            session_id: SessionId::new(),
            current: 9,
            max: 4,
        });
        let (status, _) = err.status_and_code();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn invalid_session_maps_to_validation() {
        let err = AppError::from(EnrollError::InvalidSession {
            reason: "end_time must be after start_time".to_string(),
        });
        let (status, _) = err.status_and_code();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn error_body_serializes() {
        let body = ErrorBody {
            error: ErrorDetail {
                code: "TEST".to_string(),
                message: "test message".to_string(),
                details: None,
            },
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("TEST"));
        assert!(json.contains("test message"));
        assert!(!json.contains("details")); // skipped when None
    }

    // ── into_response tests ──────────────────────────────────────

    use http_body_util::BodyExt;

    /// Helper to extract status and body from a Response.
    async fn response_parts(err: AppError) -> (StatusCode, ErrorBody) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
        (status, body)
    }

    #[tokio::test]
    async fn into_response_not_found() {
        let (status, body) = response_parts(AppError::NotFound("session 123".into())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.error.code, "NOT_FOUND");
        assert!(body.error.message.contains("session 123"));
        assert!(body.error.details.is_none());
    }

    #[tokio::test]
    async fn into_response_conflict_keeps_domain_code() {
        let err = AppError::from(EnrollError::SessionFull {
            session_id: SessionId::new(),
        });
        let (status, body) = response_parts(err).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body.error.code, "SESSION_FULL");
    }

    #[tokio::test]
    async fn into_response_internal_hides_details() {
        let (status, body) =
            response_parts(AppError::Internal("lock poisoned in store".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error.code, "INTERNAL_ERROR");
        // The internal error message must NOT appear in the response body.
        assert!(
            !body.error.message.contains("lock poisoned"),
            "internal error details must not leak: {}",
            body.error.message
        );
        assert_eq!(body.error.message, "An internal error occurred");
        assert!(body.error.details.is_none());
    }
}
