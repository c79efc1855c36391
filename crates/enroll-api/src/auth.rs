//! # Caller Identity Extraction
//!
//! The API does not authenticate anyone itself. An upstream gateway
//! terminates authentication and forwards the verified identity in
//! request headers:
//!
//! - `x-caller-id` — participant UUID (required)
//! - `x-caller-role` — `student`, `tutor`, or `admin` (required)
//! - `x-caller-features` — comma-separated feature keys (optional,
//!   students only)
//!
//! Missing or malformed identity headers reject with 401. Unknown
//! feature tokens are ignored so a gateway rolling out new flags does
//! not break older API nodes.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use enroll_core::{CallerIdentity, FeatureKey, ParticipantId, Role};
use uuid::Uuid;

use crate::error::AppError;

/// Header carrying the caller's participant UUID.
pub const CALLER_ID_HEADER: &str = "x-caller-id";
/// Header carrying the caller's role.
pub const CALLER_ROLE_HEADER: &str = "x-caller-role";
/// Header carrying the caller's enabled feature keys, comma-separated.
pub const CALLER_FEATURES_HEADER: &str = "x-caller-features";

/// Extractor wrapping the domain [`CallerIdentity`], built from the
/// gateway-supplied identity headers.
#[derive(Debug, Clone)]
pub struct Caller(pub CallerIdentity);

fn header<'a>(parts: &'a Parts, name: &'static str) -> Result<&'a str, AppError> {
    parts
        .headers
        .get(name)
        .ok_or_else(|| AppError::Unauthorized(format!("missing {name} header")))?
        .to_str()
        .map_err(|_| AppError::Unauthorized(format!("{name} header is not valid UTF-8")))
}

impl<S: Send + Sync> FromRequestParts<S> for Caller {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id: Uuid = header(parts, CALLER_ID_HEADER)?
            .parse()
            .map_err(|_| AppError::Unauthorized("x-caller-id is not a valid UUID".to_string()))?;

        let role = Role::parse(header(parts, CALLER_ROLE_HEADER)?).ok_or_else(|| {
            AppError::Unauthorized(
                "x-caller-role must be one of: student, tutor, admin".to_string(),
            )
        })?;

        let enabled_features = match parts.headers.get(CALLER_FEATURES_HEADER) {
            None => Default::default(),
            Some(value) => {
                let raw = value.to_str().map_err(|_| {
                    AppError::Unauthorized("x-caller-features header is not valid UTF-8".to_string())
                })?;
                raw.split(',')
                    .map(str::trim)
                    .filter(|token| !token.is_empty())
                    .filter_map(FeatureKey::parse)
                    .collect()
            }
        };

        Ok(Caller(CallerIdentity {
            id: ParticipantId(id),
            role,
            enabled_features,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(request: Request<()>) -> Result<Caller, AppError> {
        let (mut parts, _) = request.into_parts();
        Caller::from_request_parts(&mut parts, &()).await
    }

    fn base_request() -> axum::http::request::Builder {
        Request::builder()
            .uri("/v1/sessions")
            .header(CALLER_ID_HEADER, "3fa85f64-5717-4562-b3fc-2c963f66afa6")
            .header(CALLER_ROLE_HEADER, "student")
    }

    #[tokio::test]
    async fn extracts_student_with_features() {
        let request = base_request()
            .header(CALLER_FEATURES_HEADER, "smart_quad, masterclass")
            .body(())
            .unwrap();
        let Caller(identity) = extract(request).await.unwrap();
        assert_eq!(identity.role, Role::Student);
        assert!(identity.has_feature(FeatureKey::SmartQuad));
        assert!(identity.has_feature(FeatureKey::Masterclass));
        assert!(!identity.has_feature(FeatureKey::OneToOne));
    }

    #[tokio::test]
    async fn missing_id_header_is_unauthorized() {
        let request = Request::builder()
            .uri("/v1/sessions")
            .header(CALLER_ROLE_HEADER, "student")
            .body(())
            .unwrap();
        assert!(matches!(
            extract(request).await,
            Err(AppError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn malformed_uuid_is_unauthorized() {
        let request = Request::builder()
            .uri("/v1/sessions")
            .header(CALLER_ID_HEADER, "not-a-uuid")
            .header(CALLER_ROLE_HEADER, "student")
            .body(())
            .unwrap();
        assert!(matches!(
            extract(request).await,
            Err(AppError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn unknown_role_is_unauthorized() {
        let request = Request::builder()
            .uri("/v1/sessions")
            .header(CALLER_ID_HEADER, "3fa85f64-5717-4562-b3fc-2c963f66afa6")
            .header(CALLER_ROLE_HEADER, "superuser")
            .body(())
            .unwrap();
        assert!(matches!(
            extract(request).await,
            Err(AppError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn unknown_feature_tokens_are_ignored() {
        let request = base_request()
            .header(CALLER_FEATURES_HEADER, "smart_quad,future_feature,,")
            .body(())
            .unwrap();
        let Caller(identity) = extract(request).await.unwrap();
        assert!(identity.has_feature(FeatureKey::SmartQuad));
        assert_eq!(identity.enabled_features.len(), 1);
    }

    #[tokio::test]
    async fn absent_features_header_means_empty_set() {
        let request = base_request().body(()).unwrap();
        let Caller(identity) = extract(request).await.unwrap();
        assert!(identity.enabled_features.is_empty());
    }
}
