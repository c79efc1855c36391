//! # Enrollment API
//!
//! Join and leave endpoints. The heavy lifting — lifecycle checks,
//! feature gating, duplicate detection, atomic seat reservation — lives
//! in the workflow; these handlers only translate HTTP.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use uuid::Uuid;

use enroll_core::{SessionId, Timestamp};
use enroll_engine::EnrollmentConfirmation;

use crate::auth::Caller;
use crate::error::AppError;
use crate::state::AppState;

/// Build the enrollments router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/sessions/{id}/join", post(join_session))
        .route("/v1/sessions/{id}/leave", post(leave_session))
}

/// POST /v1/sessions/{id}/join — reserve a seat for the caller.
async fn join_session(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<EnrollmentConfirmation>), AppError> {
    let confirmation = state
        .workflow
        .join(&caller.0, &SessionId(id), Timestamp::now())?;
    Ok((StatusCode::CREATED, Json(confirmation)))
}

/// POST /v1/sessions/{id}/leave — release the caller's seat.
async fn leave_session(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.workflow.leave(&caller.0, &SessionId(id))?;
    Ok(StatusCode::NO_CONTENT)
}
