//! # Session Management API
//!
//! Listing, detail, creation, and cancellation of sessions. Listing is
//! the availability view by default; `mode=admin` exposes the full
//! catalog and is restricted to staff.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use uuid::Uuid;

use enroll_core::{CourseType, Session, SessionDraft, SessionId, SessionType, Timestamp};
use enroll_engine::{AvailabilityQuery, ListingMode, SessionView, TimeWindow};

use crate::auth::Caller;
use crate::error::AppError;
use crate::extractors::extract_json;
use crate::state::AppState;

/// Raw listing query parameters, parsed into an [`AvailabilityQuery`].
#[derive(Debug, Deserialize, Default)]
pub struct ListQuery {
    /// `all` (default), `today`, or `this_week`.
    pub time_window: Option<String>,
    /// Subject track, e.g. `PTE` or `IELTS`.
    pub course_type: Option<String>,
    /// `ONE_TO_ONE`, `SMART_QUAD`, or `MASTERCLASS`.
    pub session_type: Option<String>,
    /// Free-text search over title, description, and tutor name.
    pub q: Option<String>,
    /// `available` (default) or `admin`; `admin` requires a staff role.
    pub mode: Option<String>,
}

impl ListQuery {
    /// Validate and convert the raw parameters.
    fn into_query(self) -> Result<AvailabilityQuery, AppError> {
        let time_window = match self.time_window.as_deref() {
            None => TimeWindow::default(),
            Some(raw) => TimeWindow::parse(raw).ok_or_else(|| {
                AppError::Validation(format!(
                    "invalid time_window '{raw}'. Valid values: all, today, this_week"
                ))
            })?,
        };

        let session_type = match self.session_type {
            None => None,
            Some(raw) => Some(
                serde_json::from_value::<SessionType>(serde_json::Value::String(raw.clone()))
                    .map_err(|_| {
                        AppError::Validation(format!(
                            "invalid session_type '{raw}'. Valid values: ONE_TO_ONE, SMART_QUAD, MASTERCLASS"
                        ))
                    })?,
            ),
        };

        let course_type = match self.course_type {
            None => None,
            Some(raw) => Some(CourseType::new(&raw).map_err(AppError::from)?),
        };

        let mode = match self.mode.as_deref() {
            None => ListingMode::default(),
            Some(raw) => ListingMode::parse(raw).ok_or_else(|| {
                AppError::Validation(format!(
                    "invalid mode '{raw}'. Valid values: available, admin"
                ))
            })?,
        };

        Ok(AvailabilityQuery {
            time_window,
            course_type,
            session_type,
            search_text: self.q,
            mode,
        })
    }
}

/// Request body for session cancellation.
#[derive(Debug, Deserialize)]
pub struct CancelRequest {
    /// Operator-supplied reason, recorded in the transition log.
    pub reason: Option<String>,
}

/// Build the sessions router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/sessions", get(list_sessions).post(create_session))
        .route("/v1/sessions/{id}", get(get_session))
        .route("/v1/sessions/{id}/cancel", post(cancel_session))
}

/// GET /v1/sessions — list sessions visible to the caller.
async fn list_sessions(
    State(state): State<AppState>,
    caller: Caller,
    Query(raw): Query<ListQuery>,
) -> Result<Json<Vec<SessionView>>, AppError> {
    let query = raw.into_query()?;

    // The admin listing exposes full, ongoing, and cancelled sessions.
    if query.mode == ListingMode::Admin && !caller.0.role.is_staff() {
        return Err(AppError::Forbidden(
            "admin listing mode requires a staff role".to_string(),
        ));
    }

    let views = state.workflow.list(&caller.0, &query, Timestamp::now())?;
    Ok(Json(views))
}

/// POST /v1/sessions — create a session (admin only).
async fn create_session(
    State(state): State<AppState>,
    caller: Caller,
    body: Result<Json<SessionDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Session>), AppError> {
    let draft = extract_json(body)?;
    let session = state.workflow.schedule(&caller.0, draft, Timestamp::now())?;
    Ok((StatusCode::CREATED, Json(session)))
}

/// GET /v1/sessions/{id} — a single session with derived fields.
async fn get_session(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let view = state
        .workflow
        .view(&caller.0, &SessionId(id), Timestamp::now())?;
    Ok(Json(view))
}

/// POST /v1/sessions/{id}/cancel — cancel a session (staff only).
async fn cancel_session(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<Uuid>,
    body: Result<Json<CancelRequest>, JsonRejection>,
) -> Result<Json<Session>, AppError> {
    let request = extract_json(body)?;
    let reason = request
        .reason
        .unwrap_or_else(|| "cancelled by operator".to_string());
    let session =
        state
            .workflow
            .cancel(&caller.0, &SessionId(id), reason, Timestamp::now())?;
    Ok(Json(session))
}
