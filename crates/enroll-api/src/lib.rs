//! # enroll-api — Axum HTTP Surface
//!
//! HTTP layer over the enrollment engine. Sits at the top of the
//! dependency DAG; no business logic in route handlers — everything
//! delegates to `enroll-engine`.
//!
//! ## API Surface
//!
//! | Route                          | Method | Domain                         |
//! |--------------------------------|--------|--------------------------------|
//! | `/v1/sessions`                 | GET    | Availability / admin listing   |
//! | `/v1/sessions`                 | POST   | Session creation (admin)       |
//! | `/v1/sessions/{id}`            | GET    | Session detail                 |
//! | `/v1/sessions/{id}/cancel`     | POST   | Cancellation (staff)           |
//! | `/v1/sessions/{id}/join`       | POST   | Seat reservation               |
//! | `/v1/sessions/{id}/leave`      | POST   | Seat release                   |
//! | `/health/*`                    | GET    | Probes (no identity headers)   |
//!
//! ## Identity
//!
//! An upstream gateway forwards the verified caller in `x-caller-id`,
//! `x-caller-role`, and `x-caller-features` headers; see [`auth`].
//! Health probes are mounted outside the identified routes so they
//! remain accessible without headers.

pub mod auth;
pub mod error;
pub mod extractors;
pub mod routes;
pub mod state;

use axum::Router;
use tower_http::trace::TraceLayer;

pub use error::AppError;
pub use state::{AppConfig, AppState};

/// Assemble the full application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::sessions::router())
        .merge(routes::enrollments::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let health = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness));

    Router::new().merge(health).merge(api)
}

/// Liveness probe — always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe — returns 200 when the application is ready to serve.
async fn readiness() -> &'static str {
    "ready"
}
