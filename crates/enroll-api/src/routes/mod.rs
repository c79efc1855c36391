//! # Route Modules
//!
//! Each module builds a `Router<AppState>` merged into the application
//! in `lib.rs`. Handlers contain no business logic; they translate HTTP
//! to workflow calls and domain errors to responses.

pub mod enrollments;
pub mod sessions;
