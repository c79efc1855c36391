//! # enroll-engine
//!
//! Orchestration layer for the session enrollment engine. Composes the
//! catalog, the lifecycle machine, and the feature gate into the
//! operations callers actually invoke: list, view, join, leave, schedule,
//! cancel.
//!
//! ## Design
//!
//! - [`filter`] is a pure function over a catalog snapshot; derived fields
//!   (`spots_remaining`, `fill_percentage`, `starts_in`, `effective_status`)
//!   are computed per query and never persisted.
//! - [`gate`] enforces feature-flag capability in front of both reads and
//!   writes, so gating cannot be bypassed by calling the API directly.
//! - [`workflow`] owns operation ordering. Join validation (lifecycle,
//!   gate, duplicate, capacity) runs inside the catalog's critical
//!   section; external collaborators run after, best-effort.

pub mod filter;
pub mod gate;
pub mod workflow;

pub use filter::{
    filter_sessions, AvailabilityQuery, ListingMode, SessionView, StartCountdown, TimeWindow,
};
pub use gate::FeatureGate;
pub use workflow::{
    CalendarEvent, CalendarIntegration, CancelRejection, EnrollmentConfirmation,
    EnrollmentOutcome, EnrollmentWorkflow, NoopCalendar, NoopNotifier, Notifier, NotifyError,
    ScheduleError,
};
