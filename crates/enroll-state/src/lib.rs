//! # enroll-state — Session Lifecycle State Machine
//!
//! Owns the finite-state machine governing a session's status:
//! `SCHEDULED → ONGOING → COMPLETED`, with `CANCELLED` reachable from the
//! two non-terminal states by explicit admin/tutor action only.
//!
//! ## Design
//!
//! Time-driven transitions are computed lazily from wall-clock time rather
//! than stored or polled — [`effective_status`] derives the state from
//! `(start_time, end_time, now, stored_status)` on every query, which
//! removes the scheduler dependency and the stale-status window the
//! polling approach would have. `COMPLETED` and `CANCELLED` are absorbing:
//! no sequence of time advances or transitions can move a session back to
//! `SCHEDULED`.

pub mod lifecycle;

pub use lifecycle::{
    cancel, effective_status, effective_status_of, is_joinable, CancellationEvidence,
    LifecycleError,
};
