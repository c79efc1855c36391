//! # Session Lifecycle State Machine
//!
//! Governs a session's status and the legal transitions between states,
//! independent of capacity.
//!
//! ## States
//!
//! ```text
//! SCHEDULED ──▶ ONGOING ──▶ COMPLETED (terminal)
//!     │             │
//!     ▼             ▼
//!        CANCELLED (terminal)
//! ```
//!
//! ## Design Decision
//!
//! The time-driven transitions (`SCHEDULED -> ONGOING -> COMPLETED`) are
//! never stored or polled. Any query recomputes the *effective* status from
//! `(start_time, end_time, now, stored_status)`, so there is no scheduler
//! or cron dependency and no stale-status window. The stored status can
//! only force the terminal states; it can never move a session backwards.
//! Explicit cancellation is the one transition that writes, and it carries
//! evidence (actor, reason) into the session's transition log.

use thiserror::Error;

use enroll_core::{Session, SessionId, SessionStatus, StatusTransition, Timestamp};

// ─── Effective status ────────────────────────────────────────────────

/// Compute the effective status of a session window at `now`.
///
/// `stored` only wins when it is terminal. `COMPLETED` stored early (by an
/// explicit admin action) is honored: it can only ever agree with or
/// anticipate the clock, never regress the session.
pub fn effective_status(
    stored: SessionStatus,
    start_time: Timestamp,
    end_time: Timestamp,
    now: Timestamp,
) -> SessionStatus {
    if stored.is_terminal() {
        return stored;
    }
    if now >= end_time {
        SessionStatus::Completed
    } else if now >= start_time {
        SessionStatus::Ongoing
    } else {
        SessionStatus::Scheduled
    }
}

/// Effective status of a session record at `now`.
pub fn effective_status_of(session: &Session, now: Timestamp) -> SessionStatus {
    effective_status(session.status, session.start_time, session.end_time, now)
}

/// Whether the session admits new joins at `now`.
///
/// Only effective `SCHEDULED` is joinable; ongoing, completed, and
/// cancelled sessions all reject new enrollments.
pub fn is_joinable(session: &Session, now: Timestamp) -> bool {
    effective_status_of(session, now) == SessionStatus::Scheduled
}

// ─── Cancellation ────────────────────────────────────────────────────

/// Evidence for an explicit cancellation.
#[derive(Debug, Clone)]
pub struct CancellationEvidence {
    /// Who initiated the cancellation (admin or tutor identity, rendered).
    pub actor: String,
    /// Why the session was cancelled.
    pub reason: String,
}

/// Errors from explicit lifecycle transitions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LifecycleError {
    /// The session is already in a terminal state.
    #[error("session {session_id} is {status} and cannot transition")]
    AlreadyTerminal {
        /// The session that was targeted.
        session_id: SessionId,
        /// Its terminal effective status.
        status: SessionStatus,
    },
}

/// Cancel a session (`SCHEDULED -> CANCELLED` or `ONGOING -> CANCELLED`).
///
/// Legal only while the effective status is non-terminal; cancelling a
/// completed or already-cancelled session is rejected. Appends a
/// [`StatusTransition`] to the session's audit log.
pub fn cancel(
    session: &mut Session,
    evidence: CancellationEvidence,
    now: Timestamp,
) -> Result<(), LifecycleError> {
    let effective = effective_status_of(session, now);
    if effective.is_terminal() {
        return Err(LifecycleError::AlreadyTerminal {
            session_id: session.id.clone(),
            status: effective,
        });
    }

    session.transitions.push(StatusTransition {
        from: effective,
        to: SessionStatus::Cancelled,
        at: now,
        actor: evidence.actor,
        reason: evidence.reason,
    });
    session.status = SessionStatus::Cancelled;
    Ok(())
}

// ─── Tests ───────────────────────────────────────────────────────────
