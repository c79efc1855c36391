//! # Enrollment Error Taxonomy
//!
//! The typed outcomes of enrollment operations. All of these are expected,
//! user-facing results handled at the calling layer — nothing here should
//! ever crash a process. The two exceptions to "expected" are
//! [`EnrollError::InvalidCapacity`] and [`EnrollError::InvalidSession`],
//! which indicate upstream data corruption and are logged as warnings for
//! operator attention rather than silently repaired.

use thiserror::Error;

use crate::caller::FeatureKey;
use crate::identity::{ParticipantId, SessionId};
use crate::session::SessionStatus;

/// Typed failure of an enrollment operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnrollError {
    /// Unknown session identifier.
    #[error("session {session_id} not found")]
    SessionNotFound {
        /// The identifier that failed to resolve.
        session_id: SessionId,
    },

    /// The session's effective status does not admit new joins.
    #[error("session {session_id} is not joinable (status: {status})")]
    SessionNotJoinable {
        /// The session in question.
        session_id: SessionId,
        /// Effective status at the time of the attempt.
        status: SessionStatus,
    },

    /// Capacity exhausted at reservation time.
    ///
    /// May occur even if an earlier read showed open spots — another caller
    /// won the race. Retryable against a different session, not a bug.
    #[error("session {session_id} is full")]
    SessionFull {
        /// The session whose capacity is exhausted.
        session_id: SessionId,
    },

    /// The caller lacks the capability for this session type.
    #[error("feature '{feature}' is not enabled for this caller")]
    FeatureDisabled {
        /// The feature key the caller is missing.
        feature: FeatureKey,
    },

    /// Idempotency guard: the participant already holds a seat.
    #[error("participant {participant_id} is already enrolled in session {session_id}")]
    AlreadyEnrolled {
        /// The session in question.
        session_id: SessionId,
        /// The participant who already holds a seat.
        participant_id: ParticipantId,
    },

    /// Idempotency guard: the participant holds no seat to release.
    #[error("participant {participant_id} is not enrolled in session {session_id}")]
    NotEnrolled {
        /// The session in question.
        session_id: SessionId,
        /// The participant with no active enrollment.
        participant_id: ParticipantId,
    },

    /// Stored participant counts violate `0 <= current <= max`.
    ///
    /// Surfaced, never clamped — this indicates corruption upstream of the
    /// engine and must reach an operator.
    #[error(
        "session {session_id} has corrupt capacity: {current} participants against a maximum of {max}"
    )]
    InvalidCapacity {
        /// The affected session.
        session_id: SessionId,
        /// Stored current participant count.
        current: u32,
        /// Stored maximum participant count.
        max: u32,
    },

    /// Construction-time validation of session data failed.
    #[error("invalid session data: {reason}")]
    InvalidSession {
        /// What was wrong with the submitted data.
        reason: String,
    },
}
