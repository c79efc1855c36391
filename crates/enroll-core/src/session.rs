//! # Session Data Model
//!
//! The persisted shape of a scheduled session, the enums describing it, and
//! the enrollment record. All wire-facing enums serialize as
//! `SCREAMING_SNAKE_CASE` strings so no defective status strings can be
//! stored or transmitted.
//!
//! Construction is validated: `current_participants` and `status` are owned
//! by the engine's controlled operations and can never be set directly by a
//! caller — [`Session::create`] always starts a session empty and
//! `SCHEDULED`.

use serde::{Deserialize, Serialize};

use crate::error::EnrollError;
use crate::identity::{ConfirmationRef, ParticipantId, SessionId, TutorId};
use crate::temporal::Timestamp;

// ── Session type ────────────────────────────────────────────────────

/// The kind of learning event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionType {
    /// Individual tutoring, always exactly one seat.
    OneToOne,
    /// Small-group session, 2–6 seats.
    SmartQuad,
    /// Large-group masterclass.
    Masterclass,
}

impl SessionType {
    /// Return the string representation of this session type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneToOne => "ONE_TO_ONE",
            Self::SmartQuad => "SMART_QUAD",
            Self::Masterclass => "MASTERCLASS",
        }
    }

    /// Parse a session type from its string representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ONE_TO_ONE" => Some(Self::OneToOne),
            "SMART_QUAD" => Some(Self::SmartQuad),
            "MASTERCLASS" => Some(Self::Masterclass),
            _ => None,
        }
    }

    /// Inclusive bounds on `max_participants` for this session type.
    pub fn capacity_bounds(&self) -> (u32, u32) {
        match self {
            Self::OneToOne => (1, 1),
            Self::SmartQuad => (2, 6),
            Self::Masterclass => (2, 500),
        }
    }

    /// All session types, for listing/visibility computations.
    pub const ALL: [SessionType; 3] = [Self::OneToOne, Self::SmartQuad, Self::Masterclass];
}

impl std::fmt::Display for SessionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Course type ─────────────────────────────────────────────────────

/// Validated subject-track code (e.g. `PTE`, `IELTS`).
///
/// The set of tracks is configured externally and open-ended, so this is a
/// validated string rather than an enum: uppercased on construction,
/// non-empty, at most 32 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseType(String);

impl CourseType {
    /// Create a validated course type. Input is trimmed and uppercased.
    pub fn new(s: impl Into<String>) -> Result<Self, EnrollError> {
        let code = s.into().trim().to_uppercase();
        if code.is_empty() {
            return Err(EnrollError::InvalidSession {
                reason: "course_type must not be empty".to_string(),
            });
        }
        if code.len() > 32 {
            return Err(EnrollError::InvalidSession {
                reason: "course_type must not exceed 32 characters".to_string(),
            });
        }
        Ok(Self(code))
    }

    /// Return the course type as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CourseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ── Session status ──────────────────────────────────────────────────

/// Stored lifecycle status of a session.
///
/// `ONGOING` and `COMPLETED` are normally *computed* from the clock rather
/// than stored (see `enroll-state`); the stored value can only force the
/// terminal states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionStatus {
    /// Upcoming; the only state that admits joins.
    Scheduled,
    /// The current time is inside the session window.
    Ongoing,
    /// The session window has passed. Terminal.
    Completed,
    /// Explicitly cancelled by admin or tutor action. Terminal.
    Cancelled,
}

impl SessionStatus {
    /// Return the string representation of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "SCHEDULED",
            Self::Ongoing => "ONGOING",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Whether this status is terminal (absorbing).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Transition record ───────────────────────────────────────────────

/// Record of an explicit status transition, kept on the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusTransition {
    /// Status before the transition.
    pub from: SessionStatus,
    /// Status after the transition.
    pub to: SessionStatus,
    /// When the transition occurred.
    pub at: Timestamp,
    /// Who initiated the transition.
    pub actor: String,
    /// Why.
    pub reason: String,
}

// ── Session ─────────────────────────────────────────────────────────

/// Submitted data for a new session, before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionDraft {
    /// Display title.
    pub title: String,
    /// Display description.
    pub description: String,
    /// Kind of learning event.
    pub session_type: SessionType,
    /// Subject track.
    pub course_type: CourseType,
    /// Scheduled start.
    pub start_time: Timestamp,
    /// Scheduled end; must be after `start_time`.
    pub end_time: Timestamp,
    /// Seat capacity; validated against the session type's bounds.
    pub max_participants: u32,
    /// The tutor running the session.
    pub tutor_id: TutorId,
    /// Denormalized tutor display name, used only for free-text search.
    #[serde(default)]
    pub tutor_name: Option<String>,
}

/// A scheduled session with a capacity limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Unique identifier.
    pub id: SessionId,
    /// Display title.
    pub title: String,
    /// Display description.
    pub description: String,
    /// Kind of learning event.
    pub session_type: SessionType,
    /// Subject track.
    pub course_type: CourseType,
    /// Scheduled start.
    pub start_time: Timestamp,
    /// Scheduled end.
    pub end_time: Timestamp,
    /// Seat capacity.
    pub max_participants: u32,
    /// Seats currently held. Mutated only through the capacity ledger.
    pub current_participants: u32,
    /// Stored lifecycle status. Mutated only through lifecycle operations.
    pub status: SessionStatus,
    /// The tutor running the session (opaque reference).
    pub tutor_id: TutorId,
    /// Denormalized tutor display name, if the catalog subsystem supplied one.
    pub tutor_name: Option<String>,
    /// Opaque meeting link populated by the calendar integration.
    pub meeting_link: Option<String>,
    /// Opaque calendar event reference populated by the calendar integration.
    pub calendar_event_ref: Option<String>,
    /// Audit log of explicit status transitions.
    pub transitions: Vec<StatusTransition>,
    /// When the record was created.
    pub created_at: Timestamp,
}

impl Session {
    /// Validate a draft and create a session record.
    ///
    /// The session starts empty and `SCHEDULED`; callers cannot set
    /// `current_participants` or `status` directly.
    pub fn create(id: SessionId, draft: SessionDraft, now: Timestamp) -> Result<Self, EnrollError> {
        if draft.title.trim().is_empty() {
            return Err(EnrollError::InvalidSession {
                reason: "title must not be empty".to_string(),
            });
        }
        if draft.end_time <= draft.start_time {
            return Err(EnrollError::InvalidSession {
                reason: format!(
                    "end_time ({}) must be after start_time ({})",
                    draft.end_time, draft.start_time
                ),
            });
        }
        let (min, max) = draft.session_type.capacity_bounds();
        if draft.max_participants < min || draft.max_participants > max {
            return Err(EnrollError::InvalidSession {
                reason: format!(
                    "max_participants for {} must be in {min}..={max}, got {}",
                    draft.session_type, draft.max_participants
                ),
            });
        }
        // Deserialization is transparent, so re-validate (and normalize)
        // course types that arrived via serde rather than `CourseType::new`.
        let course_type = CourseType::new(draft.course_type.as_str())?;

        Ok(Self {
            id,
            title: draft.title,
            description: draft.description,
            session_type: draft.session_type,
            course_type,
            start_time: draft.start_time,
            end_time: draft.end_time,
            max_participants: draft.max_participants,
            current_participants: 0,
            status: SessionStatus::Scheduled,
            tutor_id: draft.tutor_id,
            tutor_name: draft.tutor_name,
            meeting_link: None,
            calendar_event_ref: None,
            transitions: Vec::new(),
            created_at: now,
        })
    }

    /// Seats still open: `max_participants - current_participants`.
    pub fn spots_remaining(&self) -> u32 {
        self.max_participants.saturating_sub(self.current_participants)
    }

    /// Fraction of capacity in use, in `0.0..=1.0` for well-formed records.
    pub fn fill_percentage(&self) -> f64 {
        if self.max_participants == 0 {
            return 0.0;
        }
        f64::from(self.current_participants) / f64::from(self.max_participants)
    }

    /// Check the capacity invariant `0 <= current <= max`.
    ///
    /// Violations indicate corruption upstream and are surfaced, not clamped.
    pub fn check_capacity(&self) -> Result<(), EnrollError> {
        if self.current_participants > self.max_participants || self.max_participants == 0 {
            return Err(EnrollError::InvalidCapacity {
                session_id: self.id.clone(),
                current: self.current_participants,
                max: self.max_participants,
            });
        }
        Ok(())
    }
}

// ── Enrollment ──────────────────────────────────────────────────────

/// The relationship recording that a participant holds a seat in a session.
///
/// At most one active enrollment exists per `(session, participant)` pair.
/// Removed on leave; implicitly voided when the session is cancelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
    /// The session the seat belongs to.
    pub session_id: SessionId,
    /// The participant holding the seat.
    pub participant_id: ParticipantId,
    /// Reference returned to the caller at join time.
    pub confirmation: ConfirmationRef,
    /// When the seat was reserved.
    pub enrolled_at: Timestamp,
}
