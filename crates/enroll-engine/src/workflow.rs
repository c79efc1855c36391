//! # Enrollment Workflow
//!
//! Orchestrates joins and leaves: lifecycle check, feature gate, duplicate
//! guard, atomic seat reservation, then the best-effort external
//! collaborators (notifier, calendar).
//!
//! ## Join ordering
//!
//! The validation order is fixed — lifecycle, gate, duplicate, capacity —
//! and the whole sequence runs inside the catalog's single critical
//! section, so a caller can never observe `SessionFull` for a session that
//! was actually cancelled out from under them, and no interleaving can
//! admit a join to a cancelled or full session.
//!
//! ## Collaborators
//!
//! Notification and calendar integration are trait seams with no-op
//! defaults. Notifier failure is *not* part of the transactional contract:
//! the seat stays reserved and the failure is surfaced to the caller as a
//! warning on the confirmation.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use enroll_catalog::{CancelError, MemoryCatalog};
use enroll_core::{
    CallerIdentity, ConfirmationRef, EnrollError, ParticipantId, Role, Session, SessionDraft,
    SessionId, SessionStatus, Timestamp,
};
use enroll_state::{effective_status_of, CancellationEvidence};

use crate::filter::{filter_sessions, AvailabilityQuery, SessionView};
use crate::gate::FeatureGate;

// ─── Collaborator seams ──────────────────────────────────────────────

/// What happened, for notification purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrollmentOutcome {
    /// The participant took a seat.
    Joined,
    /// The participant gave a seat back.
    Left,
}

/// Notification delivery failure. Best-effort only — never rolls back a
/// reservation.
#[derive(Error, Debug, Clone)]
#[error("notification delivery failed: {0}")]
pub struct NotifyError(pub String);

/// Fire-and-forget enrollment notifications (email, push, etc.).
/// Implementation is out of scope for the engine.
pub trait Notifier: Send + Sync {
    /// Notify interested parties of an enrollment change.
    fn notify_enrollment(
        &self,
        session_id: &SessionId,
        participant_id: &ParticipantId,
        outcome: EnrollmentOutcome,
    ) -> Result<(), NotifyError>;
}

/// A notifier that does nothing. For tests and deployments without a
/// notification service.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify_enrollment(
        &self,
        _session_id: &SessionId,
        _participant_id: &ParticipantId,
        _outcome: EnrollmentOutcome,
    ) -> Result<(), NotifyError> {
        Ok(())
    }
}

/// Opaque references produced by the external calendar system.
#[derive(Debug, Clone)]
pub struct CalendarEvent {
    /// Meeting link for participants. Never interpreted by the engine.
    pub meeting_link: String,
    /// Calendar event reference. Never interpreted by the engine.
    pub calendar_event_ref: String,
}

/// Supplies meeting links and calendar references at session creation
/// time. The engine never generates or parses these.
pub trait CalendarIntegration: Send + Sync {
    /// Create a calendar event for a new session, if the integration is
    /// configured.
    fn create_event(&self, session: &Session) -> Option<CalendarEvent>;
}

/// A calendar integration that supplies nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCalendar;

impl CalendarIntegration for NoopCalendar {
    fn create_event(&self, _session: &Session) -> Option<CalendarEvent> {
        None
    }
}

// ─── Outcomes & errors ───────────────────────────────────────────────

/// Successful join result returned to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct EnrollmentConfirmation {
    /// The session joined.
    pub session_id: SessionId,
    /// The participant now holding a seat.
    pub participant_id: ParticipantId,
    /// Reference for the enrollment.
    pub confirmation: ConfirmationRef,
    /// Present when a best-effort collaborator failed after the seat was
    /// reserved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Failure of an admin scheduling request.
#[derive(Error, Debug)]
pub enum ScheduleError {
    /// Only admins create catalog records.
    #[error("role '{role}' may not schedule sessions")]
    NotPermitted {
        /// The caller's insufficient role.
        role: Role,
    },

    /// The submitted draft failed validation.
    #[error(transparent)]
    Invalid(#[from] EnrollError),
}

/// Failure of a cancellation request.
#[derive(Error, Debug)]
pub enum CancelRejection {
    /// Cancellation is an explicit admin/tutor action.
    #[error("role '{role}' may not cancel sessions")]
    NotPermitted {
        /// The caller's insufficient role.
        role: Role,
    },

    /// The catalog or lifecycle machine rejected the cancellation.
    #[error(transparent)]
    Catalog(#[from] CancelError),
}

// ─── Workflow ────────────────────────────────────────────────────────

/// Orchestrator composing the catalog, lifecycle machine, feature gate,
/// and external collaborators.
#[derive(Clone)]
pub struct EnrollmentWorkflow {
    catalog: MemoryCatalog,
    notifier: Arc<dyn Notifier>,
    calendar: Arc<dyn CalendarIntegration>,
}

impl EnrollmentWorkflow {
    /// Workflow over a catalog with no-op collaborators.
    pub fn new(catalog: MemoryCatalog) -> Self {
        Self {
            catalog,
            notifier: Arc::new(NoopNotifier),
            calendar: Arc::new(NoopCalendar),
        }
    }

    /// Workflow with explicit collaborator implementations.
    pub fn with_collaborators(
        catalog: MemoryCatalog,
        notifier: Arc<dyn Notifier>,
        calendar: Arc<dyn CalendarIntegration>,
    ) -> Self {
        Self {
            catalog,
            notifier,
            calendar,
        }
    }

    /// The underlying catalog.
    pub fn catalog(&self) -> &MemoryCatalog {
        &self.catalog
    }

    /// Join a session.
    ///
    /// Validation order: effective lifecycle state, feature gate, duplicate
    /// enrollment, seat capacity — all against one consistent snapshot.
    /// On success the notifier runs best-effort; its failure surfaces as a
    /// warning, never a rollback.
    pub fn join(
        &self,
        caller: &CallerIdentity,
        session_id: &SessionId,
        now: Timestamp,
    ) -> Result<EnrollmentConfirmation, EnrollError> {
        let enrollment = self
            .catalog
            .reserve_seat(session_id, &caller.id, now, |session| {
                let effective = effective_status_of(session, now);
                if effective != SessionStatus::Scheduled {
                    return Err(EnrollError::SessionNotJoinable {
                        session_id: session.id.clone(),
                        status: effective,
                    });
                }
                FeatureGate::check_access(caller, session.session_type)
            })
            .map_err(|e| self.observe(e))?;

        tracing::info!(
            session = %enrollment.session_id,
            participant = %enrollment.participant_id,
            "seat reserved"
        );

        let warning = self
            .notifier
            .notify_enrollment(session_id, &caller.id, EnrollmentOutcome::Joined)
            .err()
            .map(|e| {
                tracing::warn!(session = %session_id, error = %e, "enrollment notification failed");
                e.to_string()
            });

        Ok(EnrollmentConfirmation {
            session_id: enrollment.session_id,
            participant_id: enrollment.participant_id,
            confirmation: enrollment.confirmation,
            warning,
        })
    }

    /// Leave a session: verify the active enrollment exists, release the
    /// seat, remove the enrollment record.
    pub fn leave(
        &self,
        caller: &CallerIdentity,
        session_id: &SessionId,
    ) -> Result<(), EnrollError> {
        self.catalog
            .release_seat(session_id, &caller.id)
            .map_err(|e| self.observe(e))?;

        tracing::info!(session = %session_id, participant = %caller.id, "seat released");

        if let Err(e) =
            self.notifier
                .notify_enrollment(session_id, &caller.id, EnrollmentOutcome::Left)
        {
            tracing::warn!(session = %session_id, error = %e, "leave notification failed");
        }
        Ok(())
    }

    /// List sessions visible to the caller.
    ///
    /// An explicit query for a session type the caller cannot access is a
    /// structured `FeatureDisabled` error; otherwise inaccessible types are
    /// dropped from the result.
    pub fn list(
        &self,
        caller: &CallerIdentity,
        query: &AvailabilityQuery,
        now: Timestamp,
    ) -> Result<Vec<SessionView>, EnrollError> {
        if let Some(st) = query.session_type {
            FeatureGate::check_access(caller, st)?;
        }

        let sessions = self.catalog.list();
        let mut views = filter_sessions(&sessions, query, now);
        views.retain(|v| FeatureGate::can_access(caller, v.session.session_type));
        Ok(views)
    }

    /// A single session view, gated by session type.
    pub fn view(
        &self,
        caller: &CallerIdentity,
        session_id: &SessionId,
        now: Timestamp,
    ) -> Result<SessionView, EnrollError> {
        let session = self
            .catalog
            .get(session_id)
            .ok_or_else(|| EnrollError::SessionNotFound {
                session_id: session_id.clone(),
            })?;
        FeatureGate::check_access(caller, session.session_type)?;
        Ok(SessionView::of(session, now))
    }

    /// Create a session record (admin only) and attach calendar references
    /// from the integration, when configured.
    pub fn schedule(
        &self,
        caller: &CallerIdentity,
        draft: SessionDraft,
        now: Timestamp,
    ) -> Result<Session, ScheduleError> {
        if caller.role != Role::Admin {
            return Err(ScheduleError::NotPermitted { role: caller.role });
        }

        let mut session = Session::create(SessionId::new(), draft, now)?;
        if let Some(event) = self.calendar.create_event(&session) {
            session.meeting_link = Some(event.meeting_link);
            session.calendar_event_ref = Some(event.calendar_event_ref);
        }

        tracing::info!(session = %session.id, tutor = %session.tutor_id, "session scheduled");
        self.catalog.insert(session.clone());
        Ok(session)
    }

    /// Cancel a session (admin/tutor only), voiding its enrollments.
    pub fn cancel(
        &self,
        caller: &CallerIdentity,
        session_id: &SessionId,
        reason: String,
        now: Timestamp,
    ) -> Result<Session, CancelRejection> {
        if !caller.role.is_staff() {
            return Err(CancelRejection::NotPermitted { role: caller.role });
        }

        let evidence = CancellationEvidence {
            actor: format!("{}:{}", caller.role, caller.id),
            reason,
        };
        let session = self.catalog.cancel_session(session_id, evidence, now)?;
        tracing::info!(session = %session.id, "session cancelled");
        Ok(session)
    }

    /// Log invariant violations for operator attention; expected outcomes
    /// pass through untouched.
    fn observe(&self, err: EnrollError) -> EnrollError {
        if let EnrollError::InvalidCapacity {
            session_id,
            current,
            max,
        } = &err
        {
            tracing::warn!(
                session = %session_id,
                current,
                max,
                "capacity invariant violated; upstream data corruption"
            );
        }
        err
    }
}
