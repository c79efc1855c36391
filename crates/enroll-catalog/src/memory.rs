//! # In-Memory Session Catalog
//!
//! Thread-safe, cloneable catalog holding session records and the
//! enrollment roster.
//!
//! ## Concurrency contract
//!
//! One `parking_lot::RwLock` guards the session map *and* the roster, so a
//! seat reservation is a single atomic read-validate-update: the caller's
//! precheck, the duplicate-enrollment guard, and the guarded seat increment
//! all observe the same snapshot. When N callers race for the last seat,
//! exactly one wins; the rest observe the updated count and fail with
//! `SessionFull`. All operations are synchronous and the lock is never held
//! across `.await` points; `parking_lot`'s lock is non-poisoning, so a
//! panicking writer does not permanently corrupt the catalog.
//!
//! Reads clone snapshots and may be stale by the time the caller looks at
//! them — that is acceptable for list views. The reservation-time checks
//! are the authoritative ones.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;

use enroll_core::{
    ConfirmationRef, EnrollError, Enrollment, ParticipantId, Session, SessionId, Timestamp,
};
use enroll_state::{cancel, CancellationEvidence, LifecycleError};

use crate::capacity::{SeatCount, SeatError};

/// Failure of an explicit cancellation through the catalog.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CancelError {
    /// Unknown session identifier.
    #[error("session {0} not found")]
    NotFound(SessionId),

    /// The lifecycle machine rejected the transition.
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
}

#[derive(Debug, Default)]
struct CatalogInner {
    sessions: HashMap<SessionId, Session>,
    /// Active enrollments per session. Guarded by the same lock as
    /// `sessions` so seat counts and roster entries can never diverge.
    roster: HashMap<SessionId, HashMap<ParticipantId, Enrollment>>,
}

/// Thread-safe in-memory session catalog with seat accounting.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    inner: Arc<RwLock<CatalogInner>>,
}

impl Clone for MemoryCatalog {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl MemoryCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a session record, returning the previous record if the
    /// identifier already existed.
    pub fn insert(&self, session: Session) -> Option<Session> {
        self.inner
            .write()
            .sessions
            .insert(session.id.clone(), session)
    }

    /// Retrieve a session snapshot by identifier.
    pub fn get(&self, id: &SessionId) -> Option<Session> {
        self.inner.read().sessions.get(id).cloned()
    }

    /// Snapshot of all session records.
    pub fn list(&self) -> Vec<Session> {
        self.inner.read().sessions.values().cloned().collect()
    }

    /// Number of session records.
    pub fn len(&self) -> usize {
        self.inner.read().sessions.len()
    }

    /// Whether the catalog holds no sessions.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Seats still open for a session.
    pub fn spots_remaining(&self, id: &SessionId) -> Result<u32, EnrollError> {
        let guard = self.inner.read();
        let session = guard
            .sessions
            .get(id)
            .ok_or_else(|| EnrollError::SessionNotFound {
                session_id: id.clone(),
            })?;
        Ok(session.spots_remaining())
    }

    /// Whether the participant holds an active enrollment in the session.
    pub fn is_enrolled(&self, id: &SessionId, participant: &ParticipantId) -> bool {
        self.inner
            .read()
            .roster
            .get(id)
            .is_some_and(|seats| seats.contains_key(participant))
    }

    /// All active enrollments held by a participant.
    pub fn enrollments_for(&self, participant: &ParticipantId) -> Vec<Enrollment> {
        self.inner
            .read()
            .roster
            .values()
            .filter_map(|seats| seats.get(participant).cloned())
            .collect()
    }

    /// Atomically reserve a seat for `participant`.
    ///
    /// Under the single write lock, in order:
    ///
    /// 1. resolve the session (`SessionNotFound`);
    /// 2. run the caller-supplied `precheck` against the current snapshot
    ///    (the workflow puts its lifecycle and feature-gate checks here);
    /// 3. reject duplicates (`AlreadyEnrolled`);
    /// 4. perform the guarded increment (`SessionFull` when exhausted,
    ///    `InvalidCapacity` if the stored counts are corrupt);
    /// 5. record the enrollment.
    ///
    /// No interleaving with concurrent reservations or cancellations can
    /// admit a join the precheck would have rejected.
    pub fn reserve_seat<F>(
        &self,
        id: &SessionId,
        participant: &ParticipantId,
        now: Timestamp,
        precheck: F,
    ) -> Result<Enrollment, EnrollError>
    where
        F: FnOnce(&Session) -> Result<(), EnrollError>,
    {
        let mut guard = self.inner.write();
        let inner = &mut *guard;

        let session = inner
            .sessions
            .get_mut(id)
            .ok_or_else(|| EnrollError::SessionNotFound {
                session_id: id.clone(),
            })?;

        precheck(session)?;

        let seats_held = inner.roster.entry(id.clone()).or_default();
        if seats_held.contains_key(participant) {
            return Err(EnrollError::AlreadyEnrolled {
                session_id: id.clone(),
                participant_id: participant.clone(),
            });
        }

        let mut seats = SeatCount::of(session);
        seats.reserve().map_err(|e| match e {
            SeatError::Full => EnrollError::SessionFull {
                session_id: id.clone(),
            },
            SeatError::NoneHeld | SeatError::Corrupt { .. } => EnrollError::InvalidCapacity {
                session_id: id.clone(),
                current: session.current_participants,
                max: session.max_participants,
            },
        })?;
        session.current_participants = seats.current;

        let enrollment = Enrollment {
            session_id: id.clone(),
            participant_id: participant.clone(),
            confirmation: ConfirmationRef::new(),
            enrolled_at: now,
        };
        seats_held.insert(participant.clone(), enrollment.clone());
        Ok(enrollment)
    }

    /// Atomically release the seat held by `participant`.
    ///
    /// `NotEnrolled` if no active enrollment exists — releasing twice yields
    /// one success and one `NotEnrolled`. A roster entry with a zero seat
    /// count indicates corruption and surfaces as `InvalidCapacity`.
    pub fn release_seat(
        &self,
        id: &SessionId,
        participant: &ParticipantId,
    ) -> Result<Session, EnrollError> {
        let mut guard = self.inner.write();
        let inner = &mut *guard;

        let session = inner
            .sessions
            .get_mut(id)
            .ok_or_else(|| EnrollError::SessionNotFound {
                session_id: id.clone(),
            })?;

        let held = inner
            .roster
            .get_mut(id)
            .is_some_and(|seats| seats.contains_key(participant));
        if !held {
            return Err(EnrollError::NotEnrolled {
                session_id: id.clone(),
                participant_id: participant.clone(),
            });
        }

        let mut seats = SeatCount::of(session);
        seats.release().map_err(|_| EnrollError::InvalidCapacity {
            session_id: id.clone(),
            current: session.current_participants,
            max: session.max_participants,
        })?;
        session.current_participants = seats.current;

        if let Some(seats_held) = inner.roster.get_mut(id) {
            seats_held.remove(participant);
        }
        Ok(session.clone())
    }

    /// Cancel a session and void its active enrollments.
    ///
    /// The lifecycle check and the roster purge run under the same write
    /// lock, so a racing join either completes before the cancellation (and
    /// is voided) or observes `CANCELLED` and is rejected.
    pub fn cancel_session(
        &self,
        id: &SessionId,
        evidence: CancellationEvidence,
        now: Timestamp,
    ) -> Result<Session, CancelError> {
        let mut guard = self.inner.write();
        let inner = &mut *guard;

        let session = inner
            .sessions
            .get_mut(id)
            .ok_or_else(|| CancelError::NotFound(id.clone()))?;

        cancel(session, evidence, now)?;
        inner.roster.remove(id);
        Ok(session.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use enroll_core::{CourseType, SessionDraft, SessionType, TutorId};

    fn ts(s: &str) -> Timestamp {
        Timestamp::parse(s).unwrap()
    }

    fn now() -> Timestamp {
        ts("2026-03-15T00:00:00Z")
    }

    fn make_session(max: u32) -> Session {
        let draft = SessionDraft {
            title: "PTE Reading Drill".to_string(),
            description: "Timed reading practice".to_string(),
            session_type: SessionType::SmartQuad,
            course_type: CourseType::new("PTE").unwrap(),
            start_time: ts("2026-03-20T10:00:00Z"),
            end_time: ts("2026-03-20T11:00:00Z"),
            max_participants: max,
            tutor_id: TutorId::new(),
            tutor_name: None,
        };
        Session::create(SessionId::new(), draft, now()).unwrap()
    }

    fn no_check(_: &Session) -> Result<(), EnrollError> {
        Ok(())
    }

    #[test]
    fn test_insert_get_list() {
        let catalog = MemoryCatalog::new();
        assert!(catalog.is_empty());
        let session = make_session(4);
        let id = session.id.clone();
        catalog.insert(session);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(&id).unwrap().id, id);
        assert!(catalog.get(&SessionId::new()).is_none());
    }

    #[test]
    fn test_reserve_and_release_roundtrip() {
        let catalog = MemoryCatalog::new();
        let session = make_session(4);
        let id = session.id.clone();
        catalog.insert(session);
        let participant = ParticipantId::new();

        let enrollment = catalog
            .reserve_seat(&id, &participant, now(), no_check)
            .unwrap();
        assert_eq!(enrollment.session_id, id);
        assert!(catalog.is_enrolled(&id, &participant));
        assert_eq!(catalog.spots_remaining(&id).unwrap(), 3);

        let session = catalog.release_seat(&id, &participant).unwrap();
        assert_eq!(session.current_participants, 0);
        assert!(!catalog.is_enrolled(&id, &participant));
    }

    #[test]
    fn test_reserve_unknown_session() {
        let catalog = MemoryCatalog::new();
        let result = catalog.reserve_seat(&SessionId::new(), &ParticipantId::new(), now(), no_check);
        assert!(matches!(result, Err(EnrollError::SessionNotFound { .. })));
    }

    #[test]
    fn test_duplicate_reservation_rejected() {
        let catalog = MemoryCatalog::new();
        let session = make_session(4);
        let id = session.id.clone();
        catalog.insert(session);
        let participant = ParticipantId::new();

        catalog
            .reserve_seat(&id, &participant, now(), no_check)
            .unwrap();
        let result = catalog.reserve_seat(&id, &participant, now(), no_check);
        assert!(matches!(result, Err(EnrollError::AlreadyEnrolled { .. })));
        // The failed attempt must not consume a seat.
        assert_eq!(catalog.spots_remaining(&id).unwrap(), 3);
    }

    #[test]
    fn test_full_session_rejects_reservation() {
        let catalog = MemoryCatalog::new();
        let session = make_session(2);
        let id = session.id.clone();
        catalog.insert(session);

        for _ in 0..2 {
            catalog
                .reserve_seat(&id, &ParticipantId::new(), now(), no_check)
                .unwrap();
        }
        let result = catalog.reserve_seat(&id, &ParticipantId::new(), now(), no_check);
        assert!(matches!(result, Err(EnrollError::SessionFull { .. })));
        assert_eq!(catalog.spots_remaining(&id).unwrap(), 0);
    }

    #[test]
    fn test_double_release_is_not_enrolled() {
        let catalog = MemoryCatalog::new();
        let session = make_session(4);
        let id = session.id.clone();
        catalog.insert(session);
        let participant = ParticipantId::new();

        catalog
            .reserve_seat(&id, &participant, now(), no_check)
            .unwrap();
        catalog.release_seat(&id, &participant).unwrap();
        let result = catalog.release_seat(&id, &participant);
        assert!(matches!(result, Err(EnrollError::NotEnrolled { .. })));
    }

    #[test]
    fn test_precheck_failure_reserves_nothing() {
        let catalog = MemoryCatalog::new();
        let session = make_session(4);
        let id = session.id.clone();
        catalog.insert(session);
        let participant = ParticipantId::new();

        let result = catalog.reserve_seat(&id, &participant, now(), |s| {
            Err(EnrollError::SessionNotJoinable {
                session_id: s.id.clone(),
                status: enroll_core::SessionStatus::Cancelled,
            })
        });
        assert!(matches!(result, Err(EnrollError::SessionNotJoinable { .. })));
        assert!(!catalog.is_enrolled(&id, &participant));
        assert_eq!(catalog.spots_remaining(&id).unwrap(), 4);
    }

    #[test]
    fn test_corrupt_counts_surface_invalid_capacity() {
        let catalog = MemoryCatalog::new();
        let mut session = make_session(4);
        session.current_participants = 9; // corruption injected upstream
        let id = session.id.clone();
        catalog.insert(session);

        let result = catalog.reserve_seat(&id, &ParticipantId::new(), now(), no_check);
        assert!(matches!(
            result,
            Err(EnrollError::InvalidCapacity {
                current: 9,
                max: 4,
                ..
            })
        ));
    }

    #[test]
    fn test_cancel_voids_enrollments() {
        let catalog = MemoryCatalog::new();
        let session = make_session(4);
        let id = session.id.clone();
        catalog.insert(session);
        let participant = ParticipantId::new();
        catalog
            .reserve_seat(&id, &participant, now(), no_check)
            .unwrap();

        let evidence = CancellationEvidence {
            actor: "admin:test".to_string(),
            reason: "venue conflict".to_string(),
        };
        let cancelled = catalog.cancel_session(&id, evidence, now()).unwrap();
        assert_eq!(cancelled.status, enroll_core::SessionStatus::Cancelled);

        // The enrollment is implicitly voided; leave now reports NotEnrolled.
        assert!(!catalog.is_enrolled(&id, &participant));
        let result = catalog.release_seat(&id, &participant);
        assert!(matches!(result, Err(EnrollError::NotEnrolled { .. })));
    }

    #[test]
    fn test_cancel_unknown_session() {
        let catalog = MemoryCatalog::new();
        let evidence = CancellationEvidence {
            actor: "admin:test".to_string(),
            reason: "noop".to_string(),
        };
        let result = catalog.cancel_session(&SessionId::new(), evidence, now());
        assert!(matches!(result, Err(CancelError::NotFound(_))));
    }

    #[test]
    fn test_enrollments_for_participant() {
        let catalog = MemoryCatalog::new();
        let a = make_session(4);
        let b = make_session(4);
        let (id_a, id_b) = (a.id.clone(), b.id.clone());
        catalog.insert(a);
        catalog.insert(b);
        let participant = ParticipantId::new();

        catalog
            .reserve_seat(&id_a, &participant, now(), no_check)
            .unwrap();
        catalog
            .reserve_seat(&id_b, &participant, now(), no_check)
            .unwrap();
        assert_eq!(catalog.enrollments_for(&participant).len(), 2);
    }
}
