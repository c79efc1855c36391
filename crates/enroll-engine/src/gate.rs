//! # Feature Gate
//!
//! Authorization-by-capability, independent of authentication. The source
//! platform gated session types with per-role conditional rendering only;
//! here the check sits in front of the data-mutation boundary, so a caller
//! who bypasses the UI still cannot join a gated session type.
//!
//! Denial is non-fatal and structured: callers without access receive
//! `FeatureDisabled`, never a silent empty list, so the UI can distinguish
//! "no access" from "no sessions".

use enroll_core::{CallerIdentity, EnrollError, FeatureKey, SessionType};

/// Capability check mapping session types to per-student feature flags.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureGate;

impl FeatureGate {
    /// Whether the caller may see/join the given session type.
    ///
    /// Admins and tutors always pass; students pass iff the mapped feature
    /// key is in their enabled set.
    pub fn can_access(caller: &CallerIdentity, session_type: SessionType) -> bool {
        caller.role.is_staff() || caller.has_feature(FeatureKey::for_session_type(session_type))
    }

    /// Check access, returning a structured denial.
    pub fn check_access(
        caller: &CallerIdentity,
        session_type: SessionType,
    ) -> Result<(), EnrollError> {
        if Self::can_access(caller, session_type) {
            Ok(())
        } else {
            Err(EnrollError::FeatureDisabled {
                feature: FeatureKey::for_session_type(session_type),
            })
        }
    }

    /// The session types visible to the caller.
    pub fn accessible_types(caller: &CallerIdentity) -> Vec<SessionType> {
        SessionType::ALL
            .into_iter()
            .filter(|st| Self::can_access(caller, *st))
            .collect()
    }
}
