//! # Caller Identity, Roles, and Feature Keys
//!
//! The engine does not authenticate anyone. An external identity provider
//! supplies a [`CallerIdentity`] per request; the engine only interprets the
//! role and the enabled-feature set. Feature flags are per-student boolean
//! capabilities, mutated only by admin action elsewhere in the platform.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::identity::ParticipantId;
use crate::session::SessionType;

// ── Role ────────────────────────────────────────────────────────────

/// Roles in the tutoring platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Joins sessions, subject to feature gating.
    Student,
    /// Runs sessions; may cancel their own and sees all session types.
    Tutor,
    /// Full access, including admin listings and session management.
    Admin,
}

impl Role {
    /// Return the string representation of this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Tutor => "tutor",
            Self::Admin => "admin",
        }
    }

    /// Parse a role from its string representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "student" => Some(Self::Student),
            "tutor" => Some(Self::Tutor),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    /// Whether this role is platform staff (tutor or admin).
    ///
    /// Staff bypass feature gating and may cancel sessions.
    pub fn is_staff(&self) -> bool {
        matches!(self, Self::Tutor | Self::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── FeatureKey ──────────────────────────────────────────────────────

/// Symbolic feature names controlling session-type visibility per student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKey {
    /// Access to individual tutoring sessions.
    OneToOne,
    /// Access to small-group "Smart Quad" sessions.
    SmartQuad,
    /// Access to large-group masterclasses.
    Masterclass,
}

impl FeatureKey {
    /// Return the string representation of this feature key.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneToOne => "one_to_one",
            Self::SmartQuad => "smart_quad",
            Self::Masterclass => "masterclass",
        }
    }

    /// Parse a feature key from its string representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "one_to_one" => Some(Self::OneToOne),
            "smart_quad" => Some(Self::SmartQuad),
            "masterclass" => Some(Self::Masterclass),
            _ => None,
        }
    }

    /// The feature key gating a given session type.
    pub fn for_session_type(session_type: SessionType) -> Self {
        match session_type {
            SessionType::OneToOne => Self::OneToOne,
            SessionType::SmartQuad => Self::SmartQuad,
            SessionType::Masterclass => Self::Masterclass,
        }
    }
}

impl std::fmt::Display for FeatureKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── CallerIdentity ──────────────────────────────────────────────────

/// Identity of the caller, supplied per request by the external
/// identity/role provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerIdentity {
    /// The caller's participant identifier.
    pub id: ParticipantId,
    /// The caller's role.
    pub role: Role,
    /// Feature keys enabled for this caller. Only consulted for students;
    /// staff see every session type.
    pub enabled_features: HashSet<FeatureKey>,
}

impl CallerIdentity {
    /// A student caller with the given enabled features.
    pub fn student(id: ParticipantId, enabled_features: HashSet<FeatureKey>) -> Self {
        Self {
            id,
            role: Role::Student,
            enabled_features,
        }
    }

    /// A staff caller (tutor or admin); the feature set is irrelevant.
    pub fn staff(id: ParticipantId, role: Role) -> Self {
        Self {
            id,
            role,
            enabled_features: HashSet::new(),
        }
    }

    /// Whether the given feature is enabled for this caller.
    pub fn has_feature(&self, key: FeatureKey) -> bool {
        self.enabled_features.contains(&key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_roundtrip() {
        for role in [Role::Student, Role::Tutor, Role::Admin] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("superuser"), None);
    }

    #[test]
    fn test_staff_roles() {
        assert!(!Role::Student.is_staff());
        assert!(Role::Tutor.is_staff());
        assert!(Role::Admin.is_staff());
    }

    #[test]
    fn test_feature_key_mapping_is_total() {
        assert_eq!(
            FeatureKey::for_session_type(SessionType::SmartQuad),
            FeatureKey::SmartQuad
        );
        assert_eq!(
            FeatureKey::for_session_type(SessionType::Masterclass),
            FeatureKey::Masterclass
        );
        assert_eq!(
            FeatureKey::for_session_type(SessionType::OneToOne),
            FeatureKey::OneToOne
        );
    }

    #[test]
    fn test_feature_key_parse_roundtrip() {
        for key in [FeatureKey::OneToOne, FeatureKey::SmartQuad, FeatureKey::Masterclass] {
            assert_eq!(FeatureKey::parse(key.as_str()), Some(key));
        }
        assert_eq!(FeatureKey::parse("group_class"), None);
    }

    #[test]
    fn test_has_feature() {
        let mut features = HashSet::new();
        features.insert(FeatureKey::SmartQuad);
        let caller = CallerIdentity::student(ParticipantId::new(), features);
        assert!(caller.has_feature(FeatureKey::SmartQuad));
        assert!(!caller.has_feature(FeatureKey::Masterclass));
    }
}
