//! # Temporal Types — UTC-Only Timestamps
//!
//! Defines `Timestamp`, a UTC-only timestamp type truncated to seconds
//! precision, rendered as ISO8601 with a `Z` suffix.
//!
//! ## Invariant
//!
//! All schedule times in the engine are UTC. Local timezone offsets would
//! make the availability windows (`today`, `this_week`) ambiguous across
//! replicas and break deterministic listing order. Non-UTC inputs are
//! **rejected at parse time** — there is no silent conversion.

use chrono::{DateTime, Duration, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::EnrollError;

/// A UTC-only timestamp, truncated to seconds precision.
///
/// # Construction
///
/// - [`Timestamp::now()`] — current UTC time, truncated.
/// - [`Timestamp::from_utc()`] — from a `DateTime<Utc>`, truncating sub-seconds.
/// - [`Timestamp::parse()`] — from an ISO8601 string, rejecting non-UTC offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a timestamp from the current UTC time, truncated to seconds.
    pub fn now() -> Self {
        Self(truncate_to_seconds(Utc::now()))
    }

    /// Create a timestamp from a `chrono::DateTime<Utc>`, truncating sub-seconds.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(truncate_to_seconds(dt))
    }

    /// Parse a timestamp from an RFC 3339 / ISO8601 string.
    ///
    /// **Rejects non-UTC inputs.** Only timestamps with the `Z` suffix are
    /// accepted — even `+00:00`, which is semantically equivalent, is
    /// rejected so that every stored schedule time has exactly one textual
    /// form.
    ///
    /// # Errors
    ///
    /// Returns [`EnrollError::InvalidSession`] if the string is not valid
    /// RFC 3339 or uses a non-Z offset.
    pub fn parse(s: &str) -> Result<Self, EnrollError> {
        if !s.ends_with('Z') {
            return Err(EnrollError::InvalidSession {
                reason: format!("timestamp must use Z suffix (UTC only), got: {s:?}"),
            });
        }

        let dt = DateTime::parse_from_rfc3339(s).map_err(|e| EnrollError::InvalidSession {
            reason: format!("invalid RFC 3339 timestamp {s:?}: {e}"),
        })?;

        Ok(Self(truncate_to_seconds(dt.with_timezone(&Utc))))
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// The Unix epoch timestamp in seconds.
    pub fn epoch_secs(&self) -> i64 {
        self.0.timestamp()
    }

    /// Midnight (00:00:00 UTC) of the day this timestamp falls on.
    ///
    /// Anchor for the `today` / `this_week` availability windows.
    pub fn midnight(&self) -> Self {
        let date = self.0.date_naive();
        // midnight always exists for a valid date
        let dt = date
            .and_hms_opt(0, 0, 0)
            .unwrap_or(self.0.naive_utc())
            .and_utc();
        Self(dt)
    }

    /// This timestamp shifted by a signed duration.
    pub fn offset(&self, delta: Duration) -> Self {
        Self(truncate_to_seconds(self.0 + delta))
    }

    /// Signed duration from `earlier` to `self`.
    pub fn since(&self, earlier: &Timestamp) -> Duration {
        self.0 - earlier.0
    }

    /// Render as ISO8601 with Z suffix (e.g., `2026-03-15T12:00:00Z`).
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

/// Truncate a `DateTime<Utc>` to seconds precision (discard nanoseconds).
fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_now_has_no_subseconds() {
        let ts = Timestamp::now();
        assert_eq!(ts.as_datetime().nanosecond(), 0);
    }

    #[test]
    fn test_from_utc_truncates() {
        let dt = Utc.with_ymd_and_hms(2026, 3, 15, 12, 30, 45).unwrap();
        let with_nanos = dt.with_nanosecond(123_456_789).unwrap();
        let ts = Timestamp::from_utc(with_nanos);
        assert_eq!(ts.to_iso8601(), "2026-03-15T12:30:45Z");
    }

    #[test]
    fn test_parse_z_suffix_accepted() {
        let ts = Timestamp::parse("2026-03-15T12:00:00Z").unwrap();
        assert_eq!(ts.to_iso8601(), "2026-03-15T12:00:00Z");
    }

    #[test]
    fn test_parse_offsets_rejected() {
        assert!(Timestamp::parse("2026-03-15T12:00:00+00:00").is_err());
        assert!(Timestamp::parse("2026-03-15T17:00:00+05:00").is_err());
        assert!(Timestamp::parse("2026-03-15T08:00:00-04:00").is_err());
    }

    #[test]
    fn test_parse_invalid_format() {
        assert!(Timestamp::parse("not-a-date").is_err());
        assert!(Timestamp::parse("2026-03-15").is_err());
        assert!(Timestamp::parse("").is_err());
    }

    #[test]
    fn test_midnight_floors_to_day_start() {
        let ts = Timestamp::parse("2026-03-15T18:45:12Z").unwrap();
        assert_eq!(ts.midnight().to_iso8601(), "2026-03-15T00:00:00Z");
    }

    #[test]
    fn test_midnight_is_idempotent() {
        let ts = Timestamp::parse("2026-03-15T18:45:12Z").unwrap();
        assert_eq!(ts.midnight().midnight(), ts.midnight());
    }

    #[test]
    fn test_offset_and_since() {
        let ts = Timestamp::parse("2026-03-15T12:00:00Z").unwrap();
        let later = ts.offset(Duration::hours(24));
        assert_eq!(later.to_iso8601(), "2026-03-16T12:00:00Z");
        assert_eq!(later.since(&ts), Duration::hours(24));
    }

    #[test]
    fn test_ordering() {
        let earlier = Timestamp::parse("2026-03-15T12:00:00Z").unwrap();
        let later = Timestamp::parse("2026-03-15T12:00:01Z").unwrap();
        assert!(earlier < later);
    }

    #[test]
    fn test_serde_roundtrip() {
        let ts = Timestamp::parse("2026-03-15T12:00:00Z").unwrap();
        let json = serde_json::to_string(&ts).unwrap();
        let parsed: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(ts, parsed);
    }
}
