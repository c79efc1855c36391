//! # Availability Filter
//!
//! Pure function from `(sessions, query, now)` to a display-ready ordered
//! sequence of session views. The source platform duplicated this logic
//! across every listing page; here it exists exactly once, parameterized
//! by the query.
//!
//! ## Semantics
//!
//! - `today` = `[midnight_utc(now), +24h)`, `this_week` = `[midnight_utc(now), +7d)`;
//!   inclusive start, exclusive end, applied to `start_time`.
//! - Free text matches case-insensitively against title, description, and
//!   tutor name where present. All non-empty filters AND together.
//! - `AVAILABLE` mode keeps only effectively `SCHEDULED` sessions with open
//!   seats; `ADMIN` mode keeps everything, including full and closed
//!   sessions.
//! - Ordering: ascending `start_time`, ties broken by `id` so pagination
//!   and tests are deterministic.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use enroll_core::{CourseType, Session, SessionStatus, SessionType, Timestamp};
use enroll_state::effective_status_of;

// ─── Query ───────────────────────────────────────────────────────────

/// Time window applied to `start_time`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeWindow {
    /// No time constraint.
    #[default]
    All,
    /// `[midnight_utc(now), midnight_utc(now) + 24h)`.
    Today,
    /// `[midnight_utc(now), midnight_utc(now) + 7d)`.
    ThisWeek,
}

impl TimeWindow {
    /// Parse a window from its query-parameter token.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "all" => Some(Self::All),
            "today" => Some(Self::Today),
            "this_week" => Some(Self::ThisWeek),
            _ => None,
        }
    }

    /// Whether `start` falls inside this window anchored at `now`.
    fn contains(&self, start: Timestamp, now: Timestamp) -> bool {
        let lower = now.midnight();
        let upper = match self {
            Self::All => return true,
            Self::Today => lower.offset(Duration::hours(24)),
            Self::ThisWeek => lower.offset(Duration::days(7)),
        };
        start >= lower && start < upper
    }
}

/// Which sessions a listing exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingMode {
    /// Joinable sessions only: effective `SCHEDULED` with open seats.
    #[default]
    Available,
    /// Everything, including full, ongoing, completed, and cancelled
    /// sessions. For admin views.
    Admin,
}

impl ListingMode {
    /// Parse a mode from its query-parameter token.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "available" => Some(Self::Available),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }
}

/// A listing query. Empty/absent fields do not constrain the result;
/// present fields are combined with logical AND.
#[derive(Debug, Clone, Default)]
pub struct AvailabilityQuery {
    /// Time window on `start_time`.
    pub time_window: TimeWindow,
    /// Restrict to one subject track.
    pub course_type: Option<CourseType>,
    /// Restrict to one session type.
    pub session_type: Option<SessionType>,
    /// Case-insensitive substring over title, description, tutor name.
    pub search_text: Option<String>,
    /// Availability vs. admin listing.
    pub mode: ListingMode,
}

// ─── Derived view ────────────────────────────────────────────────────

/// Time until a session starts, bucketed for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartCountdown {
    /// The start time is now or in the past.
    StartingNow,
    /// Starts within the hour.
    Minutes(i64),
    /// Starts within the day.
    Hours(i64),
    /// Starts in a day or more.
    Days(i64),
}

impl StartCountdown {
    /// Bucket the duration from `now` to `start`.
    ///
    /// Non-positive durations map to "starting now" rather than a negative
    /// countdown.
    pub fn between(now: Timestamp, start: Timestamp) -> Self {
        let delta = start.since(&now);
        if delta <= Duration::zero() {
            Self::StartingNow
        } else if delta < Duration::hours(1) {
            Self::Minutes(delta.num_minutes().max(1))
        } else if delta < Duration::days(1) {
            Self::Hours(delta.num_hours())
        } else {
            Self::Days(delta.num_days())
        }
    }
}

impl std::fmt::Display for StartCountdown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StartingNow => f.write_str("starting now"),
            Self::Minutes(1) => f.write_str("in 1 minute"),
            Self::Minutes(n) => write!(f, "in {n} minutes"),
            Self::Hours(1) => f.write_str("in 1 hour"),
            Self::Hours(n) => write!(f, "in {n} hours"),
            Self::Days(1) => f.write_str("in 1 day"),
            Self::Days(n) => write!(f, "in {n} days"),
        }
    }
}

impl Serialize for StartCountdown {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A session with its presentation-only derived fields.
///
/// Derived fields are computed per query and never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    /// The underlying session record.
    #[serde(flatten)]
    pub session: Session,
    /// Lifecycle state computed from the clock, as opposed to the stored
    /// status field.
    pub effective_status: SessionStatus,
    /// Seats still open.
    pub spots_remaining: u32,
    /// Fraction of capacity in use, `0.0..=1.0`.
    pub fill_percentage: f64,
    /// Bucketed time until start.
    pub starts_in: StartCountdown,
}

impl SessionView {
    /// Compute the view of a session at `now`.
    pub fn of(session: Session, now: Timestamp) -> Self {
        let effective_status = effective_status_of(&session, now);
        let spots_remaining = session.spots_remaining();
        let fill_percentage = session.fill_percentage();
        let starts_in = StartCountdown::between(now, session.start_time);
        Self {
            session,
            effective_status,
            spots_remaining,
            fill_percentage,
            starts_in,
        }
    }
}

// ─── Filter ──────────────────────────────────────────────────────────

/// Filter, order, and decorate a catalog snapshot for display.
pub fn filter_sessions(
    sessions: &[Session],
    query: &AvailabilityQuery,
    now: Timestamp,
) -> Vec<SessionView> {
    let needle = query
        .search_text
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    let mut matched: Vec<&Session> = sessions
        .iter()
        .filter(|s| query.time_window.contains(s.start_time, now))
        .filter(|s| {
            query
                .course_type
                .as_ref()
                .map_or(true, |ct| s.course_type == *ct)
        })
        .filter(|s| query.session_type.map_or(true, |st| s.session_type == st))
        .filter(|s| needle.as_deref().map_or(true, |n| matches_text(s, n)))
        .collect();

    matched.sort_by(|a, b| {
        a.start_time
            .cmp(&b.start_time)
            .then_with(|| a.id.cmp(&b.id))
    });

    matched
        .into_iter()
        .map(|s| SessionView::of(s.clone(), now))
        .filter(|view| match query.mode {
            ListingMode::Admin => true,
            ListingMode::Available => {
                view.effective_status == SessionStatus::Scheduled && view.spots_remaining > 0
            }
        })
        .collect()
}

/// Case-insensitive substring match over the session's display text.
fn matches_text(session: &Session, needle: &str) -> bool {
    session.title.to_lowercase().contains(needle)
        || session.description.to_lowercase().contains(needle)
        || session
            .tutor_name
            .as_deref()
            .is_some_and(|name| name.to_lowercase().contains(needle))
}

// ─── Tests ───────────────────────────────────────────────────────────
