//! # Seat Accounting
//!
//! Pure seat arithmetic for a single session: guarded increment on
//! reservation, guarded decrement on release, and the capacity invariant
//! `0 <= current <= max` checked on every operation.
//!
//! This type carries no locking of its own — the catalog performs every
//! mutation under its writer lock, so a `SeatCount` is only ever read and
//! written inside one critical section.

use thiserror::Error;

use enroll_core::Session;

/// Seat-level failure, mapped to the enrollment error taxonomy by the
/// catalog (which knows the session identifier).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatError {
    /// `current == max`; no seat to reserve.
    #[error("no seats remaining")]
    Full,
    /// `current == 0`; no seat to release.
    #[error("no seats held")]
    NoneHeld,
    /// The stored counts violate `0 < max` or `current <= max`.
    #[error("corrupt seat counts: {current}/{max}")]
    Corrupt {
        /// Stored current participant count.
        current: u32,
        /// Stored maximum participant count.
        max: u32,
    },
}

/// Participant count against a maximum for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeatCount {
    /// Seats currently held.
    pub current: u32,
    /// Seat capacity.
    pub max: u32,
}

impl SeatCount {
    /// Seat counts of a session record.
    pub fn of(session: &Session) -> Self {
        Self {
            current: session.current_participants,
            max: session.max_participants,
        }
    }

    /// Check the capacity invariant.
    pub fn check(&self) -> Result<(), SeatError> {
        if self.max == 0 || self.current > self.max {
            return Err(SeatError::Corrupt {
                current: self.current,
                max: self.max,
            });
        }
        Ok(())
    }

    /// Reserve one seat: increments `current` only if `current < max`.
    pub fn reserve(&mut self) -> Result<(), SeatError> {
        self.check()?;
        if self.current >= self.max {
            return Err(SeatError::Full);
        }
        self.current += 1;
        Ok(())
    }

    /// Release one seat: decrements `current`, which can never go below 0.
    pub fn release(&mut self) -> Result<(), SeatError> {
        self.check()?;
        if self.current == 0 {
            return Err(SeatError::NoneHeld);
        }
        self.current -= 1;
        Ok(())
    }

    /// Seats still open.
    pub fn remaining(&self) -> u32 {
        self.max.saturating_sub(self.current)
    }
}
