//! # enroll-catalog — Session Catalog & Capacity Ledger
//!
//! The single source of truth for seat accounting. Holds session records
//! and the enrollment roster in memory under one writer lock, exposing
//! atomic seat reservation/release so that two concurrent joins can never
//! both win the last seat.
//!
//! The catalog is deliberately storage-agnostic at the API level: every
//! mutation is an atomic read-validate-update, the same shape a SQL
//! implementation would give via a row-level lock or a conditional
//! `UPDATE ... SET current = current + 1 WHERE current < max`.

pub mod capacity;
pub mod memory;

pub use capacity::{SeatCount, SeatError};
pub use memory::{CancelError, MemoryCatalog};
