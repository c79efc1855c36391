//! # enroll-core — Foundational Types for the Enrollment Engine
//!
//! This crate is the bedrock of the session enrollment stack. It defines the
//! domain primitives every other crate builds on; it depends on nothing
//! internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** `SessionId`,
//!    `ParticipantId`, `TutorId`, `ConfirmationRef` — all UUID newtypes.
//!    No bare identifiers in signatures.
//!
//! 2. **UTC-only timestamps.** The `Timestamp` type enforces UTC with Z
//!    suffix and seconds precision, so availability windows and listing
//!    order are deterministic across replicas.
//!
//! 3. **Validated construction.** `Session::create` owns every data-model
//!    invariant (`end > start`, per-type capacity bounds); callers can never
//!    set `current_participants` or `status` directly.
//!
//! 4. **Typed outcomes.** Every expected failure is an `EnrollError`
//!    variant with structured fields. Nothing in this stack signals an
//!    expected outcome by panicking.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `enroll-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public types derive `Debug`, `Clone`, and implement
//!   `Serialize`/`Deserialize` where they cross a boundary.

pub mod caller;
pub mod error;
pub mod identity;
pub mod session;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use caller::{CallerIdentity, FeatureKey, Role};
pub use error::EnrollError;
pub use identity::{ConfirmationRef, ParticipantId, SessionId, TutorId};
pub use session::{
    CourseType, Enrollment, Session, SessionDraft, SessionStatus, SessionType, StatusTransition,
};
pub use temporal::Timestamp;
