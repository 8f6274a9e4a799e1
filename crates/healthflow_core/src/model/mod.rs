//! Wellness record models.
//!
//! # Responsibility
//! - Define the value records persisted by the preference store.
//! - Keep the stored JSON shape compatible with existing device data.
//!
//! # Invariants
//! - Records are immutable values; edits produce a new record with the same id.
//! - Field names serialize as camelCase.

pub mod habit;
pub mod mood;
pub mod notification;
pub mod profile;
