//! Pure decision logic.
//!
//! # Responsibility
//! - Compute derived values and decisions from caller-supplied snapshots.
//!
//! # Invariants
//! - Nothing in this module reads or writes the preference store.
//! - Every function is deterministic for its inputs (time is a parameter).

pub mod daily_reset;
pub mod metrics;
pub mod notifications;
pub mod reminder;
pub mod session;
