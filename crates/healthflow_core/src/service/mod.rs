//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store reads, pure policies, and store writes into
//!   use-case level APIs for the UI layer.
//! - Keep UI/FFI layers decoupled from storage details.
//!
//! # Invariants
//! - Services receive their store handle explicitly; there is no ambient
//!   global store.
//! - Every mutation writes back a complete, replaced collection.

pub mod credential;
pub mod habit_service;
pub mod mood_service;
pub mod reminder_service;
pub mod session_service;
pub mod step_service;
pub mod summary_service;
