//! Preference store: the durable key-value surface and the typed record
//! store built on it.
//!
//! # Responsibility
//! - Define the synchronous key-value contract the core persists through.
//! - Provide typed load/save for record collections and scalar settings.
//!
//! # Invariants
//! - A completed write is visible to every later read, across restarts.
//! - Malformed stored payloads degrade to defaults instead of erroring.
//! - Multi-key writes through `put_many` are all-or-nothing.

pub mod keys;
pub mod kv_store;
pub mod record_store;
pub mod settings;
