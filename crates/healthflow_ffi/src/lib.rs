//! Flutter-facing FFI crate for HealthFlow.

pub mod api;
