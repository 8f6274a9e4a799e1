//! Sensor callback processing for step counting and shake gestures.
//!
//! Detectors are plain state machines fed one sample at a time by the host's
//! sensor callbacks. They never touch storage.

pub mod motion;
