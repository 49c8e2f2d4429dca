//! Session telemetry for the counting game.
//!
//! # SAFETY INVARIANT
//! Telemetry is a READ-ONLY side-effect layer.
//! It must **NEVER** be read inside sequencing decisions.
//! It exists solely for observability and verification.

pub mod event;
pub mod metrics;
pub mod recorder;
