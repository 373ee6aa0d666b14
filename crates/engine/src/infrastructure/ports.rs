//! Port traits for infrastructure boundaries.
//!
//! The core has no I/O, so the only ports are time and randomness. Every
//! roll the engine makes (hit, crit, flee, AI decisions, loot, template
//! selection) flows through [`RandomPort`] so tests can script it.

use chrono::{DateTime, Utc};
use uuid::Uuid;

// =============================================================================
// Testability Ports
// =============================================================================

#[cfg_attr(test, mockall::automock)]
pub trait ClockPort: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[cfg_attr(test, mockall::automock)]
pub trait RandomPort: Send + Sync {
    /// Uniform float in `[0, 1)`.
    fn gen_float(&self) -> f64;
    /// Uniform integer in `[min, max]` (inclusive).
    fn gen_range(&self, min: i32, max: i32) -> i32;
    fn gen_uuid(&self) -> Uuid;
}
