//! Infrastructure implementations.
//!
//! Port traits and their production/test implementations.

pub mod clock;
pub mod ports;
