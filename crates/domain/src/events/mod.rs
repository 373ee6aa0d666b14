//! Domain Events
//!
//! Return types and notifications describing significant state changes:
//! finished combats and narrative pacing changes. Callers dispatch them;
//! the domain never delivers them itself.

pub mod combat_events;
pub mod narrative_events;

pub use combat_events::*;
pub use narrative_events::*;
