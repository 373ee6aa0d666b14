//! Use cases - the engine's components.
//!
//! Combat (with its enemy AI), loot generation and narrative pacing. Each is
//! synchronous and owns its in-memory state; the HTTP layer only forwards.

pub mod combat;
pub mod loot;
pub mod narrative;

pub use combat::{CombatEngine, CombatError};
pub use loot::LootEngine;
pub use narrative::{NarrativeError, NarrativeManager, NarrativeSessions};
