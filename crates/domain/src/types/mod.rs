//! # Lorekeep Domain Types
//!
//! Shared vocabulary types that form the innermost layer of the domain.
//!
//! ## Design Principles
//!
//! 1. **Pure data types** - No I/O, no randomness, no side effects
//! 2. **Closed sets** - Every kind the engine dispatches on is an enum
//! 3. **Serializable** - All types derive Serialize/Deserialize

// Combat vocabulary
mod combat;
pub use combat::{BehaviorType, CombatPhase, ItemType, Rarity};

// Narrative pacing vocabulary
mod narrative;
pub use narrative::{
    clamp_tension, ChapterOutcome, ChapterType, HookType, NarrativePhase, ProgressRange,
    TensionBand, ThreadImportance, ThreadStatus, Urgency,
};
