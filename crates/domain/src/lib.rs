//! # Lorekeep Domain
//!
//! Combat and narrative vocabulary for the lorekeep engine: entities, value
//! objects, domain events, and the static content registries (enemies, items,
//! loot tables, behaviours, skills, chapter templates).
//!
//! The crate is pure. It performs no I/O and rolls no dice; every random
//! decision is made by the engine through its `RandomPort`.

extern crate self as lorekeep_domain;

pub mod types;

pub mod content;
pub mod entities;
pub mod error;
pub mod events;
pub mod ids;
pub mod value_objects;

// Re-export all entities (explicit list in entities/mod.rs)
pub use entities::{
    interpolate, BehaviorProfile, Chapter, ChapterRequirements, ChapterTemplate, CharacterRecord,
    ClimaxConfig, CombatLogEntry, CombatSession, Combatant, ComplicationConfig,
    ComplicationTrigger, EnemyTemplate, HookConfig, HookSpec, Impact, ItemTemplate, LootDrop,
    LootOptions, LootResult, LootTable, LootedItem, NarrativeEventType, NarrativeHook,
    NarrativeLogEntry, NarrativeState, NarrativeThread, PlayerContext, Range, ResolutionConfig,
    RewardSpec, ThreadSpec,
};

pub use error::DomainError;
pub use events::{ChapterCompletion, CombatOutcome, CombatResult, NarrativeDomainEvent};

// Re-export ID types
pub use ids::{
    ChapterId, CombatId, HookId, ItemInstanceId, NarrativeLogId, NarrativeSessionId,
    StatusEffectId, ThreadId,
};

// Re-export value objects (explicit list in value_objects/mod.rs)
pub use value_objects::{
    ActionResult, Attributes, CombatAction, CombatActionType, Intention, IntentionType, Stat,
    StatusEffect, StatusEffectType,
};

// Re-export vocabulary types
pub use types::{
    clamp_tension, BehaviorType, ChapterOutcome, ChapterType, CombatPhase, HookType, ItemType,
    NarrativePhase, ProgressRange, Rarity, TensionBand, ThreadImportance, ThreadStatus, Urgency,
};
