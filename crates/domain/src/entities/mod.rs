//! Domain entities - Core business objects with identity

mod behavior_profile;
mod chapter_template;
mod character;
mod combat_session;
mod combatant;
mod enemy_template;
mod item;
mod loot_table;
mod narrative_state;

pub use behavior_profile::BehaviorProfile;
pub use chapter_template::{
    interpolate, ChapterRequirements, ChapterTemplate, ClimaxConfig, ComplicationConfig,
    ComplicationTrigger, HookConfig, HookSpec, PlayerContext, ResolutionConfig, RewardSpec,
    ThreadSpec,
};
pub use character::CharacterRecord;
pub use combat_session::{CombatLogEntry, CombatSession};
pub use combatant::Combatant;
pub use enemy_template::EnemyTemplate;
pub use item::{ItemTemplate, LootedItem};
pub use loot_table::{LootDrop, LootOptions, LootResult, LootTable, Range};
pub use narrative_state::{
    Chapter, Impact, NarrativeEventType, NarrativeHook, NarrativeLogEntry, NarrativeState,
    NarrativeThread,
};
