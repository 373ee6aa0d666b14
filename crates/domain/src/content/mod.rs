//! Static content registries
//!
//! Immutable tables keyed by string id, built once on first access. Content
//! is data, not behaviour: each entry is a flat record and lookups that miss
//! return `None` so callers can degrade gracefully.

mod behaviors;
mod chapters;
mod enemies;
mod items;
mod loot_tables;
mod skills;

pub use behaviors::behavior_profile;
pub use chapters::{chapter_template, chapter_templates, FALLBACK_CHAPTER_ID};
pub use enemies::{enemy_template, enemy_templates};
pub use items::{humanize_id, item_template, material_fallback};
pub use loot_tables::loot_table;
pub use skills::{skill_effect, BuffSkill, SkillEffect};
