//! Value objects - Immutable objects defined by their attributes

mod combat_action;
mod intention;
mod stat;
mod status_effect;

pub use combat_action::{ActionResult, CombatAction, CombatActionType};
pub use intention::{Intention, IntentionType};
pub use stat::{Attributes, Stat};
pub use status_effect::{StatusEffect, StatusEffectType};
