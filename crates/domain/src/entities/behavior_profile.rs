//! Enemy AI behaviour profiles.

use serde::{Deserialize, Serialize};

use crate::types::BehaviorType;

/// How an enemy template behaves in combat.
///
/// Chances are probabilities in `[0, 1]`; `low_hp_threshold` is a fraction
/// of max hp at or below which the low-hp rules kick in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BehaviorProfile {
    pub behavior_type: BehaviorType,
    pub low_hp_threshold: f64,
    pub flee_chance: f64,
    pub defend_chance: f64,
    pub skills: Vec<String>,
    pub skill_use_chance: f64,
}

impl BehaviorProfile {
    /// Plain aggressive profile used for templates without an entry.
    pub fn default_aggressive() -> Self {
        Self {
            behavior_type: BehaviorType::Aggressive,
            low_hp_threshold: 0.2,
            flee_chance: 0.0,
            defend_chance: 0.0,
            skills: Vec::new(),
            skill_use_chance: 0.0,
        }
    }
}
