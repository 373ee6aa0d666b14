use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Damage multipliers per skill id. A multiplier of 0 marks a non-damage skill.
static SKILL_MULTIPLIERS: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| {
    HashMap::from([
        ("skill_backstab", 2.0),
        ("skill_throw_rock", 0.6),
        ("skill_bite", 1.2),
        ("skill_howl", 0.0),
        ("skill_slash", 1.3),
        ("skill_dirty_trick", 0.0),
        ("skill_bone_throw", 0.8),
        ("skill_power_strike", 1.5),
        ("skill_dark_bolt", 1.4),
        ("skill_fireball", 1.8),
        ("skill_shield_bash", 0.9),
    ])
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuffSkill {
    /// Self-buff: +5 strength for 3 rounds
    Howl,
    /// Announced, no mechanical effect yet
    DirtyTrick,
}

/// How the combat engine resolves a skill id
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkillEffect {
    Damage { multiplier: f64 },
    Buff { skill: BuffSkill },
    Unrecognized,
}

pub fn skill_effect(skill_id: &str) -> SkillEffect {
    let multiplier = SKILL_MULTIPLIERS.get(skill_id).copied().unwrap_or(0.0);
    if multiplier > 0.0 {
        return SkillEffect::Damage { multiplier };
    }
    match skill_id {
        "skill_howl" => SkillEffect::Buff {
            skill: BuffSkill::Howl,
        },
        "skill_dirty_trick" => SkillEffect::Buff {
            skill: BuffSkill::DirtyTrick,
        },
        _ => SkillEffect::Unrecognized,
    }
}
