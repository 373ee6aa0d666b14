use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::entities::BehaviorProfile;
use crate::types::BehaviorType;

static BEHAVIORS: Lazy<HashMap<&'static str, BehaviorProfile>> = Lazy::new(|| {
    HashMap::from([
        (
            "goblin",
            profile(BehaviorType::Coward, 0.3, 0.5, 0.0, &["skill_backstab", "skill_throw_rock"], 0.3),
        ),
        (
            "wolf",
            profile(BehaviorType::Aggressive, 0.2, 0.0, 0.0, &["skill_bite", "skill_howl"], 0.35),
        ),
        (
            "bandit",
            profile(BehaviorType::Tactical, 0.3, 0.1, 0.2, &["skill_slash", "skill_dirty_trick"], 0.3),
        ),
        (
            "skeleton",
            profile(BehaviorType::Defensive, 0.4, 0.0, 0.5, &["skill_bone_throw"], 0.25),
        ),
        (
            "orc",
            profile(BehaviorType::Berserker, 0.3, 0.0, 0.0, &["skill_power_strike"], 0.3),
        ),
        (
            "bandit_leader",
            profile(
                BehaviorType::Tactical,
                0.25,
                0.0,
                0.3,
                &["skill_slash", "skill_power_strike", "skill_dirty_trick"],
                0.4,
            ),
        ),
        (
            "cultist",
            profile(BehaviorType::Support, 0.3, 0.0, 0.0, &["skill_dark_bolt"], 0.3),
        ),
    ])
});

fn profile(
    behavior_type: BehaviorType,
    low_hp_threshold: f64,
    flee_chance: f64,
    defend_chance: f64,
    skills: &[&str],
    skill_use_chance: f64,
) -> BehaviorProfile {
    BehaviorProfile {
        behavior_type,
        low_hp_threshold,
        flee_chance,
        defend_chance,
        skills: skills.iter().map(|s| s.to_string()).collect(),
        skill_use_chance,
    }
}

/// Profile for an enemy template, or the plain aggressive default.
pub fn behavior_profile(template_id: Option<&str>) -> BehaviorProfile {
    template_id
        .and_then(|id| BEHAVIORS.get(id))
        .cloned()
        .unwrap_or_else(BehaviorProfile::default_aggressive)
}
