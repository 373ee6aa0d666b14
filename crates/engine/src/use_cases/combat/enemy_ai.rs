//! Enemy AI: picks an intention for an enemy from its behaviour profile.
//!
//! The decision cascade is:
//!
//! 1. At or below the low-hp threshold, cowards may flee, defensive enemies
//!    may defend and berserkers always attack with fury. Other behaviour
//!    types ignore low hp.
//! 2. Support enemies heal the first wounded ally (below half hp).
//! 3. A skill-use roll picks one of the profile's skills at random.
//! 4. Otherwise, a plain attack on the player.

use std::sync::Arc;

use lorekeep_domain::content::behavior_profile;
use lorekeep_domain::{BehaviorType, CombatAction, Combatant, Intention, IntentionType};

use crate::infrastructure::ports::RandomPort;

/// Allies below this hp fraction are healing candidates.
const WOUNDED_ALLY_THRESHOLD: f64 = 0.5;

/// Synthetic skill ids for heal/buff intentions. The skill table does not
/// define them, so they resolve as unrecognised skills.
pub const HEAL_SKILL_ID: &str = "skill_heal";
pub const BUFF_SKILL_ID: &str = "skill_buff";

pub struct EnemyAi {
    random: Arc<dyn RandomPort>,
}

impl EnemyAi {
    pub fn new(random: Arc<dyn RandomPort>) -> Self {
        Self { random }
    }

    pub fn determine_intention(
        &self,
        enemy: &Combatant,
        player: &Combatant,
        allies: &[&Combatant],
    ) -> Intention {
        let profile = behavior_profile(enemy.template_id.as_deref());

        if enemy.hp_fraction() <= profile.low_hp_threshold {
            match profile.behavior_type {
                BehaviorType::Coward => {
                    if self.random.gen_float() < profile.flee_chance {
                        return Intention::new(IntentionType::Flee, "Busca una vía de escape");
                    }
                }
                BehaviorType::Defensive => {
                    if self.random.gen_float() < profile.defend_chance {
                        return Intention::new(IntentionType::Defend, "Se cubre tras su guardia");
                    }
                }
                BehaviorType::Berserker => {
                    return Intention::new(
                        IntentionType::Attack,
                        format!("Ataca con furia desesperada a {}", player.name),
                    )
                    .targeting(player.id.clone());
                }
                BehaviorType::Aggressive | BehaviorType::Tactical | BehaviorType::Support => {}
            }
        }

        if profile.behavior_type == BehaviorType::Support {
            if let Some(ally) = allies
                .iter()
                .find(|a| a.is_alive() && a.hp_fraction() < WOUNDED_ALLY_THRESHOLD)
            {
                return Intention::new(IntentionType::Heal, format!("Se dispone a curar a {}", ally.name))
                    .targeting(ally.id.clone());
            }
        }

        if !profile.skills.is_empty() && self.random.gen_float() < profile.skill_use_chance {
            let last = i32::try_from(profile.skills.len() - 1).unwrap_or(i32::MAX);
            let pick = usize::try_from(self.random.gen_range(0, last)).unwrap_or(0);
            if let Some(skill_id) = profile.skills.get(pick) {
                return Intention::new(IntentionType::Skill, format!("Prepara {}", skill_id))
                    .targeting(player.id.clone())
                    .with_skill(skill_id.clone());
            }
        }

        Intention::new(
            IntentionType::Attack,
            format!("Prepara un ataque contra {}", player.name),
        )
        .targeting(player.id.clone())
    }

    /// Map an intention onto a concrete action. `default_target` fills in
    /// missing attack/skill targets.
    pub fn intention_to_action(
        actor_id: &str,
        intention: &Intention,
        default_target: &str,
    ) -> CombatAction {
        let target = intention
            .target_id
            .clone()
            .unwrap_or_else(|| default_target.to_string());
        match intention.intention_type {
            IntentionType::Attack => CombatAction::attack(actor_id, target),
            IntentionType::Defend => CombatAction::defend(actor_id),
            IntentionType::Flee => CombatAction::flee(actor_id),
            IntentionType::Skill => CombatAction::skill(
                actor_id,
                intention.skill_id.clone().unwrap_or_default(),
                Some(target),
            ),
            IntentionType::Heal => CombatAction::skill(actor_id, HEAL_SKILL_ID, Some(target)),
            IntentionType::Buff => CombatAction::skill(actor_id, BUFF_SKILL_ID, None),
        }
    }
}
