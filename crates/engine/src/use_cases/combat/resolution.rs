//! Action resolution: one rule per action type.
//!
//! Every roll goes through the injected [`RandomPort`]. Content gaps
//! (unknown target, skill or item) produce a failed [`ActionResult`]
//! instead of an error.

use lorekeep_domain::content::{skill_effect, BuffSkill, SkillEffect};
use lorekeep_domain::{
    ActionResult, CombatAction, CombatActionType, CombatPhase, CombatSession, Combatant, Stat,
    StatusEffect, StatusEffectType,
};

use crate::infrastructure::ports::RandomPort;

pub const PLAYER_FLEE_CHANCE: f64 = 0.4;
pub const ENEMY_FLEE_CHANCE: f64 = 0.3;
pub const HEALTH_ITEM_HEALING: i32 = 20;
const DEFEND_HIT_PENALTY: f64 = 15.0;

const HOWL_STRENGTH_BONUS: i32 = 5;
const HOWL_DURATION: u32 = 3;

pub fn resolve_action(
    session: &mut CombatSession,
    action: &CombatAction,
    random: &dyn RandomPort,
) -> ActionResult {
    let Some(actor) = session.find(&action.actor_id).cloned() else {
        return ActionResult::failure("Combatiente no encontrado");
    };

    match action.action_type {
        CombatActionType::Attack => {
            resolve_attack(session, &actor, action.target_id.as_deref(), random)
        }
        CombatActionType::Defend => {
            if let Some(a) = session.find_mut(&actor.id) {
                a.is_defending = true;
            }
            ActionResult::success(format!("{} se pone en guardia.", actor.name))
        }
        CombatActionType::Skill => resolve_skill(
            session,
            &actor,
            action.skill_id.as_deref(),
            action.target_id.as_deref(),
            random,
        ),
        CombatActionType::Item => resolve_item(session, &actor, action.item_id.as_deref()),
        CombatActionType::Flee => resolve_flee(session, &actor, random),
        CombatActionType::Wait => ActionResult::success(format!("{} espera.", actor.name)),
    }
}

/// Hit chance in percent, clamped to `[5, 95]`.
pub fn hit_chance(attacker: &Combatant, target: &Combatant) -> f64 {
    let attacker_dex = f64::from(attacker.effective_attribute(Stat::Dexterity));
    let target_dex = f64::from(target.effective_attribute(Stat::Dexterity));
    let mut chance = 80.0 + (attacker_dex - 10.0) * 2.0 - target_dex * 1.5;
    if target.is_defending {
        chance -= DEFEND_HIT_PENALTY;
    }
    chance.clamp(5.0, 95.0)
}

/// Critical chance in percent, clamped to `[1, 50]`.
pub fn crit_chance(attacker: &Combatant) -> f64 {
    let dex = f64::from(attacker.effective_attribute(Stat::Dexterity));
    let luck = f64::from(attacker.effective_attribute(Stat::Luck));
    (5.0 + (dex - 10.0) * 0.5 + (luck - 10.0) * 0.3).clamp(1.0, 50.0)
}

/// Base damage with a ±15% swing, reduced by the target's constitution.
/// Never below 1.
pub fn calculate_damage(attacker: &Combatant, target: &Combatant, random: &dyn RandomPort) -> i32 {
    let strength = f64::from(attacker.effective_attribute(Stat::Strength));
    let base = 10.0 + strength * 1.5 + f64::from(attacker.level) * 2.0;
    let varied = base * (1.0 + (random.gen_float() - 0.5) * 0.3);
    let constitution = f64::from(target.effective_attribute(Stat::Constitution));
    (varied - constitution * 0.8).max(1.0).floor() as i32
}

fn resolve_attack(
    session: &mut CombatSession,
    attacker: &Combatant,
    target_id: Option<&str>,
    random: &dyn RandomPort,
) -> ActionResult {
    let Some(target) = target_id.and_then(|id| session.find(id)).cloned() else {
        return ActionResult::failure("Objetivo no encontrado");
    };

    let roll = random.gen_float() * 100.0;
    if roll >= hit_chance(attacker, &target) {
        let mut result = ActionResult::success(format!(
            "{} ataca a {} pero falla.",
            attacker.name, target.name
        ));
        result.is_miss = true;
        return result;
    }

    let mut damage = calculate_damage(attacker, &target, random);
    let is_critical = random.gen_float() * 100.0 < crit_chance(attacker);
    if is_critical {
        damage *= 2;
    }
    if target.is_defending {
        damage = (f64::from(damage) * 0.5).floor() as i32;
    }

    let killed = session
        .find_mut(&target.id)
        .map(|t| t.take_damage(damage))
        .unwrap_or(false);

    let mut message = if is_critical {
        format!(
            "¡Golpe crítico! {} inflige {} de daño a {}.",
            attacker.name, damage, target.name
        )
    } else {
        format!(
            "{} golpea a {} por {} de daño.",
            attacker.name, target.name, damage
        )
    };
    if killed {
        message.push_str(&format!(" {} ha sido derrotado.", target.name));
    }

    let mut result = ActionResult::success(message);
    result.damage = damage;
    result.is_critical = is_critical;
    result.target_killed = killed;
    result
}

fn resolve_skill(
    session: &mut CombatSession,
    actor: &Combatant,
    skill_id: Option<&str>,
    target_id: Option<&str>,
    random: &dyn RandomPort,
) -> ActionResult {
    let Some(skill_id) = skill_id.filter(|s| !s.is_empty()) else {
        return ActionResult::failure("Habilidad no especificada");
    };

    match skill_effect(skill_id) {
        SkillEffect::Damage { multiplier } => {
            let Some(target) = target_id.and_then(|id| session.find(id)).cloned() else {
                return ActionResult::failure("Objetivo no encontrado");
            };
            let damage =
                (f64::from(calculate_damage(actor, &target, random)) * multiplier).floor() as i32;
            let killed = session
                .find_mut(&target.id)
                .map(|t| t.take_damage(damage))
                .unwrap_or(false);

            let mut message = format!(
                "{} usa {} contra {} y causa {} de daño.",
                actor.name, skill_id, target.name, damage
            );
            if killed {
                message.push_str(&format!(" {} ha sido derrotado.", target.name));
            }
            let mut result = ActionResult::success(message);
            result.damage = damage;
            result.target_killed = killed;
            result
        }
        SkillEffect::Buff {
            skill: BuffSkill::Howl,
        } => {
            let effect = StatusEffect::new(
                "Aullido",
                StatusEffectType::Buff,
                HOWL_DURATION,
                HOWL_STRENGTH_BONUS,
            )
            .with_stat(Stat::Strength)
            .with_icon("howl");
            let name = effect.name.clone();
            if let Some(a) = session.find_mut(&actor.id) {
                a.status_effects.push(effect);
            }
            let mut result = ActionResult::success(format!(
                "{} aúlla y su fuerza aumenta.",
                actor.name
            ));
            result.effects_applied.push(name);
            result
        }
        SkillEffect::Buff {
            skill: BuffSkill::DirtyTrick,
        } => ActionResult::success(format!(
            "{} intenta un truco sucio, pero no surte efecto.",
            actor.name
        )),
        SkillEffect::Unrecognized => {
            tracing::debug!(skill_id = skill_id, actor = %actor.id, "Unrecognized skill");
            ActionResult::failure(format!("Habilidad no reconocida: {}", skill_id))
        }
    }
}

fn resolve_item(
    session: &mut CombatSession,
    actor: &Combatant,
    item_id: Option<&str>,
) -> ActionResult {
    let Some(item_id) = item_id.filter(|id| id.contains("health")) else {
        return ActionResult::failure("Objeto no encontrado");
    };

    let healed = session
        .find_mut(&actor.id)
        .map(|a| a.heal(HEALTH_ITEM_HEALING))
        .unwrap_or(0);
    let mut result = ActionResult::success(format!(
        "{} usa {} y recupera {} puntos de vida.",
        actor.name, item_id, healed
    ));
    result.healing = healed;
    result
}

fn resolve_flee(
    session: &mut CombatSession,
    actor: &Combatant,
    random: &dyn RandomPort,
) -> ActionResult {
    let chance = if actor.is_player {
        PLAYER_FLEE_CHANCE
    } else {
        ENEMY_FLEE_CHANCE
    };

    if random.gen_float() >= chance {
        return ActionResult::failure(format!("{} intenta huir, pero no lo consigue.", actor.name));
    }

    if actor.is_player {
        session.phase = CombatPhase::Fled;
        session.is_active = false;
    } else if let Some(enemy) = session.find_mut(&actor.id) {
        enemy.knock_out();
    }

    let mut result = ActionResult::success(format!("{} huye del combate.", actor.name));
    result.fled = true;
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::{FixedRandom, SequenceRandom};
    use crate::use_cases::combat::test_support::{combatant, enemy_of, session_with};

    fn duel() -> CombatSession {
        session_with(vec![combatant("pc", true, 100), enemy_of("goblin", 25)])
    }

    const GOBLIN: &str = "enemy_0_goblin";

    #[test]
    fn hit_chance_clamps_and_accounts_for_defence() {
        let attacker = combatant("a", true, 10);
        let mut target = combatant("t", false, 10);
        // 80 + 0 - 15 = 65
        assert_eq!(hit_chance(&attacker, &target), 65.0);
        target.is_defending = true;
        assert_eq!(hit_chance(&attacker, &target), 50.0);
        target.attributes.dexterity = 80;
        assert_eq!(hit_chance(&attacker, &target), 5.0);

        let mut ace = combatant("a", true, 10);
        ace.attributes.dexterity = 40;
        assert_eq!(hit_chance(&ace, &combatant("t", false, 10)), 95.0);
    }

    #[test]
    fn crit_chance_clamps() {
        let mut c = combatant("a", true, 10);
        assert_eq!(crit_chance(&c), 5.0);
        c.attributes.dexterity = 0;
        c.attributes.luck = 0;
        assert_eq!(crit_chance(&c), 1.0);
        c.attributes.dexterity = 200;
        assert_eq!(crit_chance(&c), 50.0);
    }

    #[test]
    fn damage_formula_without_variance() {
        // base 10 + 15 + 2 = 27, variance factor 1.0, minus 8 -> 19
        let a = combatant("a", true, 10);
        let t = combatant("t", false, 10);
        assert_eq!(calculate_damage(&a, &t, &FixedRandom(0.5, 0)), 19);
    }

    #[test]
    fn damage_is_at_least_one() {
        let mut a = combatant("a", true, 10);
        a.attributes.strength = 0;
        let mut t = combatant("t", false, 10);
        t.attributes.constitution = 100;
        assert_eq!(calculate_damage(&a, &t, &FixedRandom(0.0, 0)), 1);
    }

    #[test]
    fn attack_miss_deals_no_damage() {
        let mut s = duel();
        let result = resolve_action(
            &mut s,
            &CombatAction::attack("pc", GOBLIN),
            &FixedRandom(0.99, 0),
        );
        assert!(result.success);
        assert!(result.is_miss);
        assert_eq!(result.damage, 0);
        assert_eq!(s.find(GOBLIN).unwrap().current_hp, 25);
    }

    #[test]
    fn attack_hit_and_crit_doubles_then_defence_halves() {
        let mut s = duel();
        s.find_mut(GOBLIN).unwrap().is_defending = true;
        // hit roll 0, variance 0.5 (neutral), crit roll 0
        let rng = SequenceRandom::new(&[0.0, 0.5, 0.0], &[]);
        let result = resolve_action(&mut s, &CombatAction::attack("pc", GOBLIN), &rng);
        // goblin constitution 8: 27 - 6.4 = 20.6 -> 20, crit 40, defending 20
        assert!(result.is_critical);
        assert_eq!(result.damage, 20);
        assert_eq!(s.find(GOBLIN).unwrap().current_hp, 5);
    }

    #[test]
    fn lethal_attack_clamps_hp_and_disables_target() {
        let mut s = duel();
        s.find_mut(GOBLIN).unwrap().current_hp = 3;
        let rng = SequenceRandom::new(&[0.0, 0.5, 0.99], &[]);
        let result = resolve_action(&mut s, &CombatAction::attack("pc", GOBLIN), &rng);
        assert!(result.target_killed);
        let goblin = s.find(GOBLIN).unwrap();
        assert_eq!(goblin.current_hp, 0);
        assert!(!goblin.can_act);
    }

    #[test]
    fn attack_on_missing_target_fails_softly() {
        let mut s = duel();
        let result = resolve_action(
            &mut s,
            &CombatAction::attack("pc", "nobody"),
            &FixedRandom(0.0, 0),
        );
        assert!(!result.success);
    }

    #[test]
    fn damage_skill_applies_multiplier_without_crit() {
        let mut s = duel();
        let action = CombatAction::skill("pc", "skill_backstab", Some(GOBLIN.to_string()));
        let result = resolve_action(&mut s, &action, &FixedRandom(0.5, 0));
        // floor(20 * 2.0) = 40, clamps goblin to 0
        assert_eq!(result.damage, 40);
        assert!(result.target_killed);
        assert!(!result.is_critical);
    }

    #[test]
    fn howl_buffs_strength_for_three_rounds() {
        let mut s = duel();
        let action = CombatAction::skill(GOBLIN, "skill_howl", None);
        let result = resolve_action(&mut s, &action, &FixedRandom(0.5, 0));
        assert!(result.success);
        let goblin = s.find(GOBLIN).unwrap();
        assert_eq!(goblin.status_effects.len(), 1);
        assert_eq!(goblin.status_effects[0].duration, 3);
        assert_eq!(goblin.effective_attribute(Stat::Strength), 13);
    }

    #[test]
    fn dirty_trick_is_a_no_op_success() {
        let mut s = duel();
        let action = CombatAction::skill(GOBLIN, "skill_dirty_trick", Some("pc".into()));
        let result = resolve_action(&mut s, &action, &FixedRandom(0.5, 0));
        assert!(result.success);
        assert_eq!(s.find("pc").unwrap().current_hp, 100);
    }

    #[test]
    fn synthetic_heal_skill_is_not_recognized() {
        let mut s = duel();
        let action = CombatAction::skill(GOBLIN, "skill_heal", Some(GOBLIN.into()));
        let result = resolve_action(&mut s, &action, &FixedRandom(0.5, 0));
        assert!(!result.success);
        assert!(result.message.contains("skill_heal"));
    }

    #[test]
    fn health_item_heals_up_to_max() {
        let mut s = duel();
        s.find_mut("pc").unwrap().current_hp = 90;
        let result = resolve_action(
            &mut s,
            &CombatAction::item("pc", "health_potion_small"),
            &FixedRandom(0.5, 0),
        );
        assert!(result.success);
        assert_eq!(result.healing, 10);
        assert_eq!(s.find("pc").unwrap().current_hp, 100);
    }

    #[test]
    fn other_items_are_not_found() {
        let mut s = duel();
        let result = resolve_action(
            &mut s,
            &CombatAction::item("pc", "mana_potion"),
            &FixedRandom(0.5, 0),
        );
        assert!(!result.success);
    }

    #[test]
    fn successful_player_flee_ends_combat_without_damage() {
        let mut s = duel();
        let result = resolve_action(&mut s, &CombatAction::flee("pc"), &FixedRandom(0.0, 0));
        assert!(result.fled);
        assert_eq!(s.phase, CombatPhase::Fled);
        assert!(!s.is_active);
        assert_eq!(s.find("pc").unwrap().current_hp, 100);
        assert_eq!(s.find(GOBLIN).unwrap().current_hp, 25);
    }

    #[test]
    fn enemy_flee_is_modelled_as_knock_out() {
        let mut s = duel();
        let result = resolve_action(&mut s, &CombatAction::flee(GOBLIN), &FixedRandom(0.2, 0));
        assert!(result.fled);
        assert!(s.is_active);
        assert!(!s.find(GOBLIN).unwrap().is_alive());
    }

    #[test]
    fn flee_fails_above_chance() {
        let mut s = duel();
        let result = resolve_action(&mut s, &CombatAction::flee("pc"), &FixedRandom(0.4, 0));
        assert!(!result.success);
        assert!(s.is_active);
    }
}
