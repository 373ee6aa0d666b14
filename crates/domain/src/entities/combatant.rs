//! Combatant entity - a participant snapshot inside one combat session.
//!
//! # Invariants
//!
//! - `current_hp` is always within `[0, max_hp]`
//! - `current_hp == 0` implies `can_act == false`
//! - `intention` is only ever set on non-player combatants

use serde::{Deserialize, Serialize};

use crate::value_objects::{Attributes, Intention, Stat, StatusEffect};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Combatant {
    pub id: String,
    pub name: String,
    pub is_player: bool,
    /// Enemy template this combatant was built from (enemies only)
    pub template_id: Option<String>,
    pub initiative: i32,
    pub current_hp: i32,
    pub max_hp: i32,
    pub current_stamina: i32,
    pub max_stamina: i32,
    pub current_mana: i32,
    pub max_mana: i32,
    pub attributes: Attributes,
    pub level: u32,
    pub status_effects: Vec<StatusEffect>,
    pub is_defending: bool,
    pub can_act: bool,
    pub intention: Option<Intention>,
}

impl Combatant {
    /// Still in the fight: `current_hp > 0`.
    pub fn is_alive(&self) -> bool {
        self.current_hp > 0
    }

    pub fn is_enemy(&self) -> bool {
        !self.is_player
    }

    /// Current hp as a fraction of max hp (0.0 when max hp is 0).
    pub fn hp_fraction(&self) -> f64 {
        if self.max_hp <= 0 {
            return 0.0;
        }
        f64::from(self.current_hp) / f64::from(self.max_hp)
    }

    /// Base attribute plus every active buff/debuff targeting it.
    pub fn effective_attribute(&self, stat: Stat) -> i32 {
        let bonus: i32 = self
            .status_effects
            .iter()
            .map(|effect| effect.stat_delta(stat))
            .sum();
        self.attributes.get(stat) + bonus
    }

    /// Full attribute block with status effects folded in.
    pub fn effective_attributes(&self) -> Attributes {
        let mut attrs = self.attributes;
        for stat in Stat::all() {
            attrs.set(stat, self.effective_attribute(stat));
        }
        attrs
    }

    /// Subtract `amount` hp, clamping at 0. Returns `true` when this blow
    /// took the combatant from alive to 0 hp.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        let was_alive = self.is_alive();
        self.current_hp = (self.current_hp - amount.max(0)).clamp(0, self.max_hp);
        if self.current_hp == 0 {
            self.can_act = false;
        }
        was_alive && self.current_hp == 0
    }

    /// Restore up to `amount` hp, capped at max. Returns hp actually restored.
    pub fn heal(&mut self, amount: i32) -> i32 {
        let before = self.current_hp;
        self.current_hp = (self.current_hp + amount.max(0)).clamp(0, self.max_hp);
        self.current_hp - before
    }

    /// Zero out hp and remove from the turn rotation.
    pub fn knock_out(&mut self) {
        self.current_hp = 0;
        self.can_act = false;
    }

    pub fn restore_stamina(&mut self, amount: i32) {
        self.current_stamina = (self.current_stamina + amount).clamp(0, self.max_stamina);
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub fn combatant(id: &str, is_player: bool, hp: i32) -> Combatant {
        Combatant {
            id: id.to_string(),
            name: id.to_string(),
            is_player,
            template_id: None,
            initiative: 0,
            current_hp: hp,
            max_hp: hp,
            current_stamina: 20,
            max_stamina: 20,
            current_mana: 10,
            max_mana: 10,
            attributes: Attributes::baseline(),
            level: 1,
            status_effects: Vec::new(),
            is_defending: false,
            can_act: true,
            intention: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::combatant;
    use super::*;
    use crate::value_objects::StatusEffectType;

    #[test]
    fn damage_clamps_at_zero_and_disables_acting() {
        let mut c = combatant("goblin", false, 12);
        assert!(!c.take_damage(5));
        assert_eq!(c.current_hp, 7);
        assert!(c.take_damage(50));
        assert_eq!(c.current_hp, 0);
        assert!(!c.can_act);
        // Already down: further damage is not a new kill
        assert!(!c.take_damage(3));
    }

    #[test]
    fn heal_caps_at_max_hp() {
        let mut c = combatant("pc", true, 100);
        c.current_hp = 90;
        assert_eq!(c.heal(20), 10);
        assert_eq!(c.current_hp, 100);
    }

    #[test]
    fn effective_attribute_folds_in_buffs() {
        let mut c = combatant("wolf", false, 20);
        c.status_effects
            .push(StatusEffect::new("Aullido", StatusEffectType::Buff, 3, 5).with_stat(Stat::Strength));
        assert_eq!(c.effective_attribute(Stat::Strength), 15);
        assert_eq!(c.effective_attributes().strength, 15);
        assert_eq!(c.attributes.strength, 10);
    }

    #[test]
    fn stamina_restore_caps_at_max() {
        let mut c = combatant("pc", true, 100);
        c.current_stamina = 18;
        c.restore_stamina(5);
        assert_eq!(c.current_stamina, 20);
    }
}
