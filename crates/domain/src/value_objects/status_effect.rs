//! Status effects attached to combatants.

use serde::{Deserialize, Serialize};

use super::Stat;
use crate::StatusEffectId;

/// How a status effect acts on its holder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusEffectType {
    /// Raises `affected_stat` by `magnitude` while active
    Buff,
    /// Lowers `affected_stat` by `magnitude` while active
    Debuff,
    /// Damage over time, applied at round end
    Dot,
    /// Healing over time, applied at round end
    Hot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusEffect {
    pub id: StatusEffectId,
    pub name: String,
    #[serde(rename = "type")]
    pub effect_type: StatusEffectType,
    /// Rounds left; decremented once per round end, removed at 0
    pub duration: u32,
    pub magnitude: i32,
    pub affected_stat: Option<Stat>,
    pub icon: String,
}

impl StatusEffect {
    pub fn new(
        name: impl Into<String>,
        effect_type: StatusEffectType,
        duration: u32,
        magnitude: i32,
    ) -> Self {
        Self {
            id: StatusEffectId::new(),
            name: name.into(),
            effect_type,
            duration,
            magnitude,
            affected_stat: None,
            icon: String::new(),
        }
    }

    pub fn with_stat(mut self, stat: Stat) -> Self {
        self.affected_stat = Some(stat);
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    /// Signed contribution of this effect to `stat` (0 when unrelated).
    pub fn stat_delta(&self, stat: Stat) -> i32 {
        if self.affected_stat != Some(stat) {
            return 0;
        }
        match self.effect_type {
            StatusEffectType::Buff => self.magnitude,
            StatusEffectType::Debuff => -self.magnitude,
            StatusEffectType::Dot | StatusEffectType::Hot => 0,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.duration == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buff_and_debuff_only_touch_their_stat() {
        let buff = StatusEffect::new("Aullido", StatusEffectType::Buff, 3, 5).with_stat(Stat::Strength);
        assert_eq!(buff.stat_delta(Stat::Strength), 5);
        assert_eq!(buff.stat_delta(Stat::Dexterity), 0);

        let debuff =
            StatusEffect::new("Ceguera", StatusEffectType::Debuff, 2, 3).with_stat(Stat::Dexterity);
        assert_eq!(debuff.stat_delta(Stat::Dexterity), -3);
    }

    #[test]
    fn over_time_effects_never_change_stats() {
        let dot = StatusEffect::new("Veneno", StatusEffectType::Dot, 2, 4).with_stat(Stat::Strength);
        assert_eq!(dot.stat_delta(Stat::Strength), 0);
    }

    #[test]
    fn effect_type_serializes_as_field_type() {
        let effect = StatusEffect::new("Regeneración", StatusEffectType::Hot, 2, 4);
        let json = serde_json::to_value(&effect).unwrap();
        assert_eq!(json["type"], "hot");
        assert_eq!(json["duration"], 2);
    }
}
