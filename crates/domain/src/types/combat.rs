//! Combat vocabulary: session phases, AI behaviour archetypes, item kinds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Combat session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CombatPhase {
    Initiative,
    PlayerTurn,
    EnemyTurn,
    Victory,
    Defeat,
    Fled,
}

impl CombatPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            CombatPhase::Initiative => "INITIATIVE",
            CombatPhase::PlayerTurn => "PLAYER_TURN",
            CombatPhase::EnemyTurn => "ENEMY_TURN",
            CombatPhase::Victory => "VICTORY",
            CombatPhase::Defeat => "DEFEAT",
            CombatPhase::Fled => "FLED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            CombatPhase::Victory | CombatPhase::Defeat | CombatPhase::Fled
        )
    }
}

impl fmt::Display for CombatPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Enemy AI archetype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BehaviorType {
    /// Attacks relentlessly
    Aggressive,
    /// Turtles up when hurt
    Defensive,
    /// Mixes skills into its attacks
    Tactical,
    /// Runs when hurt
    Coward,
    /// Fights harder when hurt
    Berserker,
    /// Tends to wounded allies
    Support,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Weapon,
    Armor,
    Consumable,
    Material,
    Quest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}
