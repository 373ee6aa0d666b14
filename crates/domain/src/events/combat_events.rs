//! Combat-related domain events
//!
//! Returned when a combat session reaches a terminal phase, so callers can
//! persist the outcome and hand out rewards.

use serde::{Deserialize, Serialize};

use crate::entities::LootedItem;
use crate::types::CombatPhase;
use crate::CombatId;

/// How a finished combat ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CombatOutcome {
    Victory,
    Defeat,
    Fled,
}

impl CombatOutcome {
    /// Outcome implied by a session phase. Any non-victory, non-fled phase
    /// counts as a defeat.
    pub fn from_phase(phase: CombatPhase) -> Self {
        match phase {
            CombatPhase::Victory => Self::Victory,
            CombatPhase::Fled => Self::Fled,
            _ => Self::Defeat,
        }
    }
}

/// Summary of a finished combat
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatResult {
    pub combat_id: CombatId,
    pub outcome: CombatOutcome,
    pub experience_gained: u32,
    pub gold_gained: u32,
    pub loot: Vec<LootedItem>,
    pub rounds: u32,
    /// Wall-clock seconds between start and the result request
    pub duration_secs: i64,
}
