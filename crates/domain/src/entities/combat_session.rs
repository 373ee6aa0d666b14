//! Combat session entity - one per active combat.
//!
//! The turn order is fixed for the lifetime of the session. Combatants are
//! never removed; defeated (or fled) enemies stay in place with 0 hp and
//! `can_act == false` so indices remain stable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Combatant;
use crate::types::CombatPhase;
use crate::value_objects::{ActionResult, CombatActionType};
use crate::CombatId;

/// One line of the append-only combat log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatLogEntry {
    pub round: u32,
    /// `None` for system lines (opening, round separators, endings)
    pub actor_id: Option<String>,
    pub actor_name: String,
    pub action: Option<CombatActionType>,
    pub target_name: Option<String>,
    pub message: String,
    pub result: Option<ActionResult>,
    pub timestamp: DateTime<Utc>,
}

impl CombatLogEntry {
    pub const SYSTEM_ACTOR: &'static str = "Sistema";

    pub fn system(round: u32, message: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            round,
            actor_id: None,
            actor_name: Self::SYSTEM_ACTOR.to_string(),
            action: None,
            target_name: None,
            message: message.into(),
            result: None,
            timestamp,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatSession {
    pub id: CombatId,
    /// Starts at 1
    pub round: u32,
    pub phase: CombatPhase,
    pub turn_order: Vec<Combatant>,
    pub current_turn_index: usize,
    /// Per-turn action budget (always reset to 1)
    pub actions_remaining: u32,
    pub combat_log: Vec<CombatLogEntry>,
    pub started_at: DateTime<Utc>,
    pub is_active: bool,
}

impl CombatSession {
    pub fn new(id: CombatId, turn_order: Vec<Combatant>, started_at: DateTime<Utc>) -> Self {
        Self {
            id,
            round: 1,
            phase: CombatPhase::Initiative,
            turn_order,
            current_turn_index: 0,
            actions_remaining: 1,
            combat_log: Vec::new(),
            started_at,
            is_active: true,
        }
    }

    pub fn current_combatant(&self) -> Option<&Combatant> {
        self.turn_order.get(self.current_turn_index)
    }

    pub fn current_combatant_mut(&mut self) -> Option<&mut Combatant> {
        self.turn_order.get_mut(self.current_turn_index)
    }

    pub fn find(&self, id: &str) -> Option<&Combatant> {
        self.turn_order.iter().find(|c| c.id == id)
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut Combatant> {
        self.turn_order.iter_mut().find(|c| c.id == id)
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.turn_order.iter().position(|c| c.id == id)
    }

    pub fn player(&self) -> Option<&Combatant> {
        self.turn_order.iter().find(|c| c.is_player)
    }

    pub fn enemies(&self) -> impl Iterator<Item = &Combatant> {
        self.turn_order.iter().filter(|c| c.is_enemy())
    }

    pub fn any_enemy_alive(&self) -> bool {
        self.enemies().any(Combatant::is_alive)
    }

    /// Enemies currently at 0 hp, in turn order.
    pub fn defeated_enemies(&self) -> impl Iterator<Item = &Combatant> {
        self.enemies().filter(|c| !c.is_alive())
    }

    pub fn push_log(&mut self, entry: CombatLogEntry) {
        self.combat_log.push(entry);
    }

    /// Last `n` log entries, oldest first.
    pub fn recent_log(&self, n: usize) -> &[CombatLogEntry] {
        let start = self.combat_log.len().saturating_sub(n);
        &self.combat_log[start..]
    }
}
