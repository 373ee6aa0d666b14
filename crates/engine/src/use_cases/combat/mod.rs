//! Combat use cases.
//!
//! Turn-based combat over an in-memory session table. The flow is:
//! 1. `start_combat` builds combatants, rolls initiative, precomputes enemy
//!    intentions
//! 2. The player acts (`execute_player_action`) on PLAYER_TURN, enemies act
//!    (`execute_enemy_turn`) on ENEMY_TURN
//! 3. After each action the turn advances, ticking status effects when a
//!    round wraps, and then the session is checked for victory/defeat
//! 4. Once inactive, `get_combat_result` hands out experience and loot
//!
//! Each operation locks one session entry for its whole synchronous
//! mutation, so calls on the same combat are serialised while different
//! combats proceed in parallel.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use lorekeep_domain::content::enemy_template;
use lorekeep_domain::{
    ActionResult, Attributes, CharacterRecord, CombatAction, CombatActionType, CombatId,
    CombatLogEntry, CombatOutcome, CombatPhase, CombatResult, CombatSession, Combatant,
    EnemyTemplate, Intention, IntentionType, LootOptions, StatusEffectType,
};

use crate::infrastructure::ports::{ClockPort, RandomPort};
use crate::use_cases::loot::LootEngine;

mod enemy_ai;
mod error;
mod initiative;
mod resolution;

pub use enemy_ai::{EnemyAi, BUFF_SKILL_ID, HEAL_SKILL_ID};
pub use error::CombatError;
pub use initiative::{next_actionable_index, order_by_initiative, roll_initiative};
pub use resolution::{calculate_damage, crit_chance, hit_chance, resolve_action};

/// Experience per enemy level.
pub const XP_PER_LEVEL: u32 = 20;
/// Stamina regained by every living combatant at round end.
pub const STAMINA_REGEN: i32 = 5;
/// Mana needed for the SKILL action to be offered.
pub const SKILL_MANA_COST: i32 = 10;
/// Log entries included in the UI projection.
pub const UI_LOG_ENTRIES: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartCombatOptions {
    pub enemy_ids: Vec<String>,
    /// Enemies ambush the player
    #[serde(default)]
    pub is_ambush: bool,
}

/// Result of one resolved action plus the session snapshot after it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionOutcome {
    pub result: ActionResult,
    pub session: CombatSession,
}

/// Read-only projection of a session for presentation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatUiState {
    pub combat_id: CombatId,
    pub round: u32,
    pub phase: CombatPhase,
    pub is_active: bool,
    pub is_player_turn: bool,
    pub current_combatant_id: Option<String>,
    pub player: Option<Combatant>,
    pub enemies: Vec<Combatant>,
    pub available_actions: Vec<CombatActionType>,
    pub combat_log: Vec<CombatLogEntry>,
}

/// Owns every combat session.
///
/// `max_active` caps running combats. Finished sessions stay readable (for
/// `get_combat_result`) until `end_combat` drops them. At most `max_active`
/// finished sessions are retained; starting a combat evicts the oldest ones
/// beyond that.
pub struct CombatEngine {
    sessions: DashMap<CombatId, CombatSession>,
    ai: EnemyAi,
    loot: Arc<LootEngine>,
    clock: Arc<dyn ClockPort>,
    random: Arc<dyn RandomPort>,
    max_active: usize,
}

impl CombatEngine {
    pub fn new(
        loot: Arc<LootEngine>,
        clock: Arc<dyn ClockPort>,
        random: Arc<dyn RandomPort>,
        max_active: usize,
    ) -> Self {
        Self {
            sessions: DashMap::new(),
            ai: EnemyAi::new(random.clone()),
            loot,
            clock,
            random,
            max_active,
        }
    }

    pub fn start_combat(
        &self,
        player: &CharacterRecord,
        options: StartCombatOptions,
    ) -> Result<CombatSession, CombatError> {
        player.validate()?;
        if options.enemy_ids.is_empty() {
            return Err(CombatError::Validation(lorekeep_domain::DomainError::validation(
                "Se requiere al menos un enemigo",
            )));
        }
        if self.active_combat_count() >= self.max_active {
            return Err(CombatError::CapacityReached(self.max_active));
        }
        self.evict_finished();

        let now = self.clock.now();
        let mut combatants = Vec::with_capacity(options.enemy_ids.len() + 1);
        combatants.push(character_to_combatant(player));
        for (i, template_id) in options.enemy_ids.iter().enumerate() {
            combatants.push(enemy_combatant(i, template_id));
        }

        let turn_order = order_by_initiative(combatants, options.is_ambush, self.random.as_ref());
        let combat_id = CombatId::from_uuid(self.random.gen_uuid());
        let mut session = CombatSession::new(combat_id, turn_order, now);

        for index in 0..session.turn_order.len() {
            self.refresh_intention(&mut session, index);
        }

        session.phase = match session.current_combatant() {
            Some(c) if c.is_player => CombatPhase::PlayerTurn,
            _ => CombatPhase::EnemyTurn,
        };

        let enemy_names: Vec<_> = session.enemies().map(|e| e.name.clone()).collect();
        let mut opening = format!(
            "¡Comienza el combate! {} se enfrenta a: {}.",
            player.name,
            enemy_names.join(", ")
        );
        if options.is_ambush {
            opening.push_str(" ¡Emboscada!");
        }
        session.push_log(CombatLogEntry::system(session.round, opening, now));

        tracing::info!(
            combat_id = %combat_id,
            player = %player.id,
            enemies = ?options.enemy_ids,
            is_ambush = options.is_ambush,
            phase = %session.phase,
            "Combat started"
        );

        self.sessions.insert(combat_id, session.clone());
        Ok(session)
    }

    pub fn execute_player_action(
        &self,
        combat_id: CombatId,
        action: CombatAction,
    ) -> Result<ActionOutcome, CombatError> {
        let now = self.clock.now();
        let mut entry = self
            .sessions
            .get_mut(&combat_id)
            .ok_or(CombatError::NotFound(combat_id))?;
        let session = entry.value_mut();

        if !session.is_active {
            return Err(CombatError::NotActive);
        }
        if session.phase != CombatPhase::PlayerTurn {
            return Err(CombatError::NotPlayerTurn);
        }
        let actor = session
            .find(&action.actor_id)
            .filter(|c| c.is_player)
            .cloned()
            .ok_or(CombatError::PlayerNotFound)?;

        let result = resolve_action(session, &action, self.random.as_ref());
        log_action(session, &actor, &action, &result, now);

        // A successful flee already closed the session; the turn stays put.
        if session.is_active {
            session.actions_remaining = session.actions_remaining.saturating_sub(1);
            if session.actions_remaining == 0 {
                self.advance_turn(session, now);
            }
            check_combat_end(session, now);
        }

        tracing::debug!(
            combat_id = %combat_id,
            action = %action.action_type,
            success = result.success,
            damage = result.damage,
            phase = %session.phase,
            "Player action resolved"
        );

        Ok(ActionOutcome {
            result,
            session: session.clone(),
        })
    }

    pub fn execute_enemy_turn(&self, combat_id: CombatId) -> Result<ActionOutcome, CombatError> {
        let now = self.clock.now();
        let mut entry = self
            .sessions
            .get_mut(&combat_id)
            .ok_or(CombatError::NotFound(combat_id))?;
        let session = entry.value_mut();

        if !session.is_active {
            return Err(CombatError::NotActive);
        }
        if session.phase != CombatPhase::EnemyTurn {
            return Err(CombatError::NotEnemyTurn);
        }
        let index = session.current_turn_index;
        let enemy = session
            .current_combatant()
            .filter(|c| c.is_enemy())
            .cloned()
            .ok_or(CombatError::NotEnemyTurn)?;
        let player_id = session
            .player()
            .map(|p| p.id.clone())
            .ok_or(CombatError::PlayerNotFound)?;

        let intention = match enemy.intention.clone() {
            Some(intention) => intention,
            None => {
                self.refresh_intention(session, index);
                session
                    .current_combatant()
                    .and_then(|c| c.intention.clone())
                    .unwrap_or_else(|| {
                        Intention::new(IntentionType::Attack, "Ataca").targeting(player_id.clone())
                    })
            }
        };

        let action = EnemyAi::intention_to_action(&enemy.id, &intention, &player_id);
        let result = resolve_action(session, &action, self.random.as_ref());
        log_action(session, &enemy, &action, &result, now);

        self.advance_turn(session, now);
        check_combat_end(session, now);

        tracing::debug!(
            combat_id = %combat_id,
            enemy = %enemy.id,
            action = %action.action_type,
            success = result.success,
            damage = result.damage,
            phase = %session.phase,
            "Enemy turn resolved"
        );

        Ok(ActionOutcome {
            result,
            session: session.clone(),
        })
    }

    /// `None` while the combat is still running or when the id is unknown.
    pub fn get_combat_result(&self, combat_id: CombatId) -> Option<CombatResult> {
        let session = self.sessions.get(&combat_id)?;
        if session.is_active {
            return None;
        }

        let outcome = CombatOutcome::from_phase(session.phase);
        let mut experience_gained = 0;
        let mut gold_gained = 0;
        let mut loot = Vec::new();

        if outcome == CombatOutcome::Victory {
            let luck = session
                .player()
                .map(|p| p.attributes.luck)
                .unwrap_or(Attributes::BASELINE);
            let options = LootOptions::default().with_luck(luck);

            for enemy in session.defeated_enemies() {
                let enemy_xp = enemy.level * XP_PER_LEVEL;
                experience_gained += enemy_xp;
                let Some(template_id) = enemy.template_id.as_deref() else {
                    continue;
                };
                let drop = self.loot.generate_loot(template_id, enemy_xp, &options);
                gold_gained += drop.gold;
                loot.extend(drop.items);
            }
        }

        Some(CombatResult {
            combat_id,
            outcome,
            experience_gained,
            gold_gained,
            loot,
            rounds: session.round,
            duration_secs: (self.clock.now() - session.started_at).num_seconds(),
        })
    }

    pub fn get_combat_ui_state(&self, combat_id: CombatId) -> Option<CombatUiState> {
        let session = self.sessions.get(&combat_id)?;
        let player = session.player().cloned();
        let is_player_turn = session.is_active && session.phase == CombatPhase::PlayerTurn;

        let available_actions = if is_player_turn {
            let has_mana = player
                .as_ref()
                .is_some_and(|p| p.current_mana >= SKILL_MANA_COST);
            let mut actions = vec![CombatActionType::Attack, CombatActionType::Defend];
            if has_mana {
                actions.push(CombatActionType::Skill);
            }
            actions.extend([
                CombatActionType::Item,
                CombatActionType::Flee,
                CombatActionType::Wait,
            ]);
            actions
        } else {
            Vec::new()
        };

        Some(CombatUiState {
            combat_id,
            round: session.round,
            phase: session.phase,
            is_active: session.is_active,
            is_player_turn,
            current_combatant_id: session.current_combatant().map(|c| c.id.clone()),
            player,
            enemies: session.enemies().cloned().collect(),
            available_actions,
            combat_log: session.recent_log(UI_LOG_ENTRIES).to_vec(),
        })
    }

    /// Drop the session. Returns whether it existed.
    pub fn end_combat(&self, combat_id: CombatId) -> bool {
        let removed = self.sessions.remove(&combat_id).is_some();
        if removed {
            tracing::info!(combat_id = %combat_id, "Combat ended");
        }
        removed
    }

    pub fn get_session(&self, combat_id: CombatId) -> Option<CombatSession> {
        self.sessions.get(&combat_id).map(|s| s.clone())
    }

    pub fn active_combat_count(&self) -> usize {
        self.sessions.iter().filter(|s| s.is_active).count()
    }

    /// Drop the oldest finished sessions beyond `max_active`.
    fn evict_finished(&self) {
        let mut finished: Vec<(DateTime<Utc>, CombatId)> = self
            .sessions
            .iter()
            .filter(|s| !s.is_active)
            .map(|s| (s.started_at, s.id))
            .collect();
        let keep = self.max_active;
        if finished.len() <= keep {
            return;
        }

        finished.sort_by_key(|(started_at, _)| *started_at);
        let excess = finished.len() - keep;
        for (_, id) in finished.into_iter().take(excess) {
            self.sessions.remove(&id);
            tracing::debug!(combat_id = %id, "Evicted finished combat");
        }
    }

    /// Move to the next combatant that can act, wrapping into a new round
    /// when the scan passes the end of the turn order.
    fn advance_turn(&self, session: &mut CombatSession, now: DateTime<Utc>) {
        let current = session.current_turn_index;
        let Some(mut next) = next_actionable_index(&session.turn_order, current) else {
            finish_without_actors(session, now);
            return;
        };

        if next <= current {
            session.round += 1;
            process_end_of_round(session);
            let round = session.round;
            session.push_log(CombatLogEntry::system(
                round,
                format!("--- Ronda {} ---", round),
                now,
            ));

            check_combat_end(session, now);
            if !session.is_active {
                return;
            }
            // Round-end damage may have taken out the combatant we picked.
            if !session.turn_order[next].can_act {
                match next_actionable_index(&session.turn_order, next) {
                    Some(index) => next = index,
                    None => {
                        finish_without_actors(session, now);
                        return;
                    }
                }
            }
        }

        session.current_turn_index = next;
        session.actions_remaining = 1;
        let is_player = match session.current_combatant_mut() {
            Some(c) => {
                c.is_defending = false;
                c.is_player
            }
            None => false,
        };
        session.phase = if is_player {
            CombatPhase::PlayerTurn
        } else {
            CombatPhase::EnemyTurn
        };
        if !is_player {
            self.refresh_intention(session, next);
        }
    }

    fn refresh_intention(&self, session: &mut CombatSession, index: usize) {
        let Some(enemy) = session.turn_order.get(index).filter(|c| c.is_enemy()) else {
            return;
        };
        let Some(player) = session.player() else {
            return;
        };
        let allies: Vec<&Combatant> = session.enemies().filter(|c| c.id != enemy.id).collect();
        let intention = self.ai.determine_intention(enemy, player, &allies);
        if let Some(enemy) = session.turn_order.get_mut(index) {
            enemy.intention = Some(intention);
        }
    }
}

/// Tick DOT/HOT effects, expire finished effects and regenerate stamina for
/// every living combatant. Effects on fallen combatants stay untouched.
pub fn process_end_of_round(session: &mut CombatSession) {
    for combatant in session.turn_order.iter_mut().filter(|c| c.is_alive()) {
        let mut effects = std::mem::take(&mut combatant.status_effects);
        for effect in effects.iter_mut() {
            match effect.effect_type {
                StatusEffectType::Dot => {
                    combatant.take_damage(effect.magnitude);
                }
                StatusEffectType::Hot => {
                    combatant.heal(effect.magnitude);
                }
                StatusEffectType::Buff | StatusEffectType::Debuff => {}
            }
            effect.duration = effect.duration.saturating_sub(1);
        }
        effects.retain(|e| !e.is_expired());
        combatant.status_effects = effects;
        combatant.restore_stamina(STAMINA_REGEN);
    }
}

/// Defeat is checked before victory. Returns the terminal phase when the
/// combat just ended.
pub fn check_combat_end(session: &mut CombatSession, now: DateTime<Utc>) -> Option<CombatPhase> {
    if !session.is_active {
        return None;
    }

    let player_down = session.player().map_or(true, |p| !p.is_alive());
    let (phase, message) = if player_down {
        (CombatPhase::Defeat, "Has sido derrotado.")
    } else if !session.any_enemy_alive() {
        (CombatPhase::Victory, "¡Victoria! Todos los enemigos han caído.")
    } else {
        return None;
    };

    session.phase = phase;
    session.is_active = false;
    session.push_log(CombatLogEntry::system(session.round, message, now));
    tracing::info!(
        combat_id = %session.id,
        phase = %phase,
        rounds = session.round,
        "Combat finished"
    );
    Some(phase)
}

fn finish_without_actors(session: &mut CombatSession, now: DateTime<Utc>) {
    if check_combat_end(session, now).is_none() && session.is_active {
        session.phase = CombatPhase::Defeat;
        session.is_active = false;
        session.push_log(CombatLogEntry::system(
            session.round,
            "Nadie puede seguir luchando.",
            now,
        ));
    }
}

fn log_action(
    session: &mut CombatSession,
    actor: &Combatant,
    action: &CombatAction,
    result: &ActionResult,
    now: DateTime<Utc>,
) {
    let target_name = action
        .target_id
        .as_deref()
        .and_then(|id| session.find(id))
        .map(|t| t.name.clone());
    session.push_log(CombatLogEntry {
        round: session.round,
        actor_id: Some(actor.id.clone()),
        actor_name: actor.name.clone(),
        action: Some(action.action_type),
        target_name,
        message: result.message.clone(),
        result: Some(result.clone()),
        timestamp: now,
    });
}

pub fn character_to_combatant(record: &CharacterRecord) -> Combatant {
    Combatant {
        id: record.id.clone(),
        name: record.name.clone(),
        is_player: true,
        template_id: None,
        initiative: 0,
        current_hp: record.current_hp,
        max_hp: record.max_hp,
        current_stamina: record.current_stamina,
        max_stamina: record.max_stamina,
        current_mana: record.current_mana,
        max_mana: record.max_mana,
        attributes: record.attributes,
        level: record.level,
        status_effects: Vec::new(),
        is_defending: false,
        can_act: record.current_hp > 0,
        intention: None,
    }
}

/// Build the `index`-th enemy. Unknown template ids get the baseline
/// stand-in but keep the requested id.
pub fn enemy_combatant(index: usize, template_id: &str) -> Combatant {
    let template = match enemy_template(template_id) {
        Some(t) => t.clone(),
        None => {
            tracing::warn!(template_id = template_id, "Unknown enemy template, using fallback");
            EnemyTemplate::unknown(template_id)
        }
    };
    Combatant {
        id: format!("enemy_{}_{}", index, template_id),
        name: template.name,
        is_player: false,
        template_id: Some(template_id.to_string()),
        initiative: 0,
        current_hp: template.max_hp,
        max_hp: template.max_hp,
        current_stamina: template.max_stamina,
        max_stamina: template.max_stamina,
        current_mana: template.max_mana,
        max_mana: template.max_mana,
        attributes: template.attributes,
        level: template.level,
        status_effects: Vec::new(),
        is_defending: false,
        can_act: true,
        intention: None,
    }
}
