//! Phase tracker - decides when a chapter moves to its next phase.
//!
//! The tracker owns the chapter-scoped facts that feed transition
//! conditions (fired events, recorded player actions, phase timer,
//! boss/objective flags). It never mutates the narrative state itself:
//! [`PhaseTracker::evaluate_transition`] returns what should happen and the
//! manager applies it.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use lorekeep_domain::{
    ChapterTemplate, ComplicationConfig, ComplicationTrigger, NarrativePhase, NarrativeState,
    ThreadStatus,
};

use crate::infrastructure::ports::RandomPort;

/// One named condition of a phase transition.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransitionCondition {
    /// Minutes since the current phase started
    TimeInPhase { minutes: f64 },
    EventTriggered { event: String },
    PlayerAction { action: String },
    /// Overall chapter progress, in percent
    ProgressAtLeast { percent: f64 },
    ThreadsReady { count: usize },
    BossDefeated,
    MainObjectiveComplete,
}

impl TransitionCondition {
    fn describe(&self) -> String {
        match self {
            TransitionCondition::TimeInPhase { minutes } => {
                format!("{} minutos en la fase", minutes)
            }
            TransitionCondition::EventTriggered { event } => format!("evento {}", event),
            TransitionCondition::PlayerAction { action } => format!("acción {}", action),
            TransitionCondition::ProgressAtLeast { percent } => {
                format!("progreso del capítulo >= {}%", percent)
            }
            TransitionCondition::ThreadsReady { count } => {
                format!("{} hilo(s) listos para resolverse", count)
            }
            TransitionCondition::BossDefeated => "jefe derrotado".to_string(),
            TransitionCondition::MainObjectiveComplete => "objetivo principal cumplido".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseTransition {
    pub from: NarrativePhase,
    pub to: NarrativePhase,
    pub conditions: Vec<TransitionCondition>,
    pub require_all: bool,
    /// Used when `require_all` is false
    pub min_conditions: usize,
}

impl PhaseTransition {
    /// Number of satisfied conditions needed for this transition to fire.
    pub fn threshold(&self) -> usize {
        if self.require_all {
            self.conditions.len()
        } else {
            self.min_conditions
        }
    }
}

/// HOOK -> DEVELOPMENT -> CLIMAX -> RESOLUTION.
pub fn default_transitions() -> Vec<PhaseTransition> {
    vec![
        PhaseTransition {
            from: NarrativePhase::Hook,
            to: NarrativePhase::Development,
            conditions: vec![
                TransitionCondition::TimeInPhase { minutes: 5.0 },
                TransitionCondition::PlayerAction {
                    action: "accepted_quest".into(),
                },
                TransitionCondition::ProgressAtLeast { percent: 10.0 },
            ],
            require_all: false,
            min_conditions: 1,
        },
        PhaseTransition {
            from: NarrativePhase::Development,
            to: NarrativePhase::Climax,
            conditions: vec![
                TransitionCondition::TimeInPhase { minutes: 20.0 },
                TransitionCondition::ThreadsReady { count: 1 },
                TransitionCondition::ProgressAtLeast { percent: 60.0 },
                TransitionCondition::EventTriggered {
                    event: "climax_ready".into(),
                },
            ],
            require_all: false,
            min_conditions: 2,
        },
        PhaseTransition {
            from: NarrativePhase::Climax,
            to: NarrativePhase::Resolution,
            conditions: vec![
                TransitionCondition::BossDefeated,
                TransitionCondition::MainObjectiveComplete,
            ],
            require_all: false,
            min_conditions: 1,
        },
    ]
}

/// Outcome of one evaluation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionEvaluation {
    /// Phase to move to, when the transition fires
    pub transition: Option<NarrativePhase>,
    pub reason: String,
    /// Complications whose trigger holds and that have not been logged yet
    pub complications: Vec<ComplicationConfig>,
    /// Complication deltas plus the pull toward the target phase's band
    pub tension_delta: i32,
}

pub struct PhaseTracker {
    transitions: Vec<PhaseTransition>,
    fired_events: HashSet<String>,
    player_actions: Vec<String>,
    phase_started_at: DateTime<Utc>,
    boss_defeated: bool,
    main_objective_complete: bool,
}

impl PhaseTracker {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self::with_transitions(default_transitions(), now)
    }

    pub fn with_transitions(transitions: Vec<PhaseTransition>, now: DateTime<Utc>) -> Self {
        Self {
            transitions,
            fired_events: HashSet::new(),
            player_actions: Vec::new(),
            phase_started_at: now,
            boss_defeated: false,
            main_objective_complete: false,
        }
    }

    pub fn transitions(&self) -> &[PhaseTransition] {
        &self.transitions
    }

    pub fn register_event(&mut self, event: impl Into<String>) {
        self.fired_events.insert(event.into());
    }

    pub fn register_player_action(&mut self, action: impl Into<String>) {
        self.player_actions.push(action.into());
    }

    pub fn mark_boss_defeated(&mut self) {
        self.boss_defeated = true;
    }

    pub fn mark_main_objective_complete(&mut self) {
        self.main_objective_complete = true;
    }

    pub fn has_event(&self, event: &str) -> bool {
        self.fired_events.contains(event)
    }

    pub fn has_player_action(&self, action: &str) -> bool {
        self.player_actions.iter().any(|a| a == action)
    }

    pub fn phase_started_at(&self) -> DateTime<Utc> {
        self.phase_started_at
    }

    pub fn minutes_in_phase(&self, now: DateTime<Utc>) -> f64 {
        (now - self.phase_started_at).num_seconds() as f64 / 60.0
    }

    /// Restart the phase timer. Events, actions and flags carry over.
    pub fn reset_for_new_phase(&mut self, now: DateTime<Utc>) {
        self.phase_started_at = now;
    }

    /// Forget everything tied to the previous chapter.
    pub fn reset_for_new_chapter(&mut self, now: DateTime<Utc>) {
        self.fired_events.clear();
        self.player_actions.clear();
        self.boss_defeated = false;
        self.main_objective_complete = false;
        self.phase_started_at = now;
    }

    pub fn evaluate_transition(
        &self,
        state: &NarrativeState,
        template: &ChapterTemplate,
        now: DateTime<Utc>,
        random: &dyn RandomPort,
    ) -> TransitionEvaluation {
        let complications = if state.phase == NarrativePhase::Development {
            self.due_complications(state, template, now, random)
        } else {
            Vec::new()
        };
        let complication_delta: i32 = complications.iter().map(|c| c.tension_delta).sum();

        let Some(transition) = self.transitions.iter().find(|t| t.from == state.phase) else {
            let nudge = state.phase.tension_band().nudge(state.tension_level);
            return TransitionEvaluation {
                transition: None,
                reason: format!("No hay transición definida desde {}", state.phase),
                complications,
                tension_delta: complication_delta + nudge,
            };
        };

        let satisfied: Vec<String> = transition
            .conditions
            .iter()
            .filter(|c| self.condition_holds(c, state, now))
            .map(TransitionCondition::describe)
            .collect();
        let threshold = transition.threshold();
        let fires = satisfied.len() >= threshold;

        let reason = if fires {
            format!(
                "{} -> {}: {}",
                transition.from,
                transition.to,
                satisfied.join(", ")
            )
        } else {
            format!(
                "Condiciones cumplidas {}/{} (se requieren {})",
                satisfied.len(),
                transition.conditions.len(),
                threshold
            )
        };

        // Drift toward the band of the implied phase even when nothing fires.
        let nudge = transition.to.tension_band().nudge(state.tension_level);

        TransitionEvaluation {
            transition: fires.then_some(transition.to),
            reason,
            complications,
            tension_delta: complication_delta + nudge,
        }
    }

    fn condition_holds(
        &self,
        condition: &TransitionCondition,
        state: &NarrativeState,
        now: DateTime<Utc>,
    ) -> bool {
        match condition {
            TransitionCondition::TimeInPhase { minutes } => self.minutes_in_phase(now) >= *minutes,
            TransitionCondition::EventTriggered { event } => self.has_event(event),
            TransitionCondition::PlayerAction { action } => self.has_player_action(action),
            TransitionCondition::ProgressAtLeast { percent } => {
                state.chapter_progress() >= *percent
            }
            TransitionCondition::ThreadsReady { count } => {
                state.threads_with_status(ThreadStatus::ReadyForResolution) >= *count
            }
            TransitionCondition::BossDefeated => self.boss_defeated,
            TransitionCondition::MainObjectiveComplete => self.main_objective_complete,
        }
    }

    /// Complications are de-duplicated by looking for their id anywhere in
    /// the logged descriptions.
    fn due_complications(
        &self,
        state: &NarrativeState,
        template: &ChapterTemplate,
        now: DateTime<Utc>,
        random: &dyn RandomPort,
    ) -> Vec<ComplicationConfig> {
        template
            .complications
            .iter()
            .filter(|c| !state.log_mentions(&c.id))
            .filter(|c| match &c.trigger {
                ComplicationTrigger::TimeElapsed { minutes } => {
                    self.minutes_in_phase(now) >= *minutes
                }
                ComplicationTrigger::Progress { percent } => state.chapter_progress() >= *percent,
                ComplicationTrigger::PlayerAction { action } => self.has_player_action(action),
                ComplicationTrigger::RandomChance { chance } => random.gen_float() < *chance,
            })
            .cloned()
            .collect()
    }
}
