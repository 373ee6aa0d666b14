//! Narrative manager - chapter lifecycle for one game session.
//!
//! Selects and instantiates chapter templates, drives phase transitions
//! through the [`PhaseTracker`], keeps tension and threads up to date and
//! records every change both in the narrative log and in an outbox of
//! [`NarrativeDomainEvent`]s the caller drains.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use lorekeep_domain::content::FALLBACK_CHAPTER_ID;
use lorekeep_domain::{
    interpolate, Chapter, ChapterCompletion, ChapterId, ChapterOutcome, ChapterTemplate,
    ComplicationConfig, HookId, Impact, NarrativeDomainEvent, NarrativeEventType, NarrativeHook,
    NarrativeLogEntry, NarrativeLogId, NarrativePhase, NarrativeState, NarrativeThread,
    PlayerContext, ResolutionConfig, ThreadId, ThreadImportance, ThreadStatus,
};

use super::error::NarrativeError;
use super::phase_tracker::PhaseTracker;
use crate::infrastructure::ports::{ClockPort, RandomPort};

pub const ACCEPTED_QUEST_PROGRESS: f64 = 10.0;
pub const COMPLETED_QUEST_PROGRESS: f64 = 15.0;
pub const DEFEATED_ENEMY_PROGRESS: f64 = 5.0;
pub const DEFEATED_ENEMY_TENSION: i32 = 3;

pub const BASE_UNIQUE_DROP_CHANCE: f64 = 0.02;
pub const CLIMAX_UNIQUE_DROP_CHANCE: f64 = 0.1;
pub const RESOLUTION_QUALITY_BONUS: f64 = 0.3;

/// Log entries included in the generated context.
const CONTEXT_RECENT_EVENTS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedChapter {
    pub chapter_id: ChapterId,
    pub template_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LootModifiers {
    pub quality_bonus: f64,
    pub unique_drop_chance: f64,
}

impl Default for LootModifiers {
    fn default() -> Self {
        Self {
            quality_bonus: 0.0,
            unique_drop_chance: BASE_UNIQUE_DROP_CHANCE,
        }
    }
}

/// What one `evaluate_progress` pass did.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressReport {
    pub from: NarrativePhase,
    pub transitioned_to: Option<NarrativePhase>,
    pub reason: String,
    pub complications: Vec<String>,
    pub tension_delta: i32,
    pub state: NarrativeState,
}

pub struct NarrativeManager {
    catalog: Arc<Vec<ChapterTemplate>>,
    tracker: PhaseTracker,
    clock: Arc<dyn ClockPort>,
    random: Arc<dyn RandomPort>,
    state: Option<NarrativeState>,
    template: Option<ChapterTemplate>,
    /// Sampled values for the active template's placeholders
    variables: BTreeMap<String, String>,
    completed: Vec<CompletedChapter>,
    player: PlayerContext,
    events: Vec<NarrativeDomainEvent>,
}

impl NarrativeManager {
    pub fn new(
        catalog: Arc<Vec<ChapterTemplate>>,
        clock: Arc<dyn ClockPort>,
        random: Arc<dyn RandomPort>,
    ) -> Self {
        Self {
            catalog,
            tracker: PhaseTracker::new(clock.now()),
            clock,
            random,
            state: None,
            template: None,
            variables: BTreeMap::new(),
            completed: Vec::new(),
            player: PlayerContext::default(),
            events: Vec::new(),
        }
    }

    pub fn with_player(mut self, player: PlayerContext) -> Self {
        self.player = player;
        self
    }

    pub fn set_player_context(&mut self, player: PlayerContext) {
        self.player = player;
    }

    pub fn player_context(&self) -> &PlayerContext {
        &self.player
    }

    /// Start a chapter from `force_template_id`, or from a weighted pick
    /// among the templates the player currently qualifies for.
    pub fn start_new_chapter(
        &mut self,
        force_template_id: Option<&str>,
    ) -> Result<NarrativeState, NarrativeError> {
        let now = self.clock.now();
        let template = match force_template_id {
            Some(id) => self
                .catalog
                .iter()
                .find(|t| t.id == id)
                .cloned()
                .ok_or_else(|| NarrativeError::TemplateNotFound(id.to_string()))?,
            None => self.select_template()?.clone(),
        };

        self.tracker.reset_for_new_chapter(now);
        self.variables = sample_variables(&template, self.random.as_ref());

        let number = u32::try_from(self.completed.len())
            .unwrap_or(u32::MAX)
            .saturating_add(1);
        let chapter = Chapter {
            id: ChapterId::from_uuid(self.random.gen_uuid()),
            number,
            chapter_type: template.chapter_type,
            title: interpolate(&template.title_template, &self.variables),
            main_conflict: interpolate(&template.conflict_template, &self.variables),
            setting: interpolate(&template.setting_template, &self.variables),
            antagonist: template
                .antagonist
                .as_deref()
                .map(|a| interpolate(a, &self.variables)),
            started_at: now,
            completed: false,
            outcome: None,
            template_id: template.id.clone(),
        };

        let mut state = NarrativeState::new(chapter, template.hook.tension_boost);
        let hook_text = interpolate(&template.hook.description_template, &self.variables);
        state.push_log(log_entry(
            &state,
            self.random.as_ref(),
            now,
            NarrativeEventType::ChapterStarted,
            Impact::Major,
            0,
            format!(
                "Capítulo {}: {}. {}",
                number, state.chapter.title, hook_text
            ),
        ));

        self.events.push(NarrativeDomainEvent::ChapterStarted {
            chapter_id: state.chapter.id,
            template_id: template.id.clone(),
            title: state.chapter.title.clone(),
        });
        tracing::info!(
            chapter_id = %state.chapter.id,
            template_id = %template.id,
            number = number,
            tension = state.tension_level,
            "Chapter started"
        );

        self.template = Some(template);
        self.state = Some(state.clone());
        Ok(state)
    }

    /// Close the active chapter with `outcome`. The template must define a
    /// resolution for that outcome.
    pub fn complete_chapter(
        &mut self,
        outcome: ChapterOutcome,
    ) -> Result<ChapterCompletion, NarrativeError> {
        let completion = {
            let mut scope = self.scope()?;
            let template = scope.template;
            let resolution = template
                .resolution_for(outcome)
                .ok_or(NarrativeError::NoResolution(outcome))?;
            scope.complete(resolution)
        };

        self.completed.push(CompletedChapter {
            chapter_id: completion.chapter_id,
            template_id: completion.template_id.clone(),
        });
        tracing::info!(
            chapter_id = %completion.chapter_id,
            template_id = %completion.template_id,
            outcome = %outcome,
            duration_secs = completion.duration_secs,
            "Chapter completed"
        );
        Ok(completion)
    }

    /// Main pacing entry point: refresh session time, evaluate the tracker
    /// and apply whatever it decided.
    pub fn evaluate_progress(&mut self) -> Result<ProgressReport, NarrativeError> {
        let mut scope = self.scope()?;
        scope.state.session_time = (scope.now - scope.state.chapter.started_at).num_seconds();

        let from = scope.state.phase;
        let evaluation =
            scope
                .tracker
                .evaluate_transition(scope.state, scope.template, scope.now, scope.random);

        if let Some(to) = evaluation.transition {
            scope.transition(to, &evaluation.reason);
        }
        for complication in &evaluation.complications {
            scope.apply_complication(complication);
        }
        if evaluation.tension_delta != 0 {
            scope.adjust_tension(evaluation.tension_delta, "Ritmo narrativo");
        }

        tracing::debug!(
            chapter_id = %scope.state.chapter.id,
            phase = %scope.state.phase,
            tension = scope.state.tension_level,
            complications = evaluation.complications.len(),
            reason = %evaluation.reason,
            "Narrative progress evaluated"
        );

        Ok(ProgressReport {
            from,
            transitioned_to: evaluation.transition,
            complications: evaluation
                .complications
                .iter()
                .map(|c| c.id.clone())
                .collect(),
            tension_delta: evaluation.tension_delta,
            reason: evaluation.reason,
            state: scope.state.clone(),
        })
    }

    /// Returns the new phase progress.
    pub fn advance_phase_progress(&mut self, amount: f64) -> Result<f64, NarrativeError> {
        let scope = self.scope()?;
        scope.state.advance_phase_progress(amount);
        Ok(scope.state.phase_progress)
    }

    pub fn force_phase_transition(
        &mut self,
        phase: NarrativePhase,
    ) -> Result<NarrativeState, NarrativeError> {
        let mut scope = self.scope()?;
        scope.transition(phase, "Transición forzada");
        Ok(scope.state.clone())
    }

    pub fn introduce_thread(
        &mut self,
        description: impl Into<String>,
        importance: ThreadImportance,
        related_quests: Vec<String>,
    ) -> Result<NarrativeThread, NarrativeError> {
        let mut scope = self.scope()?;
        Ok(scope.introduce_thread(description.into(), importance, related_quests))
    }

    pub fn advance_thread(
        &mut self,
        thread_id: ThreadId,
        status: ThreadStatus,
    ) -> Result<NarrativeThread, NarrativeError> {
        self.scope()?.update_thread(thread_id, status)
    }

    pub fn resolve_thread(&mut self, thread_id: ThreadId) -> Result<NarrativeThread, NarrativeError> {
        self.advance_thread(thread_id, ThreadStatus::Resolved)
    }

    /// Returns the tension after clamping.
    pub fn adjust_tension(&mut self, delta: i32, reason: &str) -> Result<i32, NarrativeError> {
        Ok(self.scope()?.adjust_tension(delta, reason))
    }

    pub fn set_tension(&mut self, value: i32, reason: &str) -> Result<i32, NarrativeError> {
        Ok(self.scope()?.set_tension(value, reason))
    }

    /// Record a gameplay action. A few well-known actions move pacing
    /// directly.
    pub fn register_player_action(&mut self, action: &str) -> Result<NarrativeState, NarrativeError> {
        let mut scope = self.scope()?;
        scope.tracker.register_player_action(action);
        scope.record(
            NarrativeEventType::PlayerAction,
            Impact::Minor,
            0,
            format!("Acción del jugador: {}", action),
        );

        match action {
            "accepted_quest" => scope.state.advance_phase_progress(ACCEPTED_QUEST_PROGRESS),
            "completed_quest" => scope.state.advance_phase_progress(COMPLETED_QUEST_PROGRESS),
            "defeated_enemy" => {
                scope.state.advance_phase_progress(DEFEATED_ENEMY_PROGRESS);
                scope.adjust_tension(DEFEATED_ENEMY_TENSION, "Enemigo derrotado");
            }
            _ => {}
        }
        Ok(scope.state.clone())
    }

    pub fn register_boss_defeated(&mut self) -> Result<(), NarrativeError> {
        let mut scope = self.scope()?;
        scope.tracker.mark_boss_defeated();
        scope.record(
            NarrativeEventType::PlayerAction,
            Impact::Major,
            0,
            "Jefe derrotado".to_string(),
        );
        Ok(())
    }

    pub fn register_main_objective_complete(&mut self) -> Result<(), NarrativeError> {
        let mut scope = self.scope()?;
        scope.tracker.mark_main_objective_complete();
        scope.record(
            NarrativeEventType::PlayerAction,
            Impact::Major,
            0,
            "Objetivo principal cumplido".to_string(),
        );
        Ok(())
    }

    /// Mark a named story event as fired for transition conditions.
    pub fn register_event(&mut self, event: &str) -> Result<(), NarrativeError> {
        let scope = self.scope()?;
        scope.tracker.register_event(event);
        tracing::debug!(event = event, "Narrative event registered");
        Ok(())
    }

    /// Prompt text for an external text generator describing where the
    /// story stands.
    pub fn generate_narrative_context(&self) -> Result<String, NarrativeError> {
        let state = self.state.as_ref().ok_or(NarrativeError::NoActiveChapter)?;
        let chapter = &state.chapter;

        let mut lines = vec![
            format!("Capítulo {}: {}", chapter.number, chapter.title),
            format!("Conflicto principal: {}", chapter.main_conflict),
            format!("Escenario: {}", chapter.setting),
        ];
        if let Some(antagonist) = &chapter.antagonist {
            lines.push(format!("Antagonista: {}", antagonist));
        }
        lines.push(format!(
            "Fase: {} ({:.0}% del capítulo)",
            state.phase.display_name(),
            state.chapter_progress()
        ));
        lines.push(format!("Tensión: {}/100", state.tension_level));
        lines.push(format!("Guía: {}", state.phase.guidance()));

        let open: Vec<_> = state.open_threads().collect();
        if !open.is_empty() {
            lines.push("Hilos abiertos:".to_string());
            for thread in open {
                lines.push(format!(
                    "- [{}] {} ({})",
                    importance_label(thread.importance),
                    thread.description,
                    status_label(thread.status)
                ));
            }
        }

        let skip = state.narrative_log.len().saturating_sub(CONTEXT_RECENT_EVENTS);
        let recent = &state.narrative_log[skip..];
        if !recent.is_empty() {
            lines.push("Sucesos recientes:".to_string());
            for entry in recent {
                lines.push(format!("- {}", entry.description));
            }
        }

        Ok(lines.join("\n"))
    }

    /// Enemy scaling for the current phase, 1.0 without a chapter.
    pub fn get_combat_scaling(&self) -> f64 {
        match (&self.state, &self.template) {
            (Some(state), Some(template)) => {
                template.climax.enemy_scaling * state.phase.combat_scaling_factor()
            }
            _ => 1.0,
        }
    }

    pub fn get_loot_modifiers(&self) -> LootModifiers {
        match self.state.as_ref().map(|s| s.phase) {
            Some(NarrativePhase::Resolution) => LootModifiers {
                quality_bonus: RESOLUTION_QUALITY_BONUS,
                ..LootModifiers::default()
            },
            Some(NarrativePhase::Climax) => LootModifiers {
                unique_drop_chance: CLIMAX_UNIQUE_DROP_CHANCE,
                ..LootModifiers::default()
            },
            _ => LootModifiers::default(),
        }
    }

    pub fn get_suggested_quests(&self) -> Vec<String> {
        let (Some(state), Some(template)) = (&self.state, &self.template) else {
            return Vec::new();
        };
        match state.phase {
            NarrativePhase::Hook => template.hook.quest_pool.clone(),
            NarrativePhase::Development => state
                .open_threads()
                .flat_map(|t| t.related_quests.iter().cloned())
                .collect(),
            NarrativePhase::Climax | NarrativePhase::Resolution => Vec::new(),
        }
    }

    pub fn get_state(&self) -> Option<&NarrativeState> {
        self.state.as_ref()
    }

    pub fn get_chapter(&self) -> Option<&Chapter> {
        self.state.as_ref().map(|s| &s.chapter)
    }

    pub fn get_completed_chapters(&self) -> &[CompletedChapter] {
        &self.completed
    }

    pub fn tracker(&self) -> &PhaseTracker {
        &self.tracker
    }

    /// Take every event recorded since the last drain, oldest first.
    pub fn drain_events(&mut self) -> Vec<NarrativeDomainEvent> {
        std::mem::take(&mut self.events)
    }

    fn select_template(&self) -> Result<&ChapterTemplate, NarrativeError> {
        let completed: Vec<String> = self
            .completed
            .iter()
            .map(|c| c.template_id.clone())
            .collect();
        let eligible: Vec<&ChapterTemplate> = self
            .catalog
            .iter()
            .filter(|t| t.requirements.is_satisfied_by(&self.player, &completed))
            .collect();

        if eligible.is_empty() {
            tracing::warn!(
                level = self.player.level,
                "No eligible chapter template, using fallback"
            );
            return self
                .catalog
                .iter()
                .find(|t| t.id == FALLBACK_CHAPTER_ID)
                .or_else(|| self.catalog.first())
                .ok_or(NarrativeError::NoEligibleTemplate);
        }

        weighted_pick(&eligible, self.random.as_ref()).ok_or(NarrativeError::NoEligibleTemplate)
    }

    /// Borrow everything an operation on the active chapter needs.
    fn scope(&mut self) -> Result<ChapterScope<'_>, NarrativeError> {
        let state = match self.state.as_mut() {
            Some(state) if !state.chapter.completed => state,
            _ => return Err(NarrativeError::NoActiveChapter),
        };
        let template = self.template.as_ref().ok_or(NarrativeError::NoActiveChapter)?;
        Ok(ChapterScope {
            state,
            template,
            variables: &self.variables,
            tracker: &mut self.tracker,
            events: &mut self.events,
            random: self.random.as_ref(),
            now: self.clock.now(),
        })
    }
}

/// Mutable view over the active chapter for the duration of one operation.
struct ChapterScope<'a> {
    state: &'a mut NarrativeState,
    template: &'a ChapterTemplate,
    variables: &'a BTreeMap<String, String>,
    tracker: &'a mut PhaseTracker,
    events: &'a mut Vec<NarrativeDomainEvent>,
    random: &'a dyn RandomPort,
    now: DateTime<Utc>,
}

impl ChapterScope<'_> {
    fn record(
        &mut self,
        event_type: NarrativeEventType,
        impact: Impact,
        tension_delta: i32,
        description: String,
    ) {
        let entry = log_entry(
            self.state,
            self.random,
            self.now,
            event_type,
            impact,
            tension_delta,
            description,
        );
        self.state.push_log(entry);
    }

    fn adjust_tension(&mut self, delta: i32, reason: &str) -> i32 {
        let (previous, current) = self.state.adjust_tension(delta);
        self.tension_changed(previous, current, reason);
        current
    }

    fn set_tension(&mut self, value: i32, reason: &str) -> i32 {
        let (previous, current) = self.state.set_tension(value);
        self.tension_changed(previous, current, reason);
        current
    }

    fn tension_changed(&mut self, previous: i32, current: i32, reason: &str) {
        if previous == current {
            return;
        }
        let delta = current - previous;
        let impact = match delta.abs() {
            0..=4 => Impact::Minor,
            5..=14 => Impact::Moderate,
            _ => Impact::Major,
        };
        self.record(
            NarrativeEventType::TensionChange,
            impact,
            delta,
            format!("Tensión {} -> {}: {}", previous, current, reason),
        );
        self.events.push(NarrativeDomainEvent::TensionChanged {
            previous,
            current,
            reason: reason.to_string(),
        });
    }

    /// Enter `to`: progress and phase timer restart, tension takes one step
    /// toward the new band.
    fn transition(&mut self, to: NarrativePhase, reason: &str) {
        let from = self.state.phase;
        self.state.phase = to;
        self.state.phase_progress = 0.0;
        self.tracker.reset_for_new_phase(self.now);

        self.record(
            NarrativeEventType::PhaseTransition,
            Impact::Major,
            0,
            format!(
                "{} -> {}: {}",
                from.display_name(),
                to.display_name(),
                reason
            ),
        );
        self.events.push(NarrativeDomainEvent::PhaseChanged {
            from,
            to,
            reason: reason.to_string(),
        });
        tracing::info!(
            chapter_id = %self.state.chapter.id,
            from = %from,
            to = %to,
            reason = reason,
            "Narrative phase changed"
        );

        let nudge = to.tension_band().nudge(self.state.tension_level);
        if nudge != 0 {
            self.adjust_tension(nudge, "Cambio de fase");
        }
    }

    fn introduce_thread(
        &mut self,
        description: String,
        importance: ThreadImportance,
        related_quests: Vec<String>,
    ) -> NarrativeThread {
        let mut thread = NarrativeThread::new(
            ThreadId::from_uuid(self.random.gen_uuid()),
            description,
            importance,
        );
        thread.related_quests = related_quests;

        let impact = match importance {
            ThreadImportance::Main => Impact::Moderate,
            ThreadImportance::Side | ThreadImportance::Background => Impact::Minor,
        };
        self.record(
            NarrativeEventType::ThreadIntroduced,
            impact,
            0,
            format!("Nuevo hilo: {}", thread.description),
        );
        self.events.push(NarrativeDomainEvent::ThreadIntroduced {
            thread_id: thread.id,
            description: thread.description.clone(),
        });
        self.state.threads.push(thread.clone());
        thread
    }

    fn update_thread(
        &mut self,
        thread_id: ThreadId,
        status: ThreadStatus,
    ) -> Result<NarrativeThread, NarrativeError> {
        let thread = {
            let thread = self
                .state
                .find_thread_mut(thread_id)
                .ok_or(NarrativeError::ThreadNotFound(thread_id))?;
            thread.status = status;
            thread.clone()
        };

        let (event_type, label) = if status == ThreadStatus::Resolved {
            (NarrativeEventType::ThreadResolved, "Hilo resuelto")
        } else {
            (NarrativeEventType::ThreadAdvanced, "Hilo avanzado")
        };
        self.record(
            event_type,
            Impact::Minor,
            0,
            format!("{}: {}", label, thread.description),
        );
        self.events
            .push(NarrativeDomainEvent::ThreadUpdated { thread_id, status });
        Ok(thread)
    }

    /// Log the complication (tagged with its id) and open its thread, if
    /// any. Its tension delta is part of the evaluation's total.
    fn apply_complication(&mut self, complication: &ComplicationConfig) {
        let text = interpolate(&complication.description_template, self.variables);
        self.record(
            NarrativeEventType::Complication,
            Impact::Moderate,
            complication.tension_delta,
            format!("[{}] {}", complication.id, text),
        );
        self.events.push(NarrativeDomainEvent::ComplicationTriggered {
            complication_id: complication.id.clone(),
            description: text,
            tension_delta: complication.tension_delta,
        });
        tracing::info!(
            chapter_id = %self.state.chapter.id,
            complication_id = %complication.id,
            "Complication triggered"
        );

        if let Some(spec) = &complication.new_thread {
            let description = interpolate(&spec.description_template, self.variables);
            self.introduce_thread(description, spec.importance, Vec::new());
        }
    }

    fn complete(&mut self, resolution: &ResolutionConfig) -> ChapterCompletion {
        let duration_secs = (self.now - self.state.chapter.started_at).num_seconds();
        self.state.chapter.completed = true;
        self.state.chapter.outcome = Some(resolution.outcome);
        self.state.session_time = duration_secs;

        let next_hooks: Vec<NarrativeHook> = resolution
            .next_hooks
            .iter()
            .map(|spec| NarrativeHook {
                id: HookId::from_uuid(self.random.gen_uuid()),
                description: interpolate(&spec.description_template, self.variables),
                hook_type: spec.hook_type.unwrap_or_default(),
                urgency: spec.urgency.unwrap_or_default(),
            })
            .collect();
        self.state.next_chapter_hooks = next_hooks.clone();

        let epilogue = interpolate(&resolution.epilogue_template, self.variables);
        self.record(
            NarrativeEventType::ChapterCompleted,
            Impact::Major,
            0,
            format!("Capítulo completado ({}): {}", resolution.outcome, epilogue),
        );

        let completion = ChapterCompletion {
            chapter_id: self.state.chapter.id,
            template_id: self.template.id.clone(),
            outcome: resolution.outcome,
            rewards: resolution.rewards.clone(),
            next_hooks,
            epilogue,
            duration_secs,
        };
        self.events
            .push(NarrativeDomainEvent::ChapterCompleted(completion.clone()));
        completion
    }
}

fn log_entry(
    state: &NarrativeState,
    random: &dyn RandomPort,
    now: DateTime<Utc>,
    event_type: NarrativeEventType,
    impact: Impact,
    tension_delta: i32,
    description: String,
) -> NarrativeLogEntry {
    NarrativeLogEntry {
        id: NarrativeLogId::from_uuid(random.gen_uuid()),
        timestamp: now,
        phase: state.phase,
        event_type,
        description,
        impact,
        tension_delta,
    }
}

/// One uniformly sampled option per variable pool. Empty pools are skipped.
fn sample_variables(template: &ChapterTemplate, random: &dyn RandomPort) -> BTreeMap<String, String> {
    template
        .variables
        .iter()
        .filter_map(|(name, pool)| {
            let last = i32::try_from(pool.len().checked_sub(1)?).unwrap_or(i32::MAX);
            let index = usize::try_from(random.gen_range(0, last)).unwrap_or(0);
            pool.get(index).map(|value| (name.clone(), value.clone()))
        })
        .collect()
}

/// Cumulative-subtraction roll over the candidates' weights. All-zero
/// weights pick the first candidate.
fn weighted_pick<'a>(
    candidates: &[&'a ChapterTemplate],
    random: &dyn RandomPort,
) -> Option<&'a ChapterTemplate> {
    let total: u32 = candidates.iter().map(|t| t.weight).sum();
    if total == 0 {
        return candidates.first().copied();
    }

    let mut roll = random.gen_float() * f64::from(total);
    for candidate in candidates {
        let weight = f64::from(candidate.weight);
        if roll < weight {
            return Some(*candidate);
        }
        roll -= weight;
    }
    candidates.last().copied()
}

fn importance_label(importance: ThreadImportance) -> &'static str {
    match importance {
        ThreadImportance::Main => "PRINCIPAL",
        ThreadImportance::Side => "SECUNDARIO",
        ThreadImportance::Background => "TRASFONDO",
    }
}

fn status_label(status: ThreadStatus) -> &'static str {
    match status {
        ThreadStatus::Introduced => "presentado",
        ThreadStatus::Developing => "en desarrollo",
        ThreadStatus::ReadyForResolution => "listo para resolverse",
        ThreadStatus::Resolved => "resuelto",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::{FixedRandom, ManualClock};
    use lorekeep_domain::content::{chapter_template, chapter_templates};
    use lorekeep_domain::{HookType, Urgency};

    fn manager_with(
        catalog: Vec<ChapterTemplate>,
        random: impl RandomPort + 'static,
    ) -> (NarrativeManager, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let manager = NarrativeManager::new(Arc::new(catalog), clock.clone(), Arc::new(random));
        (manager, clock)
    }

    fn manager(random: impl RandomPort + 'static) -> (NarrativeManager, Arc<ManualClock>) {
        manager_with(chapter_templates().to_vec(), random)
    }

    fn tutorial(random: impl RandomPort + 'static) -> (NarrativeManager, Arc<ManualClock>) {
        let (mut m, clock) = manager(random);
        m.start_new_chapter(Some("tutorial")).unwrap();
        m.drain_events();
        (m, clock)
    }

    #[test]
    fn new_chapter_instantiates_template_text() {
        let (mut m, _) = manager(FixedRandom(0.0, 0));
        let state = m.start_new_chapter(None).unwrap();

        assert_eq!(state.chapter.template_id, "tutorial");
        assert_eq!(state.chapter.title, "El despertar en Brezo");
        assert_eq!(state.chapter.number, 1);
        assert_eq!(state.phase, NarrativePhase::Hook);
        assert_eq!(state.phase_progress, 0.0);
        assert_eq!(state.tension_level, 15);
        assert!(state.threads.is_empty());
        assert_eq!(state.narrative_log.len(), 1);
        assert!(state.narrative_log[0]
            .description
            .contains("el herrero Tomás pide ayuda"));

        let events = m.drain_events();
        assert!(matches!(
            events.as_slice(),
            [NarrativeDomainEvent::ChapterStarted { template_id, .. }] if template_id == "tutorial"
        ));
        assert!(m.drain_events().is_empty());
    }

    #[test]
    fn forced_unknown_template_fails() {
        let (mut m, _) = manager(FixedRandom(0.0, 0));
        let err = m.start_new_chapter(Some("dragon_lair")).unwrap_err();
        assert!(matches!(err, NarrativeError::TemplateNotFound(id) if id == "dragon_lair"));
        assert!(m.get_state().is_none());
    }

    #[test]
    fn weighted_selection_walks_cumulative_weights() {
        // level 1: tutorial (10) and missing_merchant (6); 0.7 * 16 = 11.2
        let (m, _) = manager(FixedRandom(0.7, 0));
        let mut m = m.with_player(PlayerContext {
            level: 1,
            ..Default::default()
        });
        let state = m.start_new_chapter(None).unwrap();
        assert_eq!(state.chapter.template_id, "missing_merchant");
    }

    #[test]
    fn prerequisites_use_completed_template_ids() {
        let (mut m, _) = manager(FixedRandom(0.0, 0));
        m.start_new_chapter(Some("tutorial")).unwrap();
        m.complete_chapter(ChapterOutcome::Victory).unwrap();

        m.set_player_context(PlayerContext {
            level: 4,
            ..Default::default()
        });
        let state = m.start_new_chapter(None).unwrap();
        assert_eq!(state.chapter.template_id, "goblin_raid");
        assert_eq!(state.chapter.number, 2);
        assert_eq!(m.get_completed_chapters().len(), 1);
        assert_eq!(m.get_completed_chapters()[0].template_id, "tutorial");
    }

    #[test]
    fn nothing_eligible_falls_back() {
        let mut gated = chapter_template("tutorial").unwrap().clone();
        gated.requirements.min_level = Some(9);
        let raid = chapter_template("goblin_raid").unwrap().clone();

        let (mut m, _) = manager_with(vec![raid.clone(), gated], FixedRandom(0.0, 0));
        assert_eq!(
            m.start_new_chapter(None).unwrap().chapter.template_id,
            "tutorial"
        );

        let (mut m, _) = manager_with(vec![raid], FixedRandom(0.0, 0));
        assert_eq!(
            m.start_new_chapter(None).unwrap().chapter.template_id,
            "goblin_raid"
        );

        let (mut m, _) = manager_with(Vec::new(), FixedRandom(0.0, 0));
        assert!(matches!(
            m.start_new_chapter(None),
            Err(NarrativeError::NoEligibleTemplate)
        ));
    }

    #[test]
    fn completing_with_undefined_outcome_fails() {
        let mut template = chapter_template("missing_merchant").unwrap().clone();
        template
            .resolutions
            .retain(|r| r.outcome != ChapterOutcome::Victory);
        let (mut m, _) = manager_with(vec![template], FixedRandom(0.0, 0));
        m.start_new_chapter(Some("missing_merchant")).unwrap();

        let err = m.complete_chapter(ChapterOutcome::Victory).unwrap_err();
        assert_eq!(
            err.to_string(),
            "No se encontró resolución para outcome: VICTORY"
        );
        assert!(!m.get_chapter().unwrap().completed);
        assert!(m.get_completed_chapters().is_empty());
    }

    #[test]
    fn completion_materializes_hooks_and_rewards() {
        let (mut m, clock) = tutorial(FixedRandom(0.0, 0));
        clock.advance_minutes(30);

        let completion = m.complete_chapter(ChapterOutcome::Defeat).unwrap();
        assert_eq!(completion.template_id, "tutorial");
        assert_eq!(completion.rewards.experience, 25);
        assert_eq!(completion.duration_secs, 1800);
        assert_eq!(completion.epilogue, "Despiertas en Brezo, magullado pero vivo.");
        assert_eq!(completion.next_hooks.len(), 1);
        let hook = &completion.next_hooks[0];
        assert_eq!(hook.description, "Alguien te arrastró de vuelta a Brezo");
        assert_eq!(hook.hook_type, HookType::Mystery);
        assert_eq!(hook.urgency, Urgency::Medium);

        let chapter = m.get_chapter().unwrap();
        assert!(chapter.completed);
        assert_eq!(chapter.outcome, Some(ChapterOutcome::Defeat));
        assert_eq!(m.get_state().unwrap().next_chapter_hooks.len(), 1);

        assert!(matches!(
            m.drain_events().last(),
            Some(NarrativeDomainEvent::ChapterCompleted(c)) if c.outcome == ChapterOutcome::Defeat
        ));
        assert!(matches!(
            m.evaluate_progress(),
            Err(NarrativeError::NoActiveChapter)
        ));
        assert!(matches!(
            m.complete_chapter(ChapterOutcome::Victory),
            Err(NarrativeError::NoActiveChapter)
        ));
    }

    #[test]
    fn accepted_quest_moves_hook_to_development() {
        let (mut m, clock) = tutorial(FixedRandom(0.9, 0));
        clock.advance_minutes(1);

        let state = m.register_player_action("accepted_quest").unwrap();
        assert_eq!(state.phase_progress, 10.0);

        let report = m.evaluate_progress().unwrap();
        assert_eq!(report.from, NarrativePhase::Hook);
        assert_eq!(report.transitioned_to, Some(NarrativePhase::Development));
        assert_eq!(report.state.phase, NarrativePhase::Development);
        assert_eq!(report.state.phase_progress, 0.0);
        assert_eq!(m.tracker().phase_started_at(), clock.now());
        // 15 -> 20 on entering the phase, then the pass's own +5
        assert_eq!(report.state.tension_level, 25);
        assert_eq!(report.state.session_time, 60);

        let events = m.drain_events();
        assert!(matches!(events[0], NarrativeDomainEvent::PhaseChanged { to: NarrativePhase::Development, .. }));
        assert!(matches!(events[1], NarrativeDomainEvent::TensionChanged { previous: 15, current: 20, .. }));
        assert!(matches!(events[2], NarrativeDomainEvent::TensionChanged { previous: 20, current: 25, .. }));
    }

    #[test]
    fn hook_times_out_after_five_minutes() {
        let (mut m, clock) = tutorial(FixedRandom(0.9, 0));
        clock.advance_minutes(4);
        assert_eq!(m.evaluate_progress().unwrap().transitioned_to, None);
        clock.advance_minutes(1);
        assert_eq!(
            m.evaluate_progress().unwrap().transitioned_to,
            Some(NarrativePhase::Development)
        );
    }

    #[test]
    fn complication_fires_once_and_opens_thread() {
        let (mut m, _) = tutorial(FixedRandom(0.9, 0));
        m.force_phase_transition(NarrativePhase::Development).unwrap();
        assert_eq!(m.get_state().unwrap().tension_level, 20);
        m.advance_phase_progress(30.0).unwrap();
        m.drain_events();

        let report = m.evaluate_progress().unwrap();
        assert_eq!(report.transitioned_to, None);
        assert_eq!(report.complications, ["tutorial_ambush"]);
        // +10 from the ambush, +5 toward the CLIMAX band
        assert_eq!(report.tension_delta, 15);
        assert_eq!(report.state.tension_level, 35);
        assert_eq!(report.state.threads.len(), 1);
        assert_eq!(
            report.state.threads[0].description,
            "Rescatar a el herrero Tomás de los goblins"
        );
        assert!(report.state.log_mentions("[tutorial_ambush] Un grupo de goblins"));

        let events = m.drain_events();
        assert!(matches!(events[0], NarrativeDomainEvent::ComplicationTriggered { .. }));
        assert!(matches!(events[1], NarrativeDomainEvent::ThreadIntroduced { .. }));
        assert!(matches!(events[2], NarrativeDomainEvent::TensionChanged { .. }));

        let again = m.evaluate_progress().unwrap();
        assert!(again.complications.is_empty());
        assert_eq!(again.state.threads.len(), 1);
    }

    #[test]
    fn boss_defeat_resolves_the_climax() {
        let (mut m, _) = tutorial(FixedRandom(0.9, 0));
        m.force_phase_transition(NarrativePhase::Climax).unwrap();
        assert_eq!(m.evaluate_progress().unwrap().transitioned_to, None);

        m.register_boss_defeated().unwrap();
        let report = m.evaluate_progress().unwrap();
        assert_eq!(report.transitioned_to, Some(NarrativePhase::Resolution));
    }

    #[test]
    fn defeated_enemy_moves_progress_and_tension() {
        let (mut m, _) = tutorial(FixedRandom(0.9, 0));
        let state = m.register_player_action("defeated_enemy").unwrap();
        assert_eq!(state.phase_progress, 5.0);
        assert_eq!(state.tension_level, 18);

        let state = m.register_player_action("completed_quest").unwrap();
        assert_eq!(state.phase_progress, 20.0);

        let state = m.register_player_action("opened_door").unwrap();
        assert_eq!(state.phase_progress, 20.0);
        assert!(m.tracker().has_player_action("opened_door"));
    }

    #[test]
    fn threads_advance_and_resolve() {
        let (mut m, _) = tutorial(FixedRandom(0.9, 0));
        let thread = m
            .introduce_thread("¿Quién paga a los goblins?", ThreadImportance::Main, vec!["q_x".into()])
            .unwrap();
        assert_eq!(thread.status, ThreadStatus::Introduced);

        let advanced = m
            .advance_thread(thread.id, ThreadStatus::ReadyForResolution)
            .unwrap();
        assert_eq!(advanced.status, ThreadStatus::ReadyForResolution);
        let resolved = m.resolve_thread(thread.id).unwrap();
        assert_eq!(resolved.status, ThreadStatus::Resolved);
        assert_eq!(
            m.get_state()
                .unwrap()
                .threads_with_status(ThreadStatus::Resolved),
            1
        );

        let missing = ThreadId::new();
        assert!(matches!(
            m.resolve_thread(missing),
            Err(NarrativeError::ThreadNotFound(id)) if id == missing
        ));
    }

    #[test]
    fn tension_is_clamped_through_the_manager() {
        let (mut m, _) = tutorial(FixedRandom(0.9, 0));
        for _ in 0..20 {
            m.adjust_tension(30, "prueba").unwrap();
        }
        assert_eq!(m.get_state().unwrap().tension_level, 100);
        assert_eq!(m.set_tension(-40, "prueba").unwrap(), 0);
        assert_eq!(m.adjust_tension(-10, "prueba").unwrap(), 0);
    }

    #[test]
    fn combat_scaling_follows_phase() {
        let (mut m, _) = manager(FixedRandom(0.9, 0));
        assert_eq!(m.get_combat_scaling(), 1.0);

        m.start_new_chapter(Some("tutorial")).unwrap();
        assert!((m.get_combat_scaling() - 0.8 * 0.7).abs() < 1e-9);
        m.force_phase_transition(NarrativePhase::Climax).unwrap();
        assert!((m.get_combat_scaling() - 0.8 * 1.2).abs() < 1e-9);
    }

    #[test]
    fn loot_modifiers_by_phase() {
        let (mut m, _) = tutorial(FixedRandom(0.9, 0));
        assert_eq!(m.get_loot_modifiers(), LootModifiers::default());

        m.force_phase_transition(NarrativePhase::Climax).unwrap();
        let climax = m.get_loot_modifiers();
        assert_eq!(climax.unique_drop_chance, 0.1);
        assert_eq!(climax.quality_bonus, 0.0);

        m.force_phase_transition(NarrativePhase::Resolution).unwrap();
        let resolution = m.get_loot_modifiers();
        assert_eq!(resolution.quality_bonus, 0.3);
        assert_eq!(resolution.unique_drop_chance, 0.02);
    }

    #[test]
    fn suggested_quests_by_phase() {
        let (mut m, _) = tutorial(FixedRandom(0.9, 0));
        assert_eq!(
            m.get_suggested_quests(),
            ["q_tutorial_goblins", "q_tutorial_supplies"]
        );

        m.force_phase_transition(NarrativePhase::Development).unwrap();
        let thread = m
            .introduce_thread("Pista", ThreadImportance::Side, vec!["q_follow_tracks".into()])
            .unwrap();
        assert_eq!(m.get_suggested_quests(), ["q_follow_tracks"]);
        m.resolve_thread(thread.id).unwrap();
        assert!(m.get_suggested_quests().is_empty());

        m.force_phase_transition(NarrativePhase::Climax).unwrap();
        assert!(m.get_suggested_quests().is_empty());
    }

    #[test]
    fn narrative_context_describes_the_chapter() {
        let (mut m, _) = tutorial(FixedRandom(0.0, 0));
        m.introduce_thread("Los goblins roban grano", ThreadImportance::Main, Vec::new())
            .unwrap();

        let context = m.generate_narrative_context().unwrap();
        assert!(context.starts_with("Capítulo 1: El despertar en Brezo"));
        assert!(context.contains("Antagonista: Jefe goblin"));
        assert!(context.contains("Fase: Gancho (0% del capítulo)"));
        assert!(context.contains("Tensión: 15/100"));
        assert!(context.contains(NarrativePhase::Hook.guidance()));
        assert!(context.contains("- [PRINCIPAL] Los goblins roban grano (presentado)"));
        assert!(context.contains("Sucesos recientes:"));
    }

    #[test]
    fn operations_without_chapter_fail() {
        let (mut m, _) = manager(FixedRandom(0.9, 0));
        assert!(matches!(
            m.evaluate_progress(),
            Err(NarrativeError::NoActiveChapter)
        ));
        assert!(matches!(
            m.register_player_action("accepted_quest"),
            Err(NarrativeError::NoActiveChapter)
        ));
        assert!(m.generate_narrative_context().is_err());
        assert!(m.get_suggested_quests().is_empty());
    }
}
