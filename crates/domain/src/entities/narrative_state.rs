//! Narrative state - one per game session.
//!
//! # Invariants
//!
//! - `tension_level` is always within `[0, 100]`
//! - `phase_progress` is always within `[0, 100]` and resets to 0 on every
//!   phase transition
//! - `narrative_log` keeps at most [`NarrativeState::MAX_LOG_ENTRIES`] entries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{
    clamp_tension, ChapterOutcome, ChapterType, HookType, NarrativePhase, ThreadImportance,
    ThreadStatus, Urgency,
};
use crate::{ChapterId, HookId, NarrativeLogId, ThreadId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub id: ChapterId,
    pub number: u32,
    #[serde(rename = "type")]
    pub chapter_type: ChapterType,
    pub title: String,
    pub main_conflict: String,
    pub setting: String,
    pub antagonist: Option<String>,
    pub started_at: DateTime<Utc>,
    pub completed: bool,
    pub outcome: Option<ChapterOutcome>,
    pub template_id: String,
}

/// Tracked subplot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrativeThread {
    pub id: ThreadId,
    pub description: String,
    pub importance: ThreadImportance,
    pub status: ThreadStatus,
    pub related_quests: Vec<String>,
    pub characters: Vec<String>,
    pub foreshadowing: Vec<String>,
}

impl NarrativeThread {
    pub fn new(id: ThreadId, description: impl Into<String>, importance: ThreadImportance) -> Self {
        Self {
            id,
            description: description.into(),
            importance,
            status: ThreadStatus::Introduced,
            related_quests: Vec::new(),
            characters: Vec::new(),
            foreshadowing: Vec::new(),
        }
    }
}

/// Dangling plot element carried into the next chapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrativeHook {
    pub id: HookId,
    pub description: String,
    #[serde(rename = "type")]
    pub hook_type: HookType,
    pub urgency: Urgency,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NarrativeEventType {
    ChapterStarted,
    PhaseTransition,
    Complication,
    ThreadIntroduced,
    ThreadAdvanced,
    ThreadResolved,
    TensionChange,
    PlayerAction,
    ChapterCompleted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Impact {
    Minor,
    Moderate,
    Major,
}

/// One entry of the narrative event log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrativeLogEntry {
    pub id: NarrativeLogId,
    pub timestamp: DateTime<Utc>,
    pub phase: NarrativePhase,
    #[serde(rename = "type")]
    pub event_type: NarrativeEventType,
    pub description: String,
    pub impact: Impact,
    pub tension_delta: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrativeState {
    pub chapter: Chapter,
    pub phase: NarrativePhase,
    /// Progress within the current phase, 0-100
    pub phase_progress: f64,
    /// Dramatic intensity, 0-100
    pub tension_level: i32,
    pub threads: Vec<NarrativeThread>,
    pub next_chapter_hooks: Vec<NarrativeHook>,
    /// Seconds of wall-clock time since the chapter started
    pub session_time: i64,
    pub narrative_log: Vec<NarrativeLogEntry>,
}

impl NarrativeState {
    pub const MAX_LOG_ENTRIES: usize = 50;

    /// Fresh state at the start of a chapter: HOOK, no progress, empty
    /// threads and log.
    pub fn new(chapter: Chapter, initial_tension: i32) -> Self {
        Self {
            chapter,
            phase: NarrativePhase::Hook,
            phase_progress: 0.0,
            tension_level: clamp_tension(initial_tension),
            threads: Vec::new(),
            next_chapter_hooks: Vec::new(),
            session_time: 0,
            narrative_log: Vec::new(),
        }
    }

    /// Apply `delta` with clamping. Returns `(previous, current)`.
    pub fn adjust_tension(&mut self, delta: i32) -> (i32, i32) {
        let previous = self.tension_level;
        self.tension_level = clamp_tension(previous.saturating_add(delta));
        (previous, self.tension_level)
    }

    /// Overwrite tension with clamping. Returns `(previous, current)`.
    pub fn set_tension(&mut self, value: i32) -> (i32, i32) {
        let previous = self.tension_level;
        self.tension_level = clamp_tension(value);
        (previous, self.tension_level)
    }

    /// Add to phase progress, clamped to `[0, 100]`.
    pub fn advance_phase_progress(&mut self, amount: f64) {
        self.phase_progress = (self.phase_progress + amount).clamp(0.0, 100.0);
    }

    /// Overall chapter progress in percent, derived from the phase's range.
    pub fn chapter_progress(&self) -> f64 {
        self.phase.progress_range().interpolate(self.phase_progress)
    }

    /// Append to the log, dropping the oldest entries past the cap.
    pub fn push_log(&mut self, entry: NarrativeLogEntry) {
        self.narrative_log.push(entry);
        if self.narrative_log.len() > Self::MAX_LOG_ENTRIES {
            let overflow = self.narrative_log.len() - Self::MAX_LOG_ENTRIES;
            self.narrative_log.drain(..overflow);
        }
    }

    /// Substring search over logged descriptions.
    pub fn log_mentions(&self, needle: &str) -> bool {
        self.narrative_log
            .iter()
            .any(|entry| entry.description.contains(needle))
    }

    pub fn threads_with_status(&self, status: ThreadStatus) -> usize {
        self.threads.iter().filter(|t| t.status == status).count()
    }

    pub fn open_threads(&self) -> impl Iterator<Item = &NarrativeThread> {
        self.threads.iter().filter(|t| t.status.is_open())
    }

    pub fn find_thread_mut(&mut self, id: ThreadId) -> Option<&mut NarrativeThread> {
        self.threads.iter_mut().find(|t| t.id == id)
    }
}
