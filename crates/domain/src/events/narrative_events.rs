//! Narrative domain events
//!
//! The narrative manager records these in emission order and hands them out
//! through its outbox. Within one evaluation pass a phase change is recorded
//! before the complications that pass fires.

use serde::{Deserialize, Serialize};

use crate::entities::{NarrativeHook, RewardSpec};
use crate::types::{ChapterOutcome, NarrativePhase, ThreadStatus};
use crate::{ChapterId, ThreadId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NarrativeDomainEvent {
    #[serde(rename_all = "camelCase")]
    ChapterStarted {
        chapter_id: ChapterId,
        template_id: String,
        title: String,
    },
    ChapterCompleted(ChapterCompletion),
    #[serde(rename_all = "camelCase")]
    PhaseChanged {
        from: NarrativePhase,
        to: NarrativePhase,
        reason: String,
    },
    #[serde(rename_all = "camelCase")]
    TensionChanged {
        previous: i32,
        current: i32,
        reason: String,
    },
    #[serde(rename_all = "camelCase")]
    ThreadIntroduced {
        thread_id: ThreadId,
        description: String,
    },
    #[serde(rename_all = "camelCase")]
    ThreadUpdated {
        thread_id: ThreadId,
        status: ThreadStatus,
    },
    #[serde(rename_all = "camelCase")]
    ComplicationTriggered {
        complication_id: String,
        description: String,
        tension_delta: i32,
    },
}

/// Returned by chapter completion; carries the rewards and the hooks the
/// next chapter can pick up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterCompletion {
    pub chapter_id: ChapterId,
    pub template_id: String,
    pub outcome: ChapterOutcome,
    pub rewards: RewardSpec,
    pub next_hooks: Vec<NarrativeHook>,
    pub epilogue: String,
    pub duration_secs: i64,
}
