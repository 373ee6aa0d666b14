//! Narrative pacing.
//!
//! A chapter moves through HOOK, DEVELOPMENT, CLIMAX and RESOLUTION. The
//! [`PhaseTracker`] decides when conditions for the next phase hold and which
//! complications are due; the [`NarrativeManager`] owns the chapter state and
//! applies those decisions. [`NarrativeSessions`] keeps one manager per game
//! session.

mod error;
mod manager;
mod phase_tracker;
mod sessions;

pub use error::NarrativeError;
pub use manager::{
    CompletedChapter, LootModifiers, NarrativeManager, ProgressReport, ACCEPTED_QUEST_PROGRESS,
    BASE_UNIQUE_DROP_CHANCE, CLIMAX_UNIQUE_DROP_CHANCE, COMPLETED_QUEST_PROGRESS,
    DEFEATED_ENEMY_PROGRESS, DEFEATED_ENEMY_TENSION, RESOLUTION_QUALITY_BONUS,
};
pub use phase_tracker::{
    default_transitions, PhaseTracker, PhaseTransition, TransitionCondition, TransitionEvaluation,
};
pub use sessions::NarrativeSessions;
