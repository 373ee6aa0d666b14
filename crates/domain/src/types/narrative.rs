//! Narrative pacing vocabulary
//!
//! Phases, thread tiers and statuses, chapter kinds and outcomes, hook kinds.
//! The per-phase numbers (progress ranges, tension bands, combat scaling)
//! live here so every consumer reads the same table.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Chapter pacing phase.
///
/// Chapters move HOOK -> DEVELOPMENT -> CLIMAX -> RESOLUTION.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NarrativePhase {
    /// Introduce the conflict and pull the player in
    #[default]
    Hook,
    /// Complications, threads, rising stakes
    Development,
    /// Confrontation
    Climax,
    /// Aftermath and loose ends
    Resolution,
}

impl NarrativePhase {
    pub fn all() -> &'static [NarrativePhase] {
        &[
            NarrativePhase::Hook,
            NarrativePhase::Development,
            NarrativePhase::Climax,
            NarrativePhase::Resolution,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NarrativePhase::Hook => "HOOK",
            NarrativePhase::Development => "DEVELOPMENT",
            NarrativePhase::Climax => "CLIMAX",
            NarrativePhase::Resolution => "RESOLUTION",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            NarrativePhase::Hook => "Gancho",
            NarrativePhase::Development => "Desarrollo",
            NarrativePhase::Climax => "Clímax",
            NarrativePhase::Resolution => "Resolución",
        }
    }

    /// Slice of overall chapter progress (in percent) this phase covers.
    pub fn progress_range(&self) -> ProgressRange {
        match self {
            NarrativePhase::Hook => ProgressRange::new(0.0, 15.0),
            NarrativePhase::Development => ProgressRange::new(15.0, 65.0),
            NarrativePhase::Climax => ProgressRange::new(65.0, 85.0),
            NarrativePhase::Resolution => ProgressRange::new(85.0, 100.0),
        }
    }

    /// Tension band the pacing logic pulls toward while in this phase.
    pub fn tension_band(&self) -> TensionBand {
        match self {
            NarrativePhase::Hook => TensionBand::new(10, 30, 20),
            NarrativePhase::Development => TensionBand::new(30, 60, 45),
            NarrativePhase::Climax => TensionBand::new(70, 100, 85),
            NarrativePhase::Resolution => TensionBand::new(10, 40, 25),
        }
    }

    /// Multiplier applied to the template's climax enemy scaling.
    pub fn combat_scaling_factor(&self) -> f64 {
        match self {
            NarrativePhase::Hook => 0.7,
            NarrativePhase::Development => 0.9,
            NarrativePhase::Climax => 1.2,
            NarrativePhase::Resolution => 0.5,
        }
    }

    /// Guidance line handed to the text generator for this phase.
    pub fn guidance(&self) -> &'static str {
        match self {
            NarrativePhase::Hook => {
                "Presenta el conflicto, despierta la curiosidad del jugador y ofrece una razón clara para involucrarse."
            }
            NarrativePhase::Development => {
                "Introduce complicaciones, desarrolla los hilos abiertos y eleva las apuestas poco a poco."
            }
            NarrativePhase::Climax => {
                "Lleva el conflicto a su punto máximo: confrontación directa, decisiones difíciles y consecuencias inmediatas."
            }
            NarrativePhase::Resolution => {
                "Cierra los hilos principales, muestra las consecuencias y siembra ganchos para el próximo capítulo."
            }
        }
    }
}

impl fmt::Display for NarrativePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for NarrativePhase {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "HOOK" => Ok(NarrativePhase::Hook),
            "DEVELOPMENT" => Ok(NarrativePhase::Development),
            "CLIMAX" => Ok(NarrativePhase::Climax),
            "RESOLUTION" => Ok(NarrativePhase::Resolution),
            other => Err(DomainError::parse(format!("Unknown narrative phase: {}", other))),
        }
    }
}

/// Inclusive percent range `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressRange {
    pub min: f64,
    pub max: f64,
}

impl ProgressRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Map a 0-100 phase progress into this range.
    pub fn interpolate(&self, phase_progress: f64) -> f64 {
        self.min + (phase_progress / 100.0) * (self.max - self.min)
    }
}

/// Tension band with a preferred target value inside `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TensionBand {
    pub min: i32,
    pub max: i32,
    pub target: i32,
}

impl TensionBand {
    /// Step applied when tension sits outside the band.
    pub const OUTSIDE_STEP: i32 = 5;
    /// Step applied when tension is inside the band but off target.
    pub const INSIDE_STEP: i32 = 2;

    pub fn new(min: i32, max: i32, target: i32) -> Self {
        Self { min, max, target }
    }

    /// Homeostatic nudge pulling `tension` toward this band.
    pub fn nudge(&self, tension: i32) -> i32 {
        if tension < self.min {
            Self::OUTSIDE_STEP
        } else if tension > self.max {
            -Self::OUTSIDE_STEP
        } else if tension < self.target {
            Self::INSIDE_STEP
        } else if tension > self.target {
            -Self::INSIDE_STEP
        } else {
            0
        }
    }
}

/// Clamp any tension value into `[0, 100]`.
pub fn clamp_tension(value: i32) -> i32 {
    value.clamp(0, 100)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ThreadImportance {
    Main,
    Side,
    Background,
}

/// Subplot status. Progression is forward by convention, not enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ThreadStatus {
    #[default]
    Introduced,
    Developing,
    ReadyForResolution,
    Resolved,
}

impl ThreadStatus {
    pub fn is_open(&self) -> bool {
        !matches!(self, ThreadStatus::Resolved)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChapterType {
    Tutorial,
    Combat,
    Mystery,
    Exploration,
    Social,
    Horror,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChapterOutcome {
    Victory,
    PartialVictory,
    Defeat,
    Retreat,
}

impl ChapterOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChapterOutcome::Victory => "VICTORY",
            ChapterOutcome::PartialVictory => "PARTIAL_VICTORY",
            ChapterOutcome::Defeat => "DEFEAT",
            ChapterOutcome::Retreat => "RETREAT",
        }
    }
}

impl fmt::Display for ChapterOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ChapterOutcome {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "VICTORY" => Ok(ChapterOutcome::Victory),
            "PARTIAL_VICTORY" => Ok(ChapterOutcome::PartialVictory),
            "DEFEAT" => Ok(ChapterOutcome::Defeat),
            "RETREAT" => Ok(ChapterOutcome::Retreat),
            other => Err(DomainError::parse(format!("Unknown chapter outcome: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HookType {
    #[default]
    Mystery,
    Threat,
    Opportunity,
    Personal,
    Rumor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Urgency {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}
