//! Chapter templates - static design-time chapter blueprints.
//!
//! Text fields are templates with `{variable}` placeholders, filled from one
//! option sampled per variable pool when the chapter starts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{ChapterOutcome, ChapterType, HookType, ThreadImportance, Urgency};

/// Caller-supplied facts used to decide template eligibility.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerContext {
    pub level: u32,
    pub location: Option<String>,
    pub inventory: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChapterRequirements {
    pub min_level: Option<u32>,
    pub max_level: Option<u32>,
    /// Template ids of chapters that must already be completed
    pub prerequisites: Vec<String>,
    pub required_location: Option<String>,
    pub required_items: Vec<String>,
}

impl ChapterRequirements {
    pub fn is_satisfied_by(&self, player: &PlayerContext, completed_templates: &[String]) -> bool {
        if self.min_level.is_some_and(|min| player.level < min) {
            return false;
        }
        if self.max_level.is_some_and(|max| player.level > max) {
            return false;
        }
        if !self
            .prerequisites
            .iter()
            .all(|p| completed_templates.contains(p))
        {
            return false;
        }
        if let Some(required) = &self.required_location {
            if player.location.as_deref() != Some(required.as_str()) {
                return false;
            }
        }
        self.required_items
            .iter()
            .all(|item| player.inventory.contains(item))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HookConfig {
    pub description_template: String,
    /// Initial tension of the chapter
    pub tension_boost: i32,
    pub quest_pool: Vec<String>,
}

/// When a complication may fire. Only evaluated during DEVELOPMENT.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplicationTrigger {
    /// Minutes since the current phase started
    TimeElapsed { minutes: f64 },
    /// Chapter progress percentage
    Progress { percent: f64 },
    PlayerAction { action: String },
    RandomChance { chance: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadSpec {
    pub description_template: String,
    pub importance: ThreadImportance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplicationConfig {
    pub id: String,
    pub description_template: String,
    pub trigger: ComplicationTrigger,
    pub tension_delta: i32,
    pub new_thread: Option<ThreadSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClimaxConfig {
    pub description_template: String,
    pub enemy_scaling: f64,
    pub boss_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RewardSpec {
    pub experience: u32,
    pub gold: u32,
    pub items: Vec<String>,
    pub reputation: i32,
}

/// Hook blueprint. Missing type/urgency default to MYSTERY/MEDIUM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HookSpec {
    pub description_template: String,
    #[serde(rename = "type")]
    pub hook_type: Option<HookType>,
    pub urgency: Option<Urgency>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionConfig {
    pub outcome: ChapterOutcome,
    pub rewards: RewardSpec,
    pub next_hooks: Vec<HookSpec>,
    pub epilogue_template: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterTemplate {
    pub id: String,
    #[serde(rename = "type")]
    pub chapter_type: ChapterType,
    pub title_template: String,
    pub conflict_template: String,
    pub setting_template: String,
    pub antagonist: Option<String>,
    pub requirements: ChapterRequirements,
    pub hook: HookConfig,
    pub complications: Vec<ComplicationConfig>,
    pub climax: ClimaxConfig,
    pub resolutions: Vec<ResolutionConfig>,
    /// Relative selection weight
    pub weight: u32,
    pub variables: BTreeMap<String, Vec<String>>,
}

impl ChapterTemplate {
    pub fn resolution_for(&self, outcome: ChapterOutcome) -> Option<&ResolutionConfig> {
        self.resolutions.iter().find(|r| r.outcome == outcome)
    }
}

/// Replace every `{name}` in `template` with its value. Unknown placeholders
/// are left as-is.
pub fn interpolate(template: &str, variables: &BTreeMap<String, String>) -> String {
    let mut out = template.to_string();
    for (name, value) in variables {
        out = out.replace(&format!("{{{}}}", name), value);
    }
    out
}
