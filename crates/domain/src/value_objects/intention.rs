//! Enemy intentions - the planned action shown to the player before an
//! enemy's turn resolves.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IntentionType {
    Attack,
    Defend,
    Skill,
    Flee,
    Heal,
    Buff,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Intention {
    #[serde(rename = "type")]
    pub intention_type: IntentionType,
    pub target_id: Option<String>,
    pub skill_id: Option<String>,
    /// Player-facing telegraph text
    pub description: String,
}

impl Intention {
    pub fn new(intention_type: IntentionType, description: impl Into<String>) -> Self {
        Self {
            intention_type,
            target_id: None,
            skill_id: None,
            description: description.into(),
        }
    }

    pub fn targeting(mut self, target_id: impl Into<String>) -> Self {
        self.target_id = Some(target_id.into());
        self
    }

    pub fn with_skill(mut self, skill_id: impl Into<String>) -> Self {
        self.skill_id = Some(skill_id.into());
        self
    }
}
