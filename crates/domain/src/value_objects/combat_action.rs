//! Combat actions and their resolved results.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of action a combatant can take on its turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CombatActionType {
    Attack,
    Defend,
    Skill,
    Item,
    Flee,
    Wait,
}

impl CombatActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Attack => "ATTACK",
            Self::Defend => "DEFEND",
            Self::Skill => "SKILL",
            Self::Item => "ITEM",
            Self::Flee => "FLEE",
            Self::Wait => "WAIT",
        }
    }
}

impl fmt::Display for CombatActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A transient request to act, consumed by the resolution step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatAction {
    #[serde(rename = "type")]
    pub action_type: CombatActionType,
    pub actor_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,
}

impl CombatAction {
    fn bare(action_type: CombatActionType, actor_id: impl Into<String>) -> Self {
        Self {
            action_type,
            actor_id: actor_id.into(),
            target_id: None,
            skill_id: None,
            item_id: None,
        }
    }

    pub fn attack(actor_id: impl Into<String>, target_id: impl Into<String>) -> Self {
        let mut action = Self::bare(CombatActionType::Attack, actor_id);
        action.target_id = Some(target_id.into());
        action
    }

    pub fn defend(actor_id: impl Into<String>) -> Self {
        Self::bare(CombatActionType::Defend, actor_id)
    }

    pub fn skill(
        actor_id: impl Into<String>,
        skill_id: impl Into<String>,
        target_id: Option<String>,
    ) -> Self {
        let mut action = Self::bare(CombatActionType::Skill, actor_id);
        action.skill_id = Some(skill_id.into());
        action.target_id = target_id;
        action
    }

    pub fn item(actor_id: impl Into<String>, item_id: impl Into<String>) -> Self {
        let mut action = Self::bare(CombatActionType::Item, actor_id);
        action.item_id = Some(item_id.into());
        action
    }

    pub fn flee(actor_id: impl Into<String>) -> Self {
        Self::bare(CombatActionType::Flee, actor_id)
    }

    pub fn wait(actor_id: impl Into<String>) -> Self {
        Self::bare(CombatActionType::Wait, actor_id)
    }
}

/// Outcome of resolving one [`CombatAction`].
///
/// Soft failures (unknown skill, unknown item, missing target) come back
/// as `success: false` with a message rather than as errors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResult {
    pub success: bool,
    pub message: String,
    pub damage: i32,
    pub healing: i32,
    pub is_critical: bool,
    pub is_miss: bool,
    pub target_killed: bool,
    pub fled: bool,
    pub effects_applied: Vec<String>,
}

impl ActionResult {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            ..Default::default()
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_wire_shape_uses_type_and_camel_case() {
        let action = CombatAction::attack("pc-1", "enemy_0_goblin");
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["type"], "ATTACK");
        assert_eq!(json["actorId"], "pc-1");
        assert_eq!(json["targetId"], "enemy_0_goblin");
        assert!(json.get("skillId").is_none());
    }

    #[test]
    fn action_parses_without_optional_fields() {
        let action: CombatAction =
            serde_json::from_str(r#"{"type":"FLEE","actorId":"pc-1"}"#).unwrap();
        assert_eq!(action, CombatAction::flee("pc-1"));
    }
}
