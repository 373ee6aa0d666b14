//! Enemy templates - static stat blocks combatants are built from.

use serde::{Deserialize, Serialize};

use crate::value_objects::Attributes;

/// Design-time enemy definition, keyed by `id` in the enemy registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnemyTemplate {
    pub id: String,
    pub name: String,
    pub level: u32,
    pub max_hp: i32,
    pub max_stamina: i32,
    pub max_mana: i32,
    pub attributes: Attributes,
    /// Skills the template knows; the behaviour profile decides when to use them
    pub skills: Vec<String>,
}

impl EnemyTemplate {
    pub const UNKNOWN_NAME: &'static str = "Enemigo desconocido";

    /// Baseline stand-in used when a requested id is not in the registry.
    pub fn unknown(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: Self::UNKNOWN_NAME.to_string(),
            level: 1,
            max_hp: 30,
            max_stamina: 20,
            max_mana: 0,
            attributes: Attributes::baseline(),
            skills: Vec::new(),
        }
    }
}
