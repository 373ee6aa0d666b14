//! Character record - the slice of a player character the combat core reads.
//!
//! The full character lives in the surrounding persistence layer; combat only
//! needs identity, level, resource pools and the attribute block.

use serde::{Deserialize, Serialize};

use crate::value_objects::Attributes;
use crate::DomainError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterRecord {
    pub id: String,
    pub name: String,
    pub level: u32,
    pub current_hp: i32,
    pub max_hp: i32,
    pub current_stamina: i32,
    pub max_stamina: i32,
    pub current_mana: i32,
    pub max_mana: i32,
    pub attributes: Attributes,
}

impl CharacterRecord {
    /// Check the record is usable as a combat snapshot.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.id.trim().is_empty() {
            return Err(DomainError::validation("character id cannot be empty"));
        }
        if self.max_hp <= 0 {
            return Err(DomainError::validation("max hp must be positive"));
        }
        if self.current_hp < 0 || self.current_hp > self.max_hp {
            return Err(DomainError::validation(format!(
                "current hp {} outside [0, {}]",
                self.current_hp, self.max_hp
            )));
        }
        Ok(())
    }
}
