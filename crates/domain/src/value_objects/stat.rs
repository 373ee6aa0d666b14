//! Attribute value objects - the seven-attribute block every combatant carries.
//!
//! Provides type safety for attribute references instead of magic strings
//! like "strength" when status effects name the stat they modify.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::DomainError;

/// A single character attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Stat {
    /// Physical power, drives base damage
    Strength,
    /// Agility, drives hit chance, crit chance and initiative
    Dexterity,
    /// Endurance, reduces incoming damage
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
    /// Fortune, improves crits and loot rolls
    Luck,
}

impl Stat {
    /// Returns the lowercase wire name (e.g., "strength").
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strength => "strength",
            Self::Dexterity => "dexterity",
            Self::Constitution => "constitution",
            Self::Intelligence => "intelligence",
            Self::Wisdom => "wisdom",
            Self::Charisma => "charisma",
            Self::Luck => "luck",
        }
    }

    /// Returns the Spanish label shown in combat messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Strength => "fuerza",
            Self::Dexterity => "destreza",
            Self::Constitution => "constitución",
            Self::Intelligence => "inteligencia",
            Self::Wisdom => "sabiduría",
            Self::Charisma => "carisma",
            Self::Luck => "suerte",
        }
    }

    pub fn all() -> [Stat; 7] {
        [
            Self::Strength,
            Self::Dexterity,
            Self::Constitution,
            Self::Intelligence,
            Self::Wisdom,
            Self::Charisma,
            Self::Luck,
        ]
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Stat {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "str" | "strength" => Ok(Self::Strength),
            "dex" | "dexterity" => Ok(Self::Dexterity),
            "con" | "constitution" => Ok(Self::Constitution),
            "int" | "intelligence" => Ok(Self::Intelligence),
            "wis" | "wisdom" => Ok(Self::Wisdom),
            "cha" | "charisma" => Ok(Self::Charisma),
            "luck" | "lck" => Ok(Self::Luck),
            other => Err(DomainError::parse(format!("Unknown attribute: {}", other))),
        }
    }
}

/// Attribute block: strength, dexterity, constitution, intelligence,
/// wisdom, charisma, luck. 10 is the baseline for every attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attributes {
    pub strength: i32,
    pub dexterity: i32,
    pub constitution: i32,
    pub intelligence: i32,
    pub wisdom: i32,
    pub charisma: i32,
    pub luck: i32,
}

impl Attributes {
    pub const BASELINE: i32 = 10;

    pub fn new(
        strength: i32,
        dexterity: i32,
        constitution: i32,
        intelligence: i32,
        wisdom: i32,
        charisma: i32,
        luck: i32,
    ) -> Self {
        Self {
            strength,
            dexterity,
            constitution,
            intelligence,
            wisdom,
            charisma,
            luck,
        }
    }

    /// All attributes at the baseline value.
    pub fn baseline() -> Self {
        Self::uniform(Self::BASELINE)
    }

    pub fn uniform(value: i32) -> Self {
        Self::new(value, value, value, value, value, value, value)
    }

    pub fn get(&self, stat: Stat) -> i32 {
        match stat {
            Stat::Strength => self.strength,
            Stat::Dexterity => self.dexterity,
            Stat::Constitution => self.constitution,
            Stat::Intelligence => self.intelligence,
            Stat::Wisdom => self.wisdom,
            Stat::Charisma => self.charisma,
            Stat::Luck => self.luck,
        }
    }

    pub fn set(&mut self, stat: Stat, value: i32) {
        match stat {
            Stat::Strength => self.strength = value,
            Stat::Dexterity => self.dexterity = value,
            Stat::Constitution => self.constitution = value,
            Stat::Intelligence => self.intelligence = value,
            Stat::Wisdom => self.wisdom = value,
            Stat::Charisma => self.charisma = value,
            Stat::Luck => self.luck = value,
        }
    }

    /// d20-style modifier: `floor((value - 10) / 2)`.
    pub fn modifier(&self, stat: Stat) -> i32 {
        (self.get(stat) - Self::BASELINE).div_euclid(2)
    }
}

impl Default for Attributes {
    fn default() -> Self {
        Self::baseline()
    }
}
