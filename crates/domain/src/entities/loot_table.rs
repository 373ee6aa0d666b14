//! Loot tables - static per-enemy reward definitions.

use serde::{Deserialize, Serialize};

use super::LootedItem;

/// Inclusive integer range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub min: u32,
    pub max: u32,
}

impl Range {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub const fn fixed(value: u32) -> Self {
        Self {
            min: value,
            max: value,
        }
    }
}

/// One independent drop roll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LootDrop {
    pub item_id: String,
    /// Probability in `[0, 1]`
    pub chance: f64,
    pub quantity: Range,
}

impl LootDrop {
    pub fn new(item_id: impl Into<String>, chance: f64, quantity: Range) -> Self {
        Self {
            item_id: item_id.into(),
            chance,
            quantity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LootTable {
    pub enemy_id: String,
    pub guaranteed_gold: Range,
    pub drops: Vec<LootDrop>,
}

/// Tunables for a single loot roll. Luck 10 is the no-bonus baseline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LootOptions {
    pub drop_chance_multiplier: f64,
    pub gold_multiplier: f64,
    pub quantity_multiplier: f64,
    pub luck: i32,
}

impl Default for LootOptions {
    fn default() -> Self {
        Self {
            drop_chance_multiplier: 1.0,
            gold_multiplier: 1.0,
            quantity_multiplier: 1.0,
            luck: 10,
        }
    }
}

impl LootOptions {
    pub fn with_luck(mut self, luck: i32) -> Self {
        self.luck = luck;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LootResult {
    pub gold: u32,
    pub items: Vec<LootedItem>,
    pub experience_gained: u32,
    pub description: String,
}
