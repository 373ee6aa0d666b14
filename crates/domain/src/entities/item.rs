//! Item templates and looted item instances.
//!
//! Templates are static registry entries; a looted item is one concrete
//! stack handed to the player, with its own instance id.

use serde::{Deserialize, Serialize};

use crate::types::{ItemType, Rarity};
use crate::ItemInstanceId;

/// Design-time item definition, keyed by `id` in the item registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemTemplate {
    pub id: String,
    pub name: String,
    pub description: String,
    pub item_type: ItemType,
    pub rarity: Rarity,
    /// Gold value per unit
    pub value: u32,
    pub stackable: bool,
}

impl ItemTemplate {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        item_type: ItemType,
        rarity: Rarity,
        value: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            item_type,
            rarity,
            value,
            stackable: matches!(item_type, ItemType::Consumable | ItemType::Material),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// One stack of an item produced by a loot roll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LootedItem {
    pub instance_id: ItemInstanceId,
    pub template_id: String,
    pub name: String,
    pub description: String,
    pub item_type: ItemType,
    pub rarity: Rarity,
    pub value: u32,
    pub quantity: u32,
}

impl LootedItem {
    pub fn from_template(template: &ItemTemplate, instance_id: ItemInstanceId, quantity: u32) -> Self {
        Self {
            instance_id,
            template_id: template.id.clone(),
            name: template.name.clone(),
            description: template.description.clone(),
            item_type: template.item_type,
            rarity: template.rarity,
            value: template.value,
            quantity,
        }
    }
}
