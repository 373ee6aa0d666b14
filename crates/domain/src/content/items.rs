use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::entities::ItemTemplate;
use crate::types::{ItemType, Rarity};

static ITEM_TEMPLATES: Lazy<HashMap<String, ItemTemplate>> = Lazy::new(|| {
    [
        ItemTemplate::new(
            "health_potion_small",
            "Poción de salud pequeña",
            ItemType::Consumable,
            Rarity::Common,
            10,
        )
        .with_description("Restaura una pequeña cantidad de salud."),
        ItemTemplate::new(
            "health_potion",
            "Poción de salud",
            ItemType::Consumable,
            Rarity::Uncommon,
            25,
        )
        .with_description("Restaura una cantidad moderada de salud."),
        ItemTemplate::new("rusty_dagger", "Daga oxidada", ItemType::Weapon, Rarity::Common, 5)
            .with_description("Mejor que nada, por poco."),
        ItemTemplate::new("old_sword", "Espada vieja", ItemType::Weapon, Rarity::Common, 12)
            .with_description("Una hoja mellada que aún corta."),
        ItemTemplate::new(
            "leather_armor",
            "Armadura de cuero",
            ItemType::Armor,
            Rarity::Common,
            15,
        )
        .with_description("Cuero curtido, ligero y flexible."),
        ItemTemplate::new("iron_sword", "Espada de hierro", ItemType::Weapon, Rarity::Uncommon, 40)
            .with_description("Forjada por un herrero competente."),
        ItemTemplate::new("orc_axe", "Hacha orca", ItemType::Weapon, Rarity::Uncommon, 45)
            .with_description("Pesada, tosca y brutal."),
        ItemTemplate::new(
            "material_wolf_pelt",
            "Piel de lobo",
            ItemType::Material,
            Rarity::Common,
            8,
        )
        .with_description("Piel gruesa, apreciada por los curtidores."),
    ]
    .into_iter()
    .map(|t| (t.id.clone(), t))
    .collect()
});

/// Display names for `material_` ids without a full registry entry.
static MATERIAL_NAMES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("material_goblin_ear", "Oreja de goblin"),
        ("material_wolf_fang", "Colmillo de lobo"),
        ("material_bone", "Hueso"),
        ("material_orc_tusk", "Colmillo de orco"),
        ("material_cloth", "Retal de tela"),
    ])
});

const MATERIAL_PREFIX: &str = "material_";

pub fn item_template(id: &str) -> Option<&'static ItemTemplate> {
    ITEM_TEMPLATES.get(id)
}

/// Generic material item for an unregistered `material_` id. Returns `None`
/// for any other id.
pub fn material_fallback(id: &str) -> Option<ItemTemplate> {
    let stem = id.strip_prefix(MATERIAL_PREFIX)?;
    let name = MATERIAL_NAMES
        .get(id)
        .map(|n| n.to_string())
        .unwrap_or_else(|| humanize_id(stem));
    Some(
        ItemTemplate::new(id, name, ItemType::Material, Rarity::Common, 1)
            .with_description("Material de artesanía."),
    )
}

/// `"iron_ore"` -> `"Iron ore"`.
pub fn humanize_id(id: &str) -> String {
    let spaced = id.replace('_', " ");
    let mut chars = spaced.trim().chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registered_items_resolve() {
        let potion = item_template("health_potion_small").unwrap();
        assert_eq!(potion.item_type, ItemType::Consumable);
        assert!(potion.stackable);
        assert!(item_template("excalibur").is_none());
    }

    #[test]
    fn material_fallback_uses_name_table_then_humanizes() {
        let ear = material_fallback("material_goblin_ear").unwrap();
        assert_eq!(ear.name, "Oreja de goblin");
        assert_eq!(ear.item_type, ItemType::Material);

        let ore = material_fallback("material_iron_ore").unwrap();
        assert_eq!(ore.name, "Iron ore");
        assert_eq!(ore.id, "material_iron_ore");
    }

    #[test]
    fn non_material_ids_have_no_fallback() {
        assert!(material_fallback("excalibur").is_none());
    }

    #[test]
    fn humanize_handles_edge_cases() {
        assert_eq!(humanize_id("wolf_fang"), "Wolf fang");
        assert_eq!(humanize_id(""), "");
    }
}
