use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::entities::{LootDrop, LootTable, Range};

static LOOT_TABLES: Lazy<HashMap<String, LootTable>> = Lazy::new(|| {
    [
        table(
            "goblin",
            Range::new(2, 8),
            vec![
                LootDrop::new("health_potion_small", 0.2, Range::fixed(1)),
                LootDrop::new("rusty_dagger", 0.1, Range::fixed(1)),
                LootDrop::new("material_goblin_ear", 0.5, Range::new(1, 2)),
            ],
        ),
        table(
            "wolf",
            Range::fixed(0),
            vec![
                LootDrop::new("material_wolf_pelt", 0.7, Range::fixed(1)),
                LootDrop::new("material_wolf_fang", 0.4, Range::new(1, 2)),
            ],
        ),
        table(
            "bandit",
            Range::new(10, 25),
            vec![
                LootDrop::new("health_potion_small", 0.3, Range::fixed(1)),
                LootDrop::new("old_sword", 0.15, Range::fixed(1)),
                LootDrop::new("leather_armor", 0.1, Range::fixed(1)),
            ],
        ),
        table(
            "skeleton",
            Range::new(3, 10),
            vec![
                LootDrop::new("material_bone", 0.8, Range::new(1, 3)),
                LootDrop::new("old_sword", 0.1, Range::fixed(1)),
            ],
        ),
        table(
            "orc",
            Range::new(15, 35),
            vec![
                LootDrop::new("orc_axe", 0.15, Range::fixed(1)),
                LootDrop::new("health_potion", 0.25, Range::fixed(1)),
                LootDrop::new("material_orc_tusk", 0.5, Range::new(1, 2)),
            ],
        ),
        table(
            "bandit_leader",
            Range::new(50, 100),
            vec![
                LootDrop::new("iron_sword", 0.4, Range::fixed(1)),
                LootDrop::new("health_potion", 0.6, Range::new(1, 2)),
                LootDrop::new("leather_armor", 0.3, Range::fixed(1)),
            ],
        ),
    ]
    .into_iter()
    .map(|t| (t.enemy_id.clone(), t))
    .collect()
});

fn table(enemy_id: &str, guaranteed_gold: Range, drops: Vec<LootDrop>) -> LootTable {
    LootTable {
        enemy_id: enemy_id.to_string(),
        guaranteed_gold,
        drops,
    }
}

pub fn loot_table(enemy_id: &str) -> Option<&'static LootTable> {
    LOOT_TABLES.get(enemy_id)
}
