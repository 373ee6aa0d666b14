//! Loot generation.
//!
//! Rolls gold and independent item drops from the static loot tables. A
//! missing table is not an error: it yields an empty result carrying the
//! experience through unchanged.

use std::sync::Arc;

use lorekeep_domain::content::{item_template, loot_table, material_fallback};
use lorekeep_domain::{ItemInstanceId, LootOptions, LootResult, LootedItem, Range};

use crate::infrastructure::ports::RandomPort;

pub const NOTHING_FOUND: &str = "No se encontró nada de valor.";

/// Luck at or below this value grants no bonus.
const LUCK_BASELINE: i32 = 10;
const GOLD_LUCK_BONUS_PER_POINT: f64 = 0.01;
const DROP_LUCK_BONUS_PER_POINT: f64 = 0.005;

pub struct LootEngine {
    random: Arc<dyn RandomPort>,
}

impl LootEngine {
    pub fn new(random: Arc<dyn RandomPort>) -> Self {
        Self { random }
    }

    pub fn generate_loot(
        &self,
        enemy_id: &str,
        enemy_experience: u32,
        options: &LootOptions,
    ) -> LootResult {
        let Some(table) = loot_table(enemy_id) else {
            tracing::debug!(enemy_id = enemy_id, "No loot table for enemy");
            return LootResult {
                gold: 0,
                items: Vec::new(),
                experience_gained: enemy_experience,
                description: NOTHING_FOUND.to_string(),
            };
        };

        let gold = self.roll_gold(table.guaranteed_gold, options);

        let drop_bonus = 1.0 + extra_luck(options.luck) * DROP_LUCK_BONUS_PER_POINT;
        let mut items = Vec::new();
        for drop in &table.drops {
            let chance = (drop.chance * options.drop_chance_multiplier * drop_bonus).min(1.0);
            if self.random.gen_float() >= chance {
                continue;
            }

            let quantity = ((f64::from(self.roll_range(drop.quantity))
                * options.quantity_multiplier)
                .floor() as u32)
                .max(1);

            let template = match item_template(&drop.item_id) {
                Some(t) => t.clone(),
                None => match material_fallback(&drop.item_id) {
                    Some(t) => t,
                    None => {
                        tracing::warn!(
                            enemy_id = enemy_id,
                            item_id = %drop.item_id,
                            "Loot table references unknown item, skipping"
                        );
                        continue;
                    }
                },
            };

            let instance_id = ItemInstanceId::from_uuid(self.random.gen_uuid());
            items.push(LootedItem::from_template(&template, instance_id, quantity));
        }

        let description = describe(gold, &items);
        tracing::debug!(
            enemy_id = enemy_id,
            gold = gold,
            items = items.len(),
            "Loot generated"
        );

        LootResult {
            gold,
            items,
            experience_gained: enemy_experience,
            description,
        }
    }

    /// Uniform roll in `range`, scaled by the gold multiplier and the luck
    /// bonus, floored.
    pub fn roll_gold(&self, range: Range, options: &LootOptions) -> u32 {
        let roll = f64::from(self.roll_range(range));
        let luck_bonus = 1.0 + extra_luck(options.luck) * GOLD_LUCK_BONUS_PER_POINT;
        (roll * options.gold_multiplier * luck_bonus).floor().max(0.0) as u32
    }

    fn roll_range(&self, range: Range) -> i32 {
        let min = i32::try_from(range.min).unwrap_or(i32::MAX);
        let max = i32::try_from(range.max).unwrap_or(i32::MAX);
        self.random.gen_range(min, max.max(min))
    }
}

fn extra_luck(luck: i32) -> f64 {
    f64::from((luck - LUCK_BASELINE).max(0))
}

fn describe(gold: u32, items: &[LootedItem]) -> String {
    if gold == 0 && items.is_empty() {
        return NOTHING_FOUND.to_string();
    }

    let mut parts = Vec::new();
    if gold > 0 {
        parts.push(format!("{} de oro", gold));
    }
    parts.extend(
        items
            .iter()
            .map(|item| format!("{}x {}", item.quantity, item.name)),
    );
    format!("Encontraste: {}.", parts.join(", "))
}
