use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::entities::EnemyTemplate;
use crate::value_objects::Attributes;

static ENEMY_TEMPLATES: Lazy<HashMap<String, EnemyTemplate>> = Lazy::new(|| {
    [
        enemy(
            "goblin",
            "Goblin",
            1,
            (25, 20, 0),
            Attributes::new(8, 14, 8, 8, 8, 6, 12),
            &["skill_backstab", "skill_throw_rock"],
        ),
        enemy(
            "wolf",
            "Lobo",
            2,
            (35, 30, 0),
            Attributes::new(12, 15, 11, 3, 12, 6, 10),
            &["skill_bite", "skill_howl"],
        ),
        enemy(
            "bandit",
            "Bandido",
            3,
            (45, 30, 0),
            Attributes::new(13, 13, 12, 10, 10, 10, 10),
            &["skill_slash", "skill_dirty_trick"],
        ),
        enemy(
            "skeleton",
            "Esqueleto",
            3,
            (40, 25, 0),
            Attributes::new(12, 10, 14, 6, 8, 3, 8),
            &["skill_bone_throw"],
        ),
        enemy(
            "orc",
            "Orco",
            4,
            (65, 40, 0),
            Attributes::new(16, 9, 15, 7, 8, 7, 9),
            &["skill_power_strike"],
        ),
        enemy(
            "bandit_leader",
            "Líder bandido",
            5,
            (90, 45, 10),
            Attributes::new(15, 14, 14, 12, 11, 14, 12),
            &["skill_slash", "skill_power_strike", "skill_dirty_trick"],
        ),
    ]
    .into_iter()
    .map(|t| (t.id.clone(), t))
    .collect()
});

fn enemy(
    id: &str,
    name: &str,
    level: u32,
    (max_hp, max_stamina, max_mana): (i32, i32, i32),
    attributes: Attributes,
    skills: &[&str],
) -> EnemyTemplate {
    EnemyTemplate {
        id: id.to_string(),
        name: name.to_string(),
        level,
        max_hp,
        max_stamina,
        max_mana,
        attributes,
        skills: skills.iter().map(|s| s.to_string()).collect(),
    }
}

pub fn enemy_template(id: &str) -> Option<&'static EnemyTemplate> {
    ENEMY_TEMPLATES.get(id)
}

pub fn enemy_templates() -> impl Iterator<Item = &'static EnemyTemplate> {
    ENEMY_TEMPLATES.values()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_has_the_six_enemies() {
        for id in ["goblin", "wolf", "bandit", "skeleton", "orc", "bandit_leader"] {
            let t = enemy_template(id).unwrap();
            assert_eq!(t.id, id);
            assert!(t.max_hp > 0);
        }
        assert_eq!(enemy_templates().count(), 6);
        assert!(enemy_template("dragon").is_none());
    }
}
