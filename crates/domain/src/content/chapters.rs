use std::collections::BTreeMap;

use once_cell::sync::Lazy;

use crate::entities::{
    ChapterRequirements, ChapterTemplate, ClimaxConfig, ComplicationConfig, ComplicationTrigger,
    HookConfig, HookSpec, ResolutionConfig, RewardSpec, ThreadSpec,
};
use crate::types::{ChapterOutcome, ChapterType, HookType, ThreadImportance, Urgency};

/// Template used when nothing else is eligible.
pub const FALLBACK_CHAPTER_ID: &str = "tutorial";

static CHAPTER_TEMPLATES: Lazy<Vec<ChapterTemplate>> =
    Lazy::new(|| vec![tutorial(), goblin_raid(), missing_merchant(), haunted_crypt()]);

/// The full catalog, in declaration order.
pub fn chapter_templates() -> &'static [ChapterTemplate] {
    &CHAPTER_TEMPLATES
}

pub fn chapter_template(id: &str) -> Option<&'static ChapterTemplate> {
    CHAPTER_TEMPLATES.iter().find(|t| t.id == id)
}

fn variables(pools: &[(&str, &[&str])]) -> BTreeMap<String, Vec<String>> {
    pools
        .iter()
        .map(|(name, options)| {
            (
                name.to_string(),
                options.iter().map(|o| o.to_string()).collect(),
            )
        })
        .collect()
}

fn complication(
    id: &str,
    description: &str,
    trigger: ComplicationTrigger,
    tension_delta: i32,
    new_thread: Option<(&str, ThreadImportance)>,
) -> ComplicationConfig {
    ComplicationConfig {
        id: id.to_string(),
        description_template: description.to_string(),
        trigger,
        tension_delta,
        new_thread: new_thread.map(|(text, importance)| ThreadSpec {
            description_template: text.to_string(),
            importance,
        }),
    }
}

fn resolution(
    outcome: ChapterOutcome,
    (experience, gold): (u32, u32),
    items: &[&str],
    next_hooks: Vec<HookSpec>,
    epilogue: &str,
) -> ResolutionConfig {
    ResolutionConfig {
        outcome,
        rewards: RewardSpec {
            experience,
            gold,
            items: items.iter().map(|i| i.to_string()).collect(),
            reputation: 0,
        },
        next_hooks,
        epilogue_template: epilogue.to_string(),
    }
}

fn hook(description: &str, hook_type: Option<HookType>, urgency: Option<Urgency>) -> HookSpec {
    HookSpec {
        description_template: description.to_string(),
        hook_type,
        urgency,
    }
}

fn tutorial() -> ChapterTemplate {
    ChapterTemplate {
        id: "tutorial".into(),
        chapter_type: ChapterType::Tutorial,
        title_template: "El despertar en {village}".into(),
        conflict_template: "Los goblins acechan los caminos de {village}".into(),
        setting_template: "La aldea de {village} y sus alrededores".into(),
        antagonist: Some("Jefe goblin".into()),
        requirements: ChapterRequirements {
            max_level: Some(3),
            ..Default::default()
        },
        hook: HookConfig {
            description_template: "{npc} pide ayuda: los goblins han robado las provisiones de {village}".into(),
            tension_boost: 15,
            quest_pool: vec!["q_tutorial_goblins".into(), "q_tutorial_supplies".into()],
        },
        complications: vec![complication(
            "tutorial_ambush",
            "Un grupo de goblins embosca a {npc} en el camino",
            ComplicationTrigger::Progress { percent: 30.0 },
            10,
            Some(("Rescatar a {npc} de los goblins", ThreadImportance::Side)),
        )],
        climax: ClimaxConfig {
            description_template: "El jefe goblin defiende su guarida".into(),
            enemy_scaling: 0.8,
            boss_id: Some("goblin".into()),
        },
        resolutions: vec![
            resolution(
                ChapterOutcome::Victory,
                (100, 25),
                &["health_potion_small"],
                vec![hook(
                    "Los goblins huían de algo peor en el bosque",
                    Some(HookType::Threat),
                    Some(Urgency::High),
                )],
                "{village} celebra su salvación.",
            ),
            resolution(
                ChapterOutcome::Defeat,
                (25, 0),
                &[],
                vec![hook("Alguien te arrastró de vuelta a {village}", None, None)],
                "Despiertas en {village}, magullado pero vivo.",
            ),
        ],
        weight: 10,
        variables: variables(&[
            ("village", &["Brezo", "Valdemora", "Roca Gris"]),
            ("npc", &["el herrero Tomás", "la curandera Elia", "el viejo Anselmo"]),
        ]),
    }
}

fn goblin_raid() -> ChapterTemplate {
    ChapterTemplate {
        id: "goblin_raid".into(),
        chapter_type: ChapterType::Combat,
        title_template: "Fuego en {place}".into(),
        conflict_template: "Una horda goblin liderada por {warlord} asalta {place}".into(),
        setting_template: "Las granjas y empalizadas de {place}".into(),
        antagonist: Some("{warlord}".into()),
        requirements: ChapterRequirements {
            min_level: Some(2),
            max_level: Some(6),
            prerequisites: vec!["tutorial".into()],
            ..Default::default()
        },
        hook: HookConfig {
            description_template: "El humo se eleva sobre {place}; los supervivientes piden ayuda".into(),
            tension_boost: 25,
            quest_pool: vec!["q_defend_farms".into(), "q_scout_horde".into()],
        },
        complications: vec![
            complication(
                "raid_reinforcements",
                "Llegan refuerzos goblin con armas de hierro nuevas",
                ComplicationTrigger::TimeElapsed { minutes: 10.0 },
                15,
                Some(("Descubrir quién arma a los goblins", ThreadImportance::Main)),
            ),
            complication(
                "raid_burning_farm",
                "Una granja arde y sus dueños quedan atrapados",
                ComplicationTrigger::PlayerAction {
                    action: "entered_village".into(),
                },
                10,
                None,
            ),
        ],
        climax: ClimaxConfig {
            description_template: "{warlord} desafía al héroe frente a las puertas".into(),
            enemy_scaling: 1.0,
            boss_id: Some("orc".into()),
        },
        resolutions: vec![
            resolution(
                ChapterOutcome::Victory,
                (250, 60),
                &["health_potion"],
                vec![hook(
                    "Las armas goblin llevan el sello de un gremio de la ciudad",
                    Some(HookType::Mystery),
                    Some(Urgency::Medium),
                )],
                "{place} se salva, aunque las cicatrices tardarán en sanar.",
            ),
            resolution(
                ChapterOutcome::PartialVictory,
                (150, 30),
                &[],
                vec![hook(
                    "{warlord} escapó y jura venganza",
                    Some(HookType::Threat),
                    Some(Urgency::High),
                )],
                "La horda se retira, pero {warlord} sigue libre.",
            ),
            resolution(
                ChapterOutcome::Defeat,
                (50, 0),
                &[],
                vec![hook("{place} ha caído; sus refugiados buscan un líder", Some(HookType::Personal), None)],
                "{place} arde mientras te retiras.",
            ),
        ],
        weight: 8,
        variables: variables(&[
            ("place", &["Molino Viejo", "Vado del Cuervo", "Campos de Ámbar"]),
            ("warlord", &["Grak el Tuerto", "Snaga Dientenegro"]),
        ]),
    }
}

fn missing_merchant() -> ChapterTemplate {
    ChapterTemplate {
        id: "missing_merchant".into(),
        chapter_type: ChapterType::Mystery,
        title_template: "La caravana perdida de {merchant}".into(),
        conflict_template: "{merchant} desapareció en la ruta de {road}".into(),
        setting_template: "La ruta comercial de {road}".into(),
        antagonist: None,
        requirements: ChapterRequirements {
            min_level: Some(1),
            ..Default::default()
        },
        hook: HookConfig {
            description_template: "La familia de {merchant} ofrece una recompensa por noticias".into(),
            tension_boost: 15,
            quest_pool: vec!["q_find_merchant".into(), "q_question_guards".into()],
        },
        complications: vec![
            complication(
                "merchant_false_trail",
                "Las huellas de la caravana se desvían hacia el bosque",
                ComplicationTrigger::Progress { percent: 40.0 },
                5,
                Some(("Seguir el rastro falso hasta su origen", ThreadImportance::Side)),
            ),
            complication(
                "merchant_bandit_threat",
                "Unos bandidos advierten que dejes de hacer preguntas",
                ComplicationTrigger::RandomChance { chance: 0.15 },
                10,
                None,
            ),
        ],
        climax: ClimaxConfig {
            description_template: "El campamento bandido donde retienen a {merchant}".into(),
            enemy_scaling: 1.1,
            boss_id: Some("bandit_leader".into()),
        },
        resolutions: vec![
            resolution(
                ChapterOutcome::Victory,
                (200, 80),
                &["iron_sword"],
                vec![hook(
                    "{merchant} menciona un cargamento que nunca debió existir",
                    Some(HookType::Opportunity),
                    None,
                )],
                "{merchant} vuelve a casa y no olvida tu nombre.",
            ),
            resolution(
                ChapterOutcome::Retreat,
                (60, 0),
                &[],
                vec![hook("Se rumorea que {merchant} sigue con vida", Some(HookType::Rumor), Some(Urgency::Low))],
                "El rastro de {merchant} se enfría.",
            ),
        ],
        weight: 6,
        variables: variables(&[
            ("merchant", &["Doña Berta", "el mercader Ulrico", "la tratante Maela"]),
            ("road", &["los Sauces", "la Piedra Alta"]),
        ]),
    }
}

fn haunted_crypt() -> ChapterTemplate {
    ChapterTemplate {
        id: "haunted_crypt".into(),
        chapter_type: ChapterType::Horror,
        title_template: "Los muertos de {crypt}".into(),
        conflict_template: "Algo ha despertado bajo {crypt}".into(),
        setting_template: "Las galerías húmedas de {crypt}".into(),
        antagonist: Some("El guardián sin nombre".into()),
        requirements: ChapterRequirements {
            min_level: Some(3),
            ..Default::default()
        },
        hook: HookConfig {
            description_template: "Los aldeanos oyen arañazos bajo las losas de {crypt}".into(),
            tension_boost: 30,
            quest_pool: vec!["q_investigate_crypt".into()],
        },
        complications: vec![
            complication(
                "crypt_restless_dead",
                "Los esqueletos se levantan de sus nichos",
                ComplicationTrigger::TimeElapsed { minutes: 8.0 },
                15,
                None,
            ),
            complication(
                "crypt_sealed_door",
                "Al abrir el sarcófago, una puerta se sella a tus espaldas",
                ComplicationTrigger::PlayerAction {
                    action: "opened_sarcophagus".into(),
                },
                20,
                Some(("Encontrar otra salida de {crypt}", ThreadImportance::Main)),
            ),
        ],
        climax: ClimaxConfig {
            description_template: "El guardián se alza en la cámara más profunda".into(),
            enemy_scaling: 1.3,
            boss_id: Some("skeleton".into()),
        },
        resolutions: vec![
            resolution(
                ChapterOutcome::Victory,
                (300, 100),
                &["health_potion"],
                vec![hook(
                    "Una inscripción menciona otras criptas iguales",
                    Some(HookType::Mystery),
                    Some(Urgency::Medium),
                )],
                "{crypt} vuelve a quedar en silencio.",
            ),
            resolution(
                ChapterOutcome::Defeat,
                (50, 0),
                &[],
                vec![],
                "Huyes de {crypt} con el eco de los muertos en los oídos.",
            ),
            resolution(
                ChapterOutcome::Retreat,
                (80, 0),
                &[],
                vec![hook("Los muertos de {crypt} empiezan a salir de noche", Some(HookType::Threat), Some(Urgency::Critical))],
                "Sellas la entrada de {crypt} y rezas para que aguante.",
            ),
        ],
        weight: 5,
        variables: variables(&[("crypt", &["la Cripta de Valdés", "el Osario del Monje"])]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_four_templates_with_fallback_first() {
        let ids: Vec<_> = chapter_templates().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["tutorial", "goblin_raid", "missing_merchant", "haunted_crypt"]);
        assert!(chapter_template(FALLBACK_CHAPTER_ID).is_some());
    }

    #[test]
    fn every_template_is_selectable_and_resolvable() {
        for t in chapter_templates() {
            assert!(t.weight > 0, "{} has no weight", t.id);
            assert!(!t.resolutions.is_empty(), "{} has no resolutions", t.id);
            for options in t.variables.values() {
                assert!(!options.is_empty());
            }
        }
    }

    #[test]
    fn missing_merchant_has_no_defeat_resolution() {
        let t = chapter_template("missing_merchant").unwrap();
        assert!(t.resolution_for(ChapterOutcome::Victory).is_some());
        assert!(t.resolution_for(ChapterOutcome::Defeat).is_none());
    }
}
