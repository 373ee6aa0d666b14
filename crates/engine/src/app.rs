//! Application state and composition.

use std::sync::Arc;

use lorekeep_domain::content::chapter_templates;

use crate::config::EngineConfig;
use crate::infrastructure::{
    clock::{SystemClock, SystemRandom},
    ports::{ClockPort, RandomPort},
};
use crate::use_cases::{CombatEngine, LootEngine, NarrativeSessions};

/// Main application state.
///
/// Holds every component. Passed to HTTP handlers via Axum state.
pub struct App {
    pub config: EngineConfig,
    pub combat: CombatEngine,
    pub loot: Arc<LootEngine>,
    pub narratives: NarrativeSessions,
}

impl App {
    /// Create a new App wired to the system clock and thread RNG.
    pub fn new(config: EngineConfig) -> Self {
        Self::with_ports(
            config,
            Arc::new(SystemClock::new()),
            Arc::new(SystemRandom::new()),
        )
    }

    pub fn with_ports(
        config: EngineConfig,
        clock: Arc<dyn ClockPort>,
        random: Arc<dyn RandomPort>,
    ) -> Self {
        let loot = Arc::new(LootEngine::new(random.clone()));
        let combat = CombatEngine::new(
            loot.clone(),
            clock.clone(),
            random.clone(),
            config.combat_max_active,
        );
        let narratives = NarrativeSessions::new(
            Arc::new(chapter_templates().to_vec()),
            clock,
            random,
            config.narrative_max_sessions,
        );

        Self {
            config,
            combat,
            loot,
            narratives,
        }
    }
}
