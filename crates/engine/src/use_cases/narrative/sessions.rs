//! Registry of narrative managers, one per game session.

use std::sync::Arc;

use dashmap::DashMap;

use lorekeep_domain::{ChapterTemplate, NarrativeSessionId, PlayerContext};

use super::error::NarrativeError;
use super::manager::NarrativeManager;
use crate::infrastructure::ports::{ClockPort, RandomPort};

pub struct NarrativeSessions {
    sessions: DashMap<NarrativeSessionId, NarrativeManager>,
    catalog: Arc<Vec<ChapterTemplate>>,
    clock: Arc<dyn ClockPort>,
    random: Arc<dyn RandomPort>,
    max_sessions: usize,
}

impl NarrativeSessions {
    pub fn new(
        catalog: Arc<Vec<ChapterTemplate>>,
        clock: Arc<dyn ClockPort>,
        random: Arc<dyn RandomPort>,
        max_sessions: usize,
    ) -> Self {
        Self {
            sessions: DashMap::new(),
            catalog,
            clock,
            random,
            max_sessions,
        }
    }

    pub fn create(&self, player: PlayerContext) -> Result<NarrativeSessionId, NarrativeError> {
        if self.sessions.len() >= self.max_sessions {
            return Err(NarrativeError::CapacityReached(self.max_sessions));
        }

        let id = NarrativeSessionId::from_uuid(self.random.gen_uuid());
        let manager =
            NarrativeManager::new(self.catalog.clone(), self.clock.clone(), self.random.clone())
                .with_player(player);
        self.sessions.insert(id, manager);
        tracing::info!(session_id = %id, "Narrative session created");
        Ok(id)
    }

    /// Run `f` against the session's manager while holding its entry lock.
    pub fn with_session<T>(
        &self,
        id: NarrativeSessionId,
        f: impl FnOnce(&mut NarrativeManager) -> Result<T, NarrativeError>,
    ) -> Result<T, NarrativeError> {
        let mut entry = self
            .sessions
            .get_mut(&id)
            .ok_or(NarrativeError::SessionNotFound(id))?;
        f(entry.value_mut())
    }

    pub fn remove(&self, id: NarrativeSessionId) -> bool {
        let removed = self.sessions.remove(&id).is_some();
        if removed {
            tracing::info!(session_id = %id, "Narrative session removed");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::{FixedRandom, SystemClock};
    use lorekeep_domain::content::chapter_templates;
    use lorekeep_domain::NarrativePhase;

    fn sessions(max: usize) -> NarrativeSessions {
        NarrativeSessions::new(
            Arc::new(chapter_templates().to_vec()),
            Arc::new(SystemClock::new()),
            Arc::new(FixedRandom(0.0, 0)),
            max,
        )
    }

    #[test]
    fn sessions_are_independent() {
        let registry = sessions(4);
        let a = registry.create(PlayerContext::default()).unwrap();
        let b = registry.create(PlayerContext::default()).unwrap();

        registry
            .with_session(a, |m| m.start_new_chapter(Some("tutorial")))
            .unwrap();
        registry
            .with_session(a, |m| m.force_phase_transition(NarrativePhase::Climax))
            .unwrap();

        let phase = registry
            .with_session(a, |m| Ok(m.get_state().map(|s| s.phase)))
            .unwrap();
        assert_eq!(phase, Some(NarrativePhase::Climax));
        let other = registry
            .with_session(b, |m| Ok(m.get_state().is_some()))
            .unwrap();
        assert!(!other);
    }

    #[test]
    fn player_context_is_carried_into_the_manager() {
        let registry = sessions(1);
        let id = registry
            .create(PlayerContext {
                level: 5,
                ..Default::default()
            })
            .unwrap();
        let level = registry
            .with_session(id, |m| Ok(m.player_context().level))
            .unwrap();
        assert_eq!(level, 5);
    }

    #[test]
    fn capacity_and_removal() {
        let registry = sessions(1);
        let id = registry.create(PlayerContext::default()).unwrap();
        assert!(matches!(
            registry.create(PlayerContext::default()),
            Err(NarrativeError::CapacityReached(1))
        ));

        assert!(registry.remove(id));
        assert!(!registry.remove(id));
        assert!(registry.is_empty());

        let err = registry.with_session(id, |_| Ok(())).unwrap_err();
        assert!(err.is_not_found());
    }
}
