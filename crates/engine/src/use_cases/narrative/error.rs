//! Narrative operation errors.

use lorekeep_domain::{ChapterOutcome, NarrativeSessionId, ThreadId};

#[derive(Debug, thiserror::Error)]
pub enum NarrativeError {
    #[error("Sesión narrativa no encontrada: {0}")]
    SessionNotFound(NarrativeSessionId),
    #[error("No hay un capítulo activo")]
    NoActiveChapter,
    #[error("Plantilla de capítulo no encontrada: {0}")]
    TemplateNotFound(String),
    #[error("No hay plantillas de capítulo disponibles")]
    NoEligibleTemplate,
    #[error("No se encontró resolución para outcome: {0}")]
    NoResolution(ChapterOutcome),
    #[error("Hilo narrativo no encontrado: {0}")]
    ThreadNotFound(ThreadId),
    #[error("Se ha alcanzado el límite de sesiones narrativas ({0})")]
    CapacityReached(usize),
}

impl NarrativeError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            NarrativeError::SessionNotFound(_) | NarrativeError::ThreadNotFound(_)
        )
    }
}
