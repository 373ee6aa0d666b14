//! Combat operation errors.
//!
//! These are caller errors (wrong id, wrong turn). Content gaps such as an
//! unknown skill never surface here; they come back as failed action results.

use lorekeep_domain::{CombatId, DomainError};

#[derive(Debug, thiserror::Error)]
pub enum CombatError {
    #[error("Combate no encontrado: {0}")]
    NotFound(CombatId),
    #[error("El combate no está activo")]
    NotActive,
    #[error("No es el turno del jugador")]
    NotPlayerTurn,
    #[error("No es el turno de un enemigo")]
    NotEnemyTurn,
    #[error("Jugador no encontrado en el combate")]
    PlayerNotFound,
    #[error("Se ha alcanzado el límite de combates activos ({0})")]
    CapacityReached(usize),
    #[error("Datos de combate inválidos: {0}")]
    Validation(#[from] DomainError),
}

impl CombatError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, CombatError::NotFound(_))
    }
}
