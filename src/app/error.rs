//! Typisierte Fehler der Arbeitsabläufe (werden als Hinweis angezeigt).

use uuid::Uuid;

use super::mode::ModeKind;

/// Fehler eines Arbeitsablaufs.
///
/// Kein Fehler ist fatal: jeder führt höchstens zu einem Moduswechsel und
/// einem Hinweis in `UiState::notices`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WorkflowError {
    /// Kein Event ausgewählt
    #[error("Kein Event ausgewählt")]
    NoEventSelected,
    /// Punkt hat kein (gültiges) Equipment
    #[error("Für Punkt {0} ist kein Equipment gewählt")]
    MissingEquipment(Uuid),
    /// Layer ohne lesbare Geometrie
    #[error("Keine Geometrie für {0} vorhanden")]
    MissingGeometry(&'static str),
    /// Gezeichnete Form hat den falschen Typ
    #[error("Gezeichnete Form ist kein(e) {expected}")]
    UnsupportedGeometry {
        /// Erwarteter Typ
        expected: &'static str,
    },
    /// Ein anderer Arbeitsablauf ist aktiv
    #[error("Aktion nicht möglich, solange {active:?} aktiv ist")]
    WorkflowBusy {
        /// Aktiver Modus
        active: ModeKind,
    },
    /// Aktion passt nicht zum aktuellen Schritt
    #[error("{action} ist im aktuellen Schritt nicht möglich")]
    InvalidStep {
        /// Angeforderte Aktion
        action: &'static str,
    },
    /// Referenzierte Entity existiert nicht (mehr)
    #[error("{kind} {id} ist nicht mehr vorhanden")]
    StaleReference {
        /// Entity-Art
        kind: &'static str,
        /// Entity-ID
        id: Uuid,
    },
    /// Speichern im Backend fehlgeschlagen
    #[error("{what} konnte nicht gespeichert werden: {message}")]
    Persistence {
        /// Betroffene Entity-Art
        what: &'static str,
        /// Fehlermeldung des Backends
        message: String,
    },
}

impl WorkflowError {
    /// Validierungsfehler ändern keinen Zustand.
    pub fn is_validation(&self) -> bool {
        !matches!(self, WorkflowError::Persistence { .. })
    }
}
