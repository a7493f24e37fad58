use glam::DVec2;
use uuid::Uuid;

use crate::app::error::WorkflowError;
use crate::app::workflows::ZoneEditView;
use crate::core::Point;
use crate::map::LayerId;

/// Schweregrad eines Hinweises
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum NoticeLevel {
    /// Erfolg / Information
    Info,
    /// Validierung, nichts wurde geändert
    Warning,
    /// Speichern fehlgeschlagen
    Error,
}

/// Hinweis an den Benutzer
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Notice {
    /// Schweregrad
    pub level: NoticeLevel,
    /// Text
    pub message: String,
}

/// Gezeichneter Marker, der auf die Wahl der Punkt-Art wartet
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingPoint {
    /// Marker-Layer (ungebunden)
    pub layer: LayerId,
    /// Position `[lon, lat]`
    pub position: DVec2,
}

/// Geöffnete Punkt-Bearbeitung
#[derive(Debug, Clone, PartialEq)]
pub struct PointEditView {
    /// Arbeitskopie
    pub point: Point,
}

/// UI-bezogener Anwendungszustand
#[derive(Debug, Default)]
pub struct UiState {
    /// Offene Hinweise (älteste zuerst)
    pub notices: Vec<Notice>,
    /// Marker, der auf die Wahl der Punkt-Art wartet
    pub pending_point: Option<PendingPoint>,
    /// Punkt, für den ein Equipment gewählt werden muss
    pub equipment_picker: Option<Uuid>,
    /// Bearbeitungsansicht einer Sicherheitszone
    pub zone_edit: Option<ZoneEditView>,
    /// Punkt-Bearbeitung
    pub point_edit: Option<PointEditView>,
    /// Hervorgehobener Layer
    pub highlighted: Option<LayerId>,
}

impl UiState {
    /// Erstellt einen leeren UI-Zustand.
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, level: NoticeLevel, message: String) {
        self.notices.push(Notice { level, message });
    }

    /// Erfolgsmeldung
    pub fn info(&mut self, message: impl Into<String>) {
        self.push(NoticeLevel::Info, message.into());
    }

    /// Warnung
    pub fn warn(&mut self, message: impl Into<String>) {
        self.push(NoticeLevel::Warning, message.into());
    }

    /// Fehlermeldung
    pub fn error(&mut self, message: impl Into<String>) {
        self.push(NoticeLevel::Error, message.into());
    }

    /// Zeigt einen Ablauf-Fehler an (Validierung als Warnung).
    pub fn report(&mut self, err: &WorkflowError) {
        if err.is_validation() {
            log::warn!("{}", err);
            self.warn(err.to_string());
        } else {
            log::error!("{}", err);
            self.error(err.to_string());
        }
    }

    /// Letzter Hinweis
    pub fn last_notice(&self) -> Option<&Notice> {
        self.notices.last()
    }

    /// Verwirft alle Hinweise
    pub fn dismiss_notices(&mut self) {
        self.notices.clear();
    }

    /// Schließt alle event-bezogenen Ansichten
    pub fn reset_views(&mut self) {
        self.pending_point = None;
        self.equipment_picker = None;
        self.zone_edit = None;
        self.point_edit = None;
        self.highlighted = None;
    }
}
