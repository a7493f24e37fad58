use std::time::Instant;

use uuid::Uuid;

use crate::app::outbox::{PersistReply, RequestId};
use crate::app::visibility::FilterCategory;
use crate::app::workflows::{ModifyTarget, ZoneEditFields};
use crate::core::{Event, Point};
use crate::map::{DrawKind, LayerId};

/// App-Intent und App-Command Events.
/// Intents sind Eingaben aus UI, Karte und Backend ohne direkte Mutationslogik.
#[derive(Debug, Clone)]
pub enum AppIntent {
    /// Anwendung gestartet: Events und Equipment laden
    StartupRequested,
    /// Event in der Auswahl gewechselt (None = Auswahl aufgehoben)
    EventSelected { event_id: Option<Uuid> },

    // ── Karte ───────────────────────────────────────────────────
    /// Karte meldet eine fertig gezeichnete Form
    ShapeDrawn { layer: LayerId, kind: DrawKind },
    /// Karte meldet bearbeitete Layer
    ShapesEdited { layers: Vec<LayerId> },
    /// Karte meldet gelöschte Layer
    ShapesDeleted { layers: Vec<LayerId> },
    /// Layer wurde angeklickt
    LayerClicked { layer: LayerId },

    // ── Standard-Punkte ─────────────────────────────────────────
    /// Punkt-Art für den gezeichneten Marker gewählt
    PointTypeChosen { is_point_of_interest: bool },
    /// Auswahl der Punkt-Art abgebrochen
    PointTypeCancelled,

    // ── Sicherheitszone ─────────────────────────────────────────
    /// Sicherheitszone für einen Punkt anlegen
    SecurityZoneRequested { point_id: Uuid },
    /// Equipment in der Auswahl gewählt
    EquipmentPicked { equipment_id: Uuid },
    /// Equipment-Auswahl abgebrochen
    EquipmentPickerCancelled,
    /// Zeichnen der Sicherheitszone abgebrochen
    SecurityZoneDrawCancelled,

    // ── Event-Anlage ────────────────────────────────────────────
    /// Event wurde extern angelegt, jetzt Zone und Tracé zeichnen
    EventCreationStarted { event: Event },
    /// Gezeichnete Zone bzw. Tracé nachbearbeiten
    EventModificationRequested { target: ModifyTarget },
    /// Nachbearbeitung abgeschlossen
    EventModificationFinished,
    /// Zone und Tracé bestätigen
    EventCreationConfirmed,
    /// Event-Anlage abbrechen
    EventCreationCancelled,

    // ── Zonen-Bearbeitung ───────────────────────────────────────
    /// Eingaben der Bearbeitungsansicht geändert
    ZoneEditChanged { fields: ZoneEditFields },
    /// Bearbeitung speichern
    ZoneEditSaved,
    /// Bearbeitungsansicht schließen
    ZoneEditClosed,
    /// Bearbeitete Zone löschen
    ZoneDeleteRequested,

    // ── Punkt-Bearbeitung ───────────────────────────────────────
    /// Punkt-Bearbeitung beginnt
    PointEditStarted { point_id: Uuid },
    /// Punkt speichern
    PointEditSaved { point: Point },
    /// Punkt-Bearbeitung beendet
    PointEditEnded,

    // ── Sichtbarkeit ────────────────────────────────────────────
    /// Ganze Kategorie umschalten
    CategoryVisibilityToggled { category: FilterCategory },
    /// Einzelne Entity umschalten
    ItemVisibilityToggled { category: FilterCategory, id: Uuid },
    /// Filter von außen setzen (z.B. Suche)
    CategoryFilterSet {
        category: FilterCategory,
        ids: Option<Vec<Uuid>>,
    },

    // ── System ──────────────────────────────────────────────────
    /// Zeittakt für die periodische Aktualisierung
    Tick { now: Instant },
    /// Backend hat eine Anfrage beantwortet
    RequestFinished {
        id: RequestId,
        outcome: Result<PersistReply, String>,
    },
    /// Angezeigte Hinweise verwerfen
    NoticesDismissed,
}
