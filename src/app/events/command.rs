use std::time::Instant;

use uuid::Uuid;

use crate::app::outbox::{PersistReply, RequestId};
use crate::app::visibility::FilterCategory;
use crate::app::workflows::{ModifyTarget, ZoneEditFields};
use crate::core::{Event, Point};
use crate::map::{DrawKind, LayerId};

/// Commands sind mutierende Operationen, die vom Controller ausgeführt werden.
#[derive(Debug, Clone)]
pub enum AppCommand {
    /// Events und Equipment laden
    LoadCatalog,
    /// Event auswählen (bricht laufende Abläufe ab)
    SelectEvent { event_id: Option<Uuid> },
    /// Verworfene Zeichnung entfernen
    DiscardLayer { layer: LayerId },

    // ── Standard-Zeichnen ───────────────────────────────────────
    /// Marker merken, bis die Punkt-Art gewählt ist
    BeginPointPlacement { layer: LayerId },
    /// Punkt aus dem gemerkten Marker anlegen
    CreatePendingPoint { is_point_of_interest: bool },
    /// Gemerkten Marker verwerfen
    DiscardPendingPoint,
    /// Fläche aus Polygon anlegen
    CreateArea { layer: LayerId },
    /// Equipment-Linie aus Polyline anlegen
    CreateEquipmentPath { layer: LayerId },
    /// Geometrien bearbeiteter Layer übernehmen
    SyncEditedLayers { layers: Vec<LayerId> },
    /// Entities gelöschter Layer löschen
    DeleteLayers { layers: Vec<LayerId> },
    /// Layer hervorheben und ggf. Ansicht öffnen
    SelectLayer { layer: LayerId },
    /// Ungültige Form im aktuellen Modus verwerfen
    RejectShape { layer: LayerId, kind: DrawKind },

    // ── Sicherheitszone ─────────────────────────────────────────
    /// Equipment auflösen oder Auswahl öffnen
    RequestSecurityZone { point_id: Uuid },
    /// Zeichnen der Sicherheitszone starten
    StartSecurityZone { point_id: Uuid, equipment_id: Uuid },
    /// Equipment-Auswahl schließen
    CloseEquipmentPicker,
    /// Gezeichnete Linie übernehmen und Zone anlegen
    CompleteSecurityZoneDraw { layer: LayerId },
    /// Zeichnen der Sicherheitszone abbrechen
    StopSecurityZone,

    // ── Event-Anlage ────────────────────────────────────────────
    /// Event-Anlage starten
    StartEventCreation { event: Event },
    /// Gezeichnete Form an die Event-Anlage übergeben
    AdvanceEventCreation { layer: LayerId },
    /// Nachbearbeitung starten
    RequestEventModification { target: ModifyTarget },
    /// Nachbearbeitung abschließen
    FinishEventModification,
    /// Fläche und Weg speichern
    CommitEventCreation,
    /// Event-Anlage abbrechen
    CancelEventCreation,

    // ── Zonen-Bearbeitung ───────────────────────────────────────
    /// Bearbeitungsansicht öffnen
    OpenZoneEdit { zone_id: Uuid },
    /// Eingaben übernehmen
    UpdateZoneEdit { fields: ZoneEditFields },
    /// Speichern
    SaveZoneEdit,
    /// Schließen
    CloseZoneEdit,
    /// Zone löschen
    DeleteEditedZone,

    // ── Punkt-Bearbeitung ───────────────────────────────────────
    /// Bearbeitung beginnen (setzt Aktualisierung aus)
    BeginPointEdit { point_id: Uuid },
    /// Punkt speichern
    SavePoint { point: Point },
    /// Bearbeitung beenden (nimmt Aktualisierung wieder auf)
    EndPointEdit,

    // ── Sichtbarkeit ────────────────────────────────────────────
    /// Kategorie umschalten
    ToggleCategory { category: FilterCategory },
    /// Entity umschalten
    ToggleItem { category: FilterCategory, id: Uuid },
    /// Filter setzen
    SetCategoryFilter {
        category: FilterCategory,
        ids: Option<Vec<Uuid>>,
    },

    // ── System ──────────────────────────────────────────────────
    /// Punkte aktualisieren, falls fällig
    RefreshPointsIfDue { now: Instant },
    /// Backend-Antwort verarbeiten
    ApplyReply {
        id: RequestId,
        outcome: Result<PersistReply, String>,
    },
    /// Hinweise verwerfen
    DismissNotices,
}
