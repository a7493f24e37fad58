//! Ausgehende Persistenz-Anfragen mit Fortsetzungs-Datensatz.
//!
//! Handler blockieren nie: sie reihen eine `PersistRequest` zusammen mit einem
//! `Awaiting` (was bei Antwort zu tun ist) und einem `Guard` ein. Die Antwort
//! kommt später als `AppIntent::RequestFinished` zurück.

use std::collections::HashMap;

use uuid::Uuid;

use super::geometry_store::ShapeKind;
use super::workflows::{StepPlan, ZoneEditStep, ZoneStep};
use crate::core::{Area, Equipment, Event, Point, RoutePath, SecurityZone, TeamRole};
use crate::map::LayerId;

/// ID einer ausgehenden Anfrage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub u64);

/// Anfrage an das Entity-Backend
#[derive(Debug, Clone, PartialEq)]
pub enum PersistRequest {
    /// Alle Events laden
    ListEvents,
    /// Equipment-Katalog laden
    ListEquipment,
    /// Alle Geometrien eines Events laden
    LoadEventData {
        /// Event
        event_id: Uuid,
    },
    /// Punkte eines Events laden (periodische Aktualisierung)
    ListPoints {
        /// Event
        event_id: Uuid,
    },
    /// Punkt anlegen
    CreatePoint(Point),
    /// Punkt aktualisieren
    UpdatePoint(Point),
    /// Punkt löschen
    DeletePoint(Uuid),
    /// Fläche anlegen
    CreateArea(Area),
    /// Fläche aktualisieren
    UpdateArea(Area),
    /// Fläche löschen
    DeleteArea(Uuid),
    /// Weg anlegen
    CreatePath(RoutePath),
    /// Weg aktualisieren
    UpdatePath(RoutePath),
    /// Weg löschen
    DeletePath(Uuid),
    /// Sicherheitszone anlegen
    CreateSecurityZone(SecurityZone),
    /// Sicherheitszone aktualisieren
    UpdateSecurityZone(SecurityZone),
    /// Sicherheitszone löschen
    DeleteSecurityZone(Uuid),
    /// Team zuweisen (`None` hebt die Zuweisung auf)
    AssignTeam {
        /// Sicherheitszone
        zone_id: Uuid,
        /// Rolle
        role: TeamRole,
        /// Team
        team_id: Option<Uuid>,
    },
    /// Fotos eines Punkts an eine Sicherheitszone hängen
    TransferPhotos {
        /// Quell-Punkt
        point_id: Uuid,
        /// Ziel-Zone
        zone_id: Uuid,
    },
    /// Event löschen (Backend löscht abhängige Entities mit)
    DeleteEvent(Uuid),
}

/// Art einer Anfrage ohne Nutzdaten (für Protokoll und Fehler-Injektion)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    /// [`PersistRequest::ListEvents`]
    ListEvents,
    /// [`PersistRequest::ListEquipment`]
    ListEquipment,
    /// [`PersistRequest::LoadEventData`]
    LoadEventData,
    /// [`PersistRequest::ListPoints`]
    ListPoints,
    /// Anlegen einer Entity
    Create(ShapeKind),
    /// Aktualisieren einer Entity
    Update(ShapeKind),
    /// Löschen einer Entity
    Delete(ShapeKind),
    /// [`PersistRequest::AssignTeam`]
    AssignTeam,
    /// [`PersistRequest::TransferPhotos`]
    TransferPhotos,
    /// [`PersistRequest::DeleteEvent`]
    DeleteEvent,
}

impl PersistRequest {
    /// Art der Anfrage
    pub fn kind(&self) -> RequestKind {
        use PersistRequest as R;
        match self {
            R::ListEvents => RequestKind::ListEvents,
            R::ListEquipment => RequestKind::ListEquipment,
            R::LoadEventData { .. } => RequestKind::LoadEventData,
            R::ListPoints { .. } => RequestKind::ListPoints,
            R::CreatePoint(_) => RequestKind::Create(ShapeKind::Point),
            R::UpdatePoint(_) => RequestKind::Update(ShapeKind::Point),
            R::DeletePoint(_) => RequestKind::Delete(ShapeKind::Point),
            R::CreateArea(_) => RequestKind::Create(ShapeKind::Area),
            R::UpdateArea(_) => RequestKind::Update(ShapeKind::Area),
            R::DeleteArea(_) => RequestKind::Delete(ShapeKind::Area),
            R::CreatePath(_) => RequestKind::Create(ShapeKind::Path),
            R::UpdatePath(_) => RequestKind::Update(ShapeKind::Path),
            R::DeletePath(_) => RequestKind::Delete(ShapeKind::Path),
            R::CreateSecurityZone(_) => RequestKind::Create(ShapeKind::SecurityZone),
            R::UpdateSecurityZone(_) => RequestKind::Update(ShapeKind::SecurityZone),
            R::DeleteSecurityZone(_) => RequestKind::Delete(ShapeKind::SecurityZone),
            R::AssignTeam { .. } => RequestKind::AssignTeam,
            R::TransferPhotos { .. } => RequestKind::TransferPhotos,
            R::DeleteEvent(_) => RequestKind::DeleteEvent,
        }
    }
}

/// Alle Geometrien eines Events
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EventData {
    /// Punkte
    pub points: Vec<Point>,
    /// Flächen
    pub areas: Vec<Area>,
    /// Wege
    pub paths: Vec<RoutePath>,
    /// Sicherheitszonen
    pub zones: Vec<SecurityZone>,
}

/// Antwort des Entity-Backends
#[derive(Debug, Clone, PartialEq)]
pub enum PersistReply {
    /// Event-Liste
    Events(Vec<Event>),
    /// Equipment-Katalog
    Equipment(Vec<Equipment>),
    /// Geometrien eines Events
    EventData(EventData),
    /// Punkt-Liste
    Points(Vec<Point>),
    /// Gespeicherter Punkt
    Point(Point),
    /// Gespeicherte Fläche
    Area(Area),
    /// Gespeicherter Weg
    Path(RoutePath),
    /// Gespeicherte Sicherheitszone
    SecurityZone(SecurityZone),
    /// Anzahl umgehängter Fotos
    PhotosTransferred(usize),
    /// Erfolgreich ohne Nutzdaten
    Done,
}

impl PersistReply {
    /// Gespeicherter Punkt
    pub fn into_point(self) -> Option<Point> {
        match self {
            PersistReply::Point(point) => Some(point),
            _ => None,
        }
    }

    /// Gespeicherte Fläche
    pub fn into_area(self) -> Option<Area> {
        match self {
            PersistReply::Area(area) => Some(area),
            _ => None,
        }
    }

    /// Gespeicherter Weg
    pub fn into_path(self) -> Option<RoutePath> {
        match self {
            PersistReply::Path(path) => Some(path),
            _ => None,
        }
    }

    /// Gespeicherte Sicherheitszone
    pub fn into_security_zone(self) -> Option<SecurityZone> {
        match self {
            PersistReply::SecurityZone(zone) => Some(zone),
            _ => None,
        }
    }

    /// Punkt-Liste
    pub fn into_points(self) -> Option<Vec<Point>> {
        match self {
            PersistReply::Points(points) => Some(points),
            _ => None,
        }
    }
}

/// Entnimmt die erwartete Nutzlast einer Antwort.
///
/// Eine Antwort unerwarteter Form zählt als Fehlschlag.
pub fn expect_reply<T>(
    outcome: Result<PersistReply, String>,
    pick: impl FnOnce(PersistReply) -> Option<T>,
) -> Result<T, String> {
    outcome.and_then(|reply| {
        pick(reply).ok_or_else(|| "Unerwartete Antwort des Backends".to_string())
    })
}

/// Gültigkeitsbedingung einer Antwort
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    /// Gültig, solange der Modus dieselbe Epoche hat
    Mode(u64),
    /// Gültig, solange dasselbe Event ausgewählt ist
    Event(u64),
    /// Immer gültig
    Unguarded,
}

/// Teil des Event-Commits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitPart {
    /// Event-Zone
    Area,
    /// Tracé
    Path,
}

/// Kontext des Sicherheitszonen-Ablaufs über die Persistenz-Schritte hinweg
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneCreationContext {
    /// Ursprungspunkt
    pub source_point_id: Uuid,
    /// Layer der gezeichneten Linie
    pub layer: LayerId,
    /// Zone (Entwurf, nach Anlage die gespeicherte Version)
    pub zone: SecurityZone,
    /// Event-Guard beim Start; nur für lokale Effekte der Folgeschritte
    pub event_guard: Guard,
}

/// Was bei Eintreffen der Antwort zu tun ist
#[derive(Debug, Clone)]
pub enum Awaiting {
    /// Event-Liste übernehmen
    Events,
    /// Equipment-Katalog übernehmen
    Equipment,
    /// Geometrien des Events aufbauen
    EventData {
        /// Event
        event_id: Uuid,
    },
    /// Punkte ersetzen (periodische Aktualisierung)
    PointRefresh {
        /// Event
        event_id: Uuid,
    },
    /// Neu gezeichneten Punkt binden
    PointCreated {
        /// Marker-Layer
        layer: LayerId,
    },
    /// Frei gezeichnete Fläche binden
    AreaCreated {
        /// Polygon-Layer
        layer: LayerId,
    },
    /// Frei gezeichneten Weg binden
    PathCreated {
        /// Linien-Layer
        layer: LayerId,
    },
    /// Aktualisierte Entity übernehmen
    EntitySaved {
        /// Art
        kind: ShapeKind,
        /// Entity
        id: Uuid,
    },
    /// Gelöschte Entity aus dem Katalog entfernen
    EntityDeleted {
        /// Art
        kind: ShapeKind,
        /// Entity
        id: Uuid,
    },
    /// Nächster Schritt des Sicherheitszonen-Ablaufs
    ZoneCreation {
        /// Restliche Schritte (laufender Schritt = `plan.current()`)
        plan: StepPlan<ZoneStep>,
        /// Kontext
        context: ZoneCreationContext,
    },
    /// Nächster Schritt beim Speichern der Zonen-Bearbeitung
    ZoneEdit {
        /// Restliche Schritte
        plan: StepPlan<ZoneEditStep>,
        /// Zu speichernder Stand
        draft: SecurityZone,
    },
    /// Teil des Event-Commits
    EventCommit {
        /// Fläche oder Weg
        part: CommitPart,
    },
    /// Abgebrochenes Event wurde gelöscht
    EventDeleted {
        /// Event
        event_id: Uuid,
    },
}

/// Eine eingereihte, noch nicht abgeholte Anfrage
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingRequest {
    /// ID für die Antwort
    pub id: RequestId,
    /// Anfrage
    pub request: PersistRequest,
}

/// Warteschlange ausgehender Anfragen und offener Fortsetzungen
#[derive(Default)]
pub struct Outbox {
    next_id: u64,
    queued: Vec<OutgoingRequest>,
    in_flight: HashMap<RequestId, (Guard, Awaiting)>,
}

impl Outbox {
    /// Erstellt eine leere Outbox.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reiht eine Anfrage ein.
    pub fn issue(&mut self, request: PersistRequest, guard: Guard, awaiting: Awaiting) -> RequestId {
        self.next_id += 1;
        let id = RequestId(self.next_id);
        log::debug!("Anfrage {:?}: {:?}", id, request.kind());
        self.queued.push(OutgoingRequest { id, request });
        self.in_flight.insert(id, (guard, awaiting));
        id
    }

    /// Holt alle eingereihten Anfragen ab (ein Batch läuft parallel).
    pub fn take_queued(&mut self) -> Vec<OutgoingRequest> {
        std::mem::take(&mut self.queued)
    }

    /// Eingereihte, noch nicht abgeholte Anfragen
    pub fn queued(&self) -> &[OutgoingRequest] {
        &self.queued
    }

    /// Entnimmt die Fortsetzung einer beantworteten Anfrage.
    pub fn resolve(&mut self, id: RequestId) -> Option<(Guard, Awaiting)> {
        self.in_flight.remove(&id)
    }

    /// Anzahl offener Anfragen
    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_queue_and_resolve() {
        let mut outbox = Outbox::new();
        let a = outbox.issue(PersistRequest::ListEvents, Guard::Unguarded, Awaiting::Events);
        let b = outbox.issue(
            PersistRequest::ListEquipment,
            Guard::Unguarded,
            Awaiting::Equipment,
        );
        assert_ne!(a, b);

        let batch = outbox.take_queued();
        assert_eq!(batch.len(), 2);
        assert!(outbox.take_queued().is_empty());
        assert_eq!(outbox.in_flight_count(), 2);

        assert!(matches!(outbox.resolve(b), Some((_, Awaiting::Equipment))));
        assert!(outbox.resolve(b).is_none(), "Antwort nur einmal zustellbar");
        assert_eq!(outbox.in_flight_count(), 1);
    }

    #[test]
    fn test_request_kind() {
        assert_eq!(
            PersistRequest::DeleteSecurityZone(Uuid::new_v4()).kind(),
            RequestKind::Delete(ShapeKind::SecurityZone)
        );
    }
}
