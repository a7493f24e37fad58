//! In-Memory-Backend für Tests und den Replay-Host.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{EntityBackend, Repository};
use crate::app::{EventData, PersistReply, PersistRequest, RequestKind};
use crate::core::{
    Area, Entity, Equipment, Event, Picture, Point, RoutePath, SecurityZone, TeamRole,
};

/// Repository einer Entity-Art (Einfügereihenfolge bleibt erhalten)
#[derive(Debug, Clone)]
pub struct MemoryRepository<T: Entity> {
    items: IndexMap<Uuid, T>,
}

impl<T: Entity> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self {
            items: IndexMap::new(),
        }
    }
}

impl<T: Entity> MemoryRepository<T> {
    /// Leeres Repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository mit Anfangsbestand
    pub fn from_items(items: impl IntoIterator<Item = T>) -> Self {
        Self {
            items: items.into_iter().map(|item| (item.id(), item)).collect(),
        }
    }

    /// Anzahl der Entities
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Gibt `true` zurück, wenn das Repository leer ist.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Behält nur Entities, für die `keep` gilt. Gibt die Anzahl entfernter zurück.
    pub fn retain(&mut self, mut keep: impl FnMut(&T) -> bool) -> usize {
        let before = self.items.len();
        self.items.retain(|_, item| keep(item));
        before - self.items.len()
    }

    fn get_mut(&mut self, id: Uuid) -> Option<&mut T> {
        self.items.get_mut(&id)
    }
}

impl<T: Entity> Repository<T> for MemoryRepository<T> {
    fn list(&self) -> Vec<T> {
        self.items.values().cloned().collect()
    }

    fn get_by_id(&self, id: Uuid) -> Option<T> {
        self.items.get(&id).cloned()
    }

    fn get_by_event_id(&self, event_id: Uuid) -> Vec<T> {
        self.items
            .values()
            .filter(|item| item.event_id() == Some(event_id))
            .cloned()
            .collect()
    }

    fn create(&mut self, item: T) -> Result<T> {
        let id = item.id();
        if self.items.contains_key(&id) {
            bail!("{} {} existiert bereits", T::KIND, id);
        }
        self.items.insert(id, item.clone());
        Ok(item)
    }

    fn update(&mut self, item: T) -> Result<T> {
        let Some(existing) = self.items.get_mut(&item.id()) else {
            bail!("{} {} nicht gefunden", T::KIND, item.id());
        };
        *existing = item.clone();
        Ok(item)
    }

    fn delete(&mut self, id: Uuid) -> Result<()> {
        if self.items.shift_remove(&id).is_none() {
            bail!("{} {} nicht gefunden", T::KIND, id);
        }
        Ok(())
    }
}

/// Anfangsbestand des In-Memory-Backends (JSON)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemorySeed {
    /// Events
    pub events: Vec<Event>,
    /// Equipment-Katalog
    pub equipment: Vec<Equipment>,
    /// Punkte
    pub points: Vec<Point>,
    /// Flächen
    pub areas: Vec<Area>,
    /// Wege
    pub paths: Vec<RoutePath>,
    /// Sicherheitszonen
    pub zones: Vec<SecurityZone>,
    /// Fotos
    pub pictures: Vec<Picture>,
}

impl MemorySeed {
    /// Lädt einen Anfangsbestand aus einer JSON-Datei.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Seed-Datei {} nicht lesbar", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Seed-Datei {} ist kein gültiges JSON", path.display()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Injected {
    Always,
    Once,
}

/// Backend, das alle Entities im Speicher hält.
///
/// Für Tests lassen sich Fehlschläge pro Anfrage-Art einstellen.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    /// Events
    pub events: MemoryRepository<Event>,
    /// Equipment-Katalog
    pub equipment: MemoryRepository<Equipment>,
    /// Punkte
    pub points: MemoryRepository<Point>,
    /// Flächen
    pub areas: MemoryRepository<Area>,
    /// Wege
    pub paths: MemoryRepository<RoutePath>,
    /// Sicherheitszonen
    pub zones: MemoryRepository<SecurityZone>,
    /// Fotos
    pub pictures: MemoryRepository<Picture>,
    failures: HashMap<RequestKind, Injected>,
    executed: Vec<RequestKind>,
}

impl MemoryBackend {
    /// Leeres Backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend mit Anfangsbestand
    pub fn from_seed(seed: MemorySeed) -> Self {
        Self {
            events: MemoryRepository::from_items(seed.events),
            equipment: MemoryRepository::from_items(seed.equipment),
            points: MemoryRepository::from_items(seed.points),
            areas: MemoryRepository::from_items(seed.areas),
            paths: MemoryRepository::from_items(seed.paths),
            zones: MemoryRepository::from_items(seed.zones),
            pictures: MemoryRepository::from_items(seed.pictures),
            ..Self::default()
        }
    }

    /// Aktueller Bestand
    pub fn snapshot(&self) -> MemorySeed {
        MemorySeed {
            events: self.events.list(),
            equipment: self.equipment.list(),
            points: self.points.list(),
            areas: self.areas.list(),
            paths: self.paths.list(),
            zones: self.zones.list(),
            pictures: self.pictures.list(),
        }
    }

    /// Lässt jede Anfrage dieser Art fehlschlagen.
    pub fn fail_on(&mut self, kind: RequestKind) {
        self.failures.insert(kind, Injected::Always);
    }

    /// Lässt die nächste Anfrage dieser Art fehlschlagen.
    pub fn fail_once(&mut self, kind: RequestKind) {
        self.failures.insert(kind, Injected::Once);
    }

    /// Entfernt alle eingestellten Fehlschläge.
    pub fn clear_failures(&mut self) {
        self.failures.clear();
    }

    /// Ausgeführte Anfragen in Reihenfolge (auch fehlgeschlagene)
    pub fn executed(&self) -> &[RequestKind] {
        &self.executed
    }

    /// Wie oft wurde eine Anfrage-Art ausgeführt?
    pub fn count(&self, kind: RequestKind) -> usize {
        self.executed.iter().filter(|k| **k == kind).count()
    }

    fn injected_failure(&mut self, kind: RequestKind) -> bool {
        match self.failures.get(&kind).copied() {
            Some(Injected::Always) => true,
            Some(Injected::Once) => {
                self.failures.remove(&kind);
                true
            }
            None => false,
        }
    }

    fn event_data(&self, event_id: Uuid) -> Result<EventData> {
        if self.events.get_by_id(event_id).is_none() {
            bail!("Event {} nicht gefunden", event_id);
        }
        Ok(EventData {
            points: self.points.get_by_event_id(event_id),
            areas: self.areas.get_by_event_id(event_id),
            paths: self.paths.get_by_event_id(event_id),
            zones: self.zones.get_by_event_id(event_id),
        })
    }

    fn assign_team(
        &mut self,
        zone_id: Uuid,
        role: TeamRole,
        team_id: Option<Uuid>,
    ) -> Result<SecurityZone> {
        let zone = self
            .zones
            .get_mut(zone_id)
            .with_context(|| format!("Sicherheitszone {} nicht gefunden", zone_id))?;
        zone.set_team(role, team_id);
        Ok(zone.clone())
    }

    fn transfer_photos(&mut self, point_id: Uuid, zone_id: Uuid) -> Result<usize> {
        if self.zones.get_by_id(zone_id).is_none() {
            bail!("Sicherheitszone {} nicht gefunden", zone_id);
        }
        let mut moved = 0;
        for picture in self.pictures.items.values_mut() {
            if picture.point_id == Some(point_id) {
                picture.move_to_zone(zone_id);
                moved += 1;
            }
        }
        Ok(moved)
    }

    /// Löscht ein Event samt aller abhängigen Entities.
    fn delete_event(&mut self, event_id: Uuid) -> Result<()> {
        self.events.delete(event_id)?;
        let owned = |id: Option<Uuid>| id == Some(event_id);

        let point_ids: Vec<Uuid> = self
            .points
            .get_by_event_id(event_id)
            .iter()
            .map(|p| p.id)
            .collect();
        let zone_ids: Vec<Uuid> = self
            .zones
            .get_by_event_id(event_id)
            .iter()
            .map(|z| z.id)
            .collect();

        self.points.retain(|p| !owned(p.event_id()));
        self.areas.retain(|a| !owned(a.event_id()));
        self.paths.retain(|p| !owned(p.event_id()));
        self.zones.retain(|z| !owned(z.event_id()));
        let pictures = self.pictures.retain(|pic| {
            !pic.point_id.is_some_and(|id| point_ids.contains(&id))
                && !pic.security_zone_id.is_some_and(|id| zone_ids.contains(&id))
        });
        log::debug!(
            "Event {} gelöscht ({} Punkte, {} Zonen, {} Fotos)",
            event_id,
            point_ids.len(),
            zone_ids.len(),
            pictures
        );
        Ok(())
    }
}

impl EntityBackend for MemoryBackend {
    fn execute(&mut self, request: &PersistRequest) -> Result<PersistReply> {
        let kind = request.kind();
        self.executed.push(kind);
        if self.injected_failure(kind) {
            bail!("Anfrage {:?} abgelehnt", kind);
        }

        use PersistRequest as R;
        let reply = match request {
            R::ListEvents => PersistReply::Events(self.events.list()),
            R::ListEquipment => PersistReply::Equipment(self.equipment.list()),
            R::LoadEventData { event_id } => PersistReply::EventData(self.event_data(*event_id)?),
            R::ListPoints { event_id } => {
                PersistReply::Points(self.points.get_by_event_id(*event_id))
            }
            R::CreatePoint(point) => PersistReply::Point(self.points.create(point.clone())?),
            R::UpdatePoint(point) => PersistReply::Point(self.points.update(point.clone())?),
            R::DeletePoint(id) => {
                self.points.delete(*id)?;
                PersistReply::Done
            }
            R::CreateArea(area) => PersistReply::Area(self.areas.create(area.clone())?),
            R::UpdateArea(area) => PersistReply::Area(self.areas.update(area.clone())?),
            R::DeleteArea(id) => {
                self.areas.delete(*id)?;
                PersistReply::Done
            }
            R::CreatePath(path) => PersistReply::Path(self.paths.create(path.clone())?),
            R::UpdatePath(path) => PersistReply::Path(self.paths.update(path.clone())?),
            R::DeletePath(id) => {
                self.paths.delete(*id)?;
                PersistReply::Done
            }
            R::CreateSecurityZone(zone) => {
                PersistReply::SecurityZone(self.zones.create(zone.clone())?)
            }
            R::UpdateSecurityZone(zone) => {
                PersistReply::SecurityZone(self.zones.update(zone.clone())?)
            }
            R::DeleteSecurityZone(id) => {
                self.zones.delete(*id)?;
                PersistReply::Done
            }
            R::AssignTeam {
                zone_id,
                role,
                team_id,
            } => PersistReply::SecurityZone(self.assign_team(*zone_id, *role, *team_id)?),
            R::TransferPhotos { point_id, zone_id } => {
                PersistReply::PhotosTransferred(self.transfer_photos(*point_id, *zone_id)?)
            }
            R::DeleteEvent(id) => {
                self.delete_event(*id)?;
                PersistReply::Done
            }
        };
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;

    fn backend_with_event() -> (MemoryBackend, Event) {
        let event = Event::new("Marathon", None, None);
        let backend = MemoryBackend::from_seed(MemorySeed {
            events: vec![event.clone()],
            ..MemorySeed::default()
        });
        (backend, event)
    }

    #[test]
    fn test_repository_rejects_unknown_update() {
        let mut repo: MemoryRepository<Point> = MemoryRepository::new();
        let point = Point::new(Uuid::new_v4(), DVec2::ZERO, false, 1);
        assert!(repo.update(point.clone()).is_err());
        repo.create(point.clone()).expect("Anlegen sollte klappen");
        assert!(repo.create(point.clone()).is_err());
        assert_eq!(repo.get_by_event_id(point.event_id).len(), 1);
        repo.delete(point.id).expect("Löschen sollte klappen");
        assert!(repo.is_empty());
    }

    #[test]
    fn test_fail_once_applies_only_to_next_request() {
        let (mut backend, _) = backend_with_event();
        backend.fail_once(RequestKind::ListEvents);
        assert!(backend.execute(&PersistRequest::ListEvents).is_err());
        assert!(backend.execute(&PersistRequest::ListEvents).is_ok());
        assert_eq!(backend.count(RequestKind::ListEvents), 2);
    }

    #[test]
    fn test_transfer_photos_moves_only_point_pictures() {
        let (mut backend, event) = backend_with_event();
        let point = Point::new(event.id, DVec2::ZERO, false, 1);
        let other = Uuid::new_v4();
        backend.points.create(point.clone()).expect("Punkt anlegen");
        let zone = SecurityZone {
            id: Uuid::new_v4(),
            event_id: event.id,
            equipment_id: Uuid::new_v4(),
            quantity: 1,
            comment: None,
            installation_date: None,
            removal_date: None,
            geo_json: String::new(),
            installation_team_id: None,
            removal_team_id: None,
        };
        backend.zones.create(zone.clone()).expect("Zone anlegen");
        for owner in [point.id, point.id, other] {
            backend
                .pictures
                .create(Picture {
                    id: Uuid::new_v4(),
                    point_id: Some(owner),
                    security_zone_id: None,
                    picture_data: "AAAA".into(),
                })
                .expect("Foto anlegen");
        }

        let reply = backend
            .execute(&PersistRequest::TransferPhotos {
                point_id: point.id,
                zone_id: zone.id,
            })
            .expect("Übertragung sollte klappen");
        assert_eq!(reply, PersistReply::PhotosTransferred(2));
        let on_zone = backend
            .pictures
            .list()
            .into_iter()
            .filter(|p| p.security_zone_id == Some(zone.id))
            .count();
        assert_eq!(on_zone, 2);
    }

    #[test]
    fn test_delete_event_cascades() {
        let (mut backend, event) = backend_with_event();
        let point = Point::new(event.id, DVec2::ZERO, false, 1);
        backend.points.create(point).expect("Punkt anlegen");
        backend
            .areas
            .create(Area::new(event.id, "Zone 1".into(), "#3388ff".into(), "{}".into()))
            .expect("Fläche anlegen");

        backend
            .execute(&PersistRequest::DeleteEvent(event.id))
            .expect("Löschen sollte klappen");
        assert!(backend.events.is_empty());
        assert!(backend.points.is_empty());
        assert!(backend.areas.is_empty());
    }
}
