//! Lokale Kopie der Entities des ausgewählten Events.

use uuid::Uuid;

use super::visibility::FilterCategory;
use crate::core::entity::{remove_by_id, upsert};
use crate::core::{naming, Area, Event, Point, RoutePath, SecurityZone};

/// Entities des ausgewählten Events
#[derive(Debug, Clone, Default)]
pub struct EventCatalog {
    /// Ausgewähltes Event (None = keine Auswahl)
    pub event: Option<Event>,
    /// Punkte (regulär und Points of Interest)
    pub points: Vec<Point>,
    /// Flächen
    pub areas: Vec<Area>,
    /// Wege
    pub paths: Vec<RoutePath>,
    /// Sicherheitszonen
    pub zones: Vec<SecurityZone>,
}

impl EventCatalog {
    /// Leerer Katalog für ein Event
    pub fn for_event(event: Event) -> Self {
        Self {
            event: Some(event),
            ..Self::default()
        }
    }

    /// ID des ausgewählten Events
    pub fn event_id(&self) -> Option<Uuid> {
        self.event.as_ref().map(|e| e.id)
    }

    /// Leert den Katalog inklusive Event-Auswahl
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Mitglieder einer Filter-Kategorie
    pub fn members(&self, category: FilterCategory) -> Vec<Uuid> {
        match category {
            FilterCategory::Points => self
                .points
                .iter()
                .filter(|p| !p.is_point_of_interest)
                .map(|p| p.id)
                .collect(),
            FilterCategory::PointsOfInterest => self
                .points
                .iter()
                .filter(|p| p.is_point_of_interest)
                .map(|p| p.id)
                .collect(),
            FilterCategory::Areas => self.areas.iter().map(|a| a.id).collect(),
            FilterCategory::NamedPaths => self
                .paths
                .iter()
                .filter(|p| naming::is_named_path(Some(&p.name)))
                .map(|p| p.id)
                .collect(),
            FilterCategory::EquipmentPaths => self
                .paths
                .iter()
                .filter(|p| naming::is_equipment_path(Some(&p.name)))
                .map(|p| p.id)
                .collect(),
            FilterCategory::SecurityZones => self.zones.iter().map(|z| z.id).collect(),
        }
    }

    /// Anzahl regulärer Punkte (Basis für die Reihenfolge neuer Punkte)
    pub fn regular_point_count(&self) -> usize {
        self.points.iter().filter(|p| !p.is_point_of_interest).count()
    }

    /// Punkt nach ID
    pub fn point(&self, id: Uuid) -> Option<&Point> {
        self.points.iter().find(|p| p.id == id)
    }

    /// Fläche nach ID
    pub fn area(&self, id: Uuid) -> Option<&Area> {
        self.areas.iter().find(|a| a.id == id)
    }

    /// Weg nach ID
    pub fn path(&self, id: Uuid) -> Option<&RoutePath> {
        self.paths.iter().find(|p| p.id == id)
    }

    /// Sicherheitszone nach ID
    pub fn zone(&self, id: Uuid) -> Option<&SecurityZone> {
        self.zones.iter().find(|z| z.id == id)
    }

    /// Fügt einen Punkt ein oder ersetzt ihn
    pub fn upsert_point(&mut self, point: Point) {
        upsert(&mut self.points, point);
    }

    /// Fügt eine Fläche ein oder ersetzt sie
    pub fn upsert_area(&mut self, area: Area) {
        upsert(&mut self.areas, area);
    }

    /// Fügt einen Weg ein oder ersetzt ihn
    pub fn upsert_path(&mut self, path: RoutePath) {
        upsert(&mut self.paths, path);
    }

    /// Fügt eine Sicherheitszone ein oder ersetzt sie
    pub fn upsert_zone(&mut self, zone: SecurityZone) {
        upsert(&mut self.zones, zone);
    }

    /// Entfernt einen Punkt
    pub fn remove_point(&mut self, id: Uuid) -> Option<Point> {
        remove_by_id(&mut self.points, id)
    }

    /// Entfernt eine Fläche
    pub fn remove_area(&mut self, id: Uuid) -> Option<Area> {
        remove_by_id(&mut self.areas, id)
    }

    /// Entfernt einen Weg
    pub fn remove_path(&mut self, id: Uuid) -> Option<RoutePath> {
        remove_by_id(&mut self.paths, id)
    }

    /// Entfernt eine Sicherheitszone
    pub fn remove_zone(&mut self, id: Uuid) -> Option<SecurityZone> {
        remove_by_id(&mut self.zones, id)
    }
}
