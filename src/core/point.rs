//! Punkt auf der Karte (Equipment-Standort oder Point of Interest).

use glam::DVec2;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::entity::Entity;

/// Ein Punkt eines Events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Point {
    /// Eindeutige ID
    #[serde(rename = "uuid")]
    pub id: Uuid,
    /// Zugehöriges Event
    pub event_id: Uuid,
    /// Längengrad
    pub longitude: f64,
    /// Breitengrad
    pub latitude: f64,
    /// Freitext-Kommentar
    #[serde(default)]
    pub comment: Option<String>,
    /// Zugeordnetes Equipment
    #[serde(default)]
    pub equipment_id: Option<Uuid>,
    /// Point of Interest statt regulärem Punkt
    #[serde(default)]
    pub is_point_of_interest: bool,
    /// Reihenfolge (nur für reguläre Punkte relevant)
    #[serde(default)]
    pub order: u32,
    /// Vor Ort validiert
    #[serde(default)]
    pub validated: bool,
}

impl Point {
    /// Erstellt einen neuen, nicht validierten Punkt ohne Kommentar.
    pub fn new(event_id: Uuid, position: DVec2, is_point_of_interest: bool, order: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_id,
            longitude: position.x,
            latitude: position.y,
            comment: Some(String::new()),
            equipment_id: None,
            is_point_of_interest,
            order,
            validated: false,
        }
    }

    /// Position als `[lon, lat]`
    pub fn position(&self) -> DVec2 {
        DVec2::new(self.longitude, self.latitude)
    }

    /// Setzt die Position
    pub fn set_position(&mut self, position: DVec2) {
        self.longitude = position.x;
        self.latitude = position.y;
    }

    /// Kommentar, leere Texte zählen als nicht vorhanden
    pub fn comment_text(&self) -> Option<&str> {
        self.comment.as_deref().filter(|c| !c.trim().is_empty())
    }
}

impl Entity for Point {
    const KIND: &'static str = "Punkt";

    fn id(&self) -> Uuid {
        self.id
    }

    fn event_id(&self) -> Option<Uuid> {
        Some(self.event_id)
    }
}
