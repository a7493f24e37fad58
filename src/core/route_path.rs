//! Weg: benannter Pfad, Event-Tracé oder Equipment-Chemin.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::entity::Entity;
use super::naming;

/// Ein Weg mit Linien-Geometrie
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutePath {
    /// Eindeutige ID
    #[serde(rename = "uuid")]
    pub id: Uuid,
    /// Zugehöriges Event
    pub event_id: Uuid,
    /// Name (bestimmt die Rolle des Weges)
    pub name: String,
    /// Farbe als `#rrggbb`
    pub color_hex: String,
    /// Startzeitpunkt
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    /// Geschätzte Höchstgeschwindigkeit (km/h)
    pub fastest_estimated_speed: f64,
    /// Geschätzte Mindestgeschwindigkeit (km/h)
    pub slowest_estimated_speed: f64,
    /// Linie als GeoJSON-Text
    pub geo_json: String,
}

/// Rolle eines Weges, abgeleitet aus seinem Namen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathRole {
    /// Frei benannter Weg
    Named,
    /// Tracé des Events (`Tracé - <Titel>`)
    EventTrace,
    /// Automatisch benannte Equipment-Linie (`Chemin <Zeitstempel>`)
    Equipment,
}

impl RoutePath {
    /// Erstellt einen neuen Weg mit Startzeitpunkt `now`
    pub fn new(
        event_id: Uuid,
        name: String,
        color_hex: String,
        speeds: (f64, f64),
        geo_json: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_id,
            name,
            color_hex,
            start_date: Some(now),
            fastest_estimated_speed: speeds.0,
            slowest_estimated_speed: speeds.1,
            geo_json,
        }
    }

    /// Rolle des Weges
    pub fn role(&self) -> PathRole {
        if naming::is_equipment_path(Some(&self.name)) {
            PathRole::Equipment
        } else if naming::is_event_trace(Some(&self.name)) {
            PathRole::EventTrace
        } else {
            PathRole::Named
        }
    }
}

impl Entity for RoutePath {
    const KIND: &'static str = "Weg";

    fn id(&self) -> Uuid {
        self.id
    }

    fn event_id(&self) -> Option<Uuid> {
        Some(self.event_id)
    }
}
