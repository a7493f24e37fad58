//! Benannte Fläche (freie Zone oder Event-Zone).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::entity::Entity;
use super::naming;

/// Eine Fläche mit Polygon-Geometrie
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Area {
    /// Eindeutige ID
    #[serde(rename = "uuid")]
    pub id: Uuid,
    /// Zugehöriges Event
    pub event_id: Uuid,
    /// Name
    #[serde(default)]
    pub name: Option<String>,
    /// Beschreibung
    #[serde(default)]
    pub description: Option<String>,
    /// Farbe als `#rrggbb`
    pub color_hex: String,
    /// Polygon als GeoJSON-Text
    pub geo_json: String,
}

impl Area {
    /// Erstellt eine neue Fläche
    pub fn new(event_id: Uuid, name: String, color_hex: String, geo_json: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_id,
            name: Some(name),
            description: None,
            color_hex,
            geo_json,
        }
    }

    /// Gehört die Fläche zum Event selbst (`Zone - <Titel>`)?
    pub fn is_event_owned(&self) -> bool {
        naming::is_event_owned_area(self.name.as_deref())
    }
}

impl Entity for Area {
    const KIND: &'static str = "Fläche";

    fn id(&self) -> Uuid {
        self.id
    }

    fn event_id(&self) -> Option<Uuid> {
        Some(self.event_id)
    }
}
