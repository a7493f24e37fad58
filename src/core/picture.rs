//! Foto an einem Punkt oder einer Sicherheitszone.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::entity::Entity;

/// Ein Foto (Base64-kodiert)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Picture {
    /// Eindeutige ID
    #[serde(rename = "uuid")]
    pub id: Uuid,
    /// Punkt, an dem das Foto hängt
    #[serde(default)]
    pub point_id: Option<Uuid>,
    /// Sicherheitszone, an der das Foto hängt
    #[serde(default)]
    pub security_zone_id: Option<Uuid>,
    /// Bilddaten (Base64)
    pub picture_data: String,
}

impl Picture {
    /// Hängt das Foto vom Punkt an die Sicherheitszone um
    pub fn move_to_zone(&mut self, zone_id: Uuid) {
        self.point_id = None;
        self.security_zone_id = Some(zone_id);
    }
}

impl Entity for Picture {
    const KIND: &'static str = "Foto";

    fn id(&self) -> Uuid {
        self.id
    }
}
