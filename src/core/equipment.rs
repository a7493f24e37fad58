//! Equipment-Katalog.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::entity::Entity;

/// Ein Equipment-Typ mit optionaler Einheitslänge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Equipment {
    /// Eindeutige ID
    #[serde(rename = "uuid")]
    pub id: Uuid,
    /// Typ-Bezeichnung
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    /// Beschreibung
    #[serde(default)]
    pub description: Option<String>,
    /// Länge einer Einheit in Metern
    #[serde(default)]
    pub length: Option<f64>,
}

impl Equipment {
    /// Einheitslänge, nur wenn positiv
    pub fn unit_length(&self) -> Option<f64> {
        self.length.filter(|l| *l > 0.0)
    }

    /// Anzeigename
    pub fn label(&self) -> &str {
        self.kind
            .as_deref()
            .or(self.description.as_deref())
            .unwrap_or("Equipment")
    }
}

impl Entity for Equipment {
    const KIND: &'static str = "Equipment";

    fn id(&self) -> Uuid {
        self.id
    }
}
