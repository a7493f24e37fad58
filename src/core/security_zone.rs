//! Sicherheitszone: Equipment entlang einer Linie.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::entity::Entity;

/// Eine Sicherheitszone (z.B. Absperrgitter entlang einer Strecke)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityZone {
    /// Eindeutige ID
    #[serde(rename = "uuid")]
    pub id: Uuid,
    /// Zugehöriges Event
    pub event_id: Uuid,
    /// Verwendetes Equipment
    pub equipment_id: Uuid,
    /// Stückzahl (mindestens 1)
    pub quantity: u32,
    /// Kommentar
    #[serde(default)]
    pub comment: Option<String>,
    /// Aufbau-Datum
    #[serde(default)]
    pub installation_date: Option<DateTime<Utc>>,
    /// Abbau-Datum
    #[serde(default)]
    pub removal_date: Option<DateTime<Utc>>,
    /// Linie als GeoJSON-Text
    pub geo_json: String,
    /// Aufbau-Team
    #[serde(default)]
    pub installation_team_id: Option<Uuid>,
    /// Abbau-Team
    #[serde(default)]
    pub removal_team_id: Option<Uuid>,
}

/// Team-Rolle an einer Sicherheitszone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TeamRole {
    /// Aufbau
    Installation,
    /// Abbau
    Removal,
}

impl SecurityZone {
    /// Team einer Rolle
    pub fn team(&self, role: TeamRole) -> Option<Uuid> {
        match role {
            TeamRole::Installation => self.installation_team_id,
            TeamRole::Removal => self.removal_team_id,
        }
    }

    /// Setzt das Team einer Rolle
    pub fn set_team(&mut self, role: TeamRole, team_id: Option<Uuid>) {
        match role {
            TeamRole::Installation => self.installation_team_id = team_id,
            TeamRole::Removal => self.removal_team_id = team_id,
        }
    }
}

impl Entity for SecurityZone {
    const KIND: &'static str = "Sicherheitszone";

    fn id(&self) -> Uuid {
        self.id
    }

    fn event_id(&self) -> Option<Uuid> {
        Some(self.event_id)
    }
}
