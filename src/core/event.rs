//! Event (Veranstaltung), dem alle Geometrien zugeordnet sind.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::entity::Entity;

/// Status eines Events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EventStatus {
    /// In Planung
    #[default]
    Draft,
    /// Freigegeben
    Active,
    /// Abgeschlossen
    Completed,
    /// Abgesagt
    Cancelled,
}

/// Ein Event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Eindeutige ID
    #[serde(rename = "uuid")]
    pub id: Uuid,
    /// Titel
    pub title: String,
    /// Beschreibung
    #[serde(default)]
    pub description: Option<String>,
    /// Beginn
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    /// Ende
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    /// Status
    #[serde(default)]
    pub status: EventStatus,
}

impl Event {
    /// Erstellt ein Event im Status `Draft`
    pub fn new(
        title: impl Into<String>,
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: None,
            start_date,
            end_date,
            status: EventStatus::Draft,
        }
    }
}

impl Entity for Event {
    const KIND: &'static str = "Event";

    fn id(&self) -> Uuid {
        self.id
    }
}
