//! Entity-Backend: die REST-artige Persistenz, die die Engine konsumiert.
//!
//! Die Engine kennt nur `PersistRequest`/`PersistReply`. Ein Backend führt
//! Anfragen aus; `pump` liefert die Antworten als Intents an den Controller.

mod memory;
mod pump;

pub use memory::{MemoryBackend, MemoryRepository, MemorySeed};
pub use pump::{pump, pump_once, MAX_PUMP_ROUNDS};

use anyhow::Result;
use uuid::Uuid;

use crate::app::{PersistReply, PersistRequest};
use crate::core::Entity;

/// CRUD-Operationen für eine Entity-Art
pub trait Repository<T: Entity> {
    /// Alle Entities
    fn list(&self) -> Vec<T>;
    /// Entity nach ID
    fn get_by_id(&self, id: Uuid) -> Option<T>;
    /// Alle Entities eines Events
    fn get_by_event_id(&self, event_id: Uuid) -> Vec<T>;
    /// Legt eine Entity an
    fn create(&mut self, item: T) -> Result<T>;
    /// Ersetzt eine bestehende Entity
    fn update(&mut self, item: T) -> Result<T>;
    /// Löscht eine Entity
    fn delete(&mut self, id: Uuid) -> Result<()>;
}

/// Führt Persistenz-Anfragen aus.
pub trait EntityBackend {
    /// Führt eine Anfrage aus. Ein Fehler wird als Fehlschlag beantwortet.
    fn execute(&mut self, request: &PersistRequest) -> Result<PersistReply>;
}
