//! Gemeinsame Schnittstelle aller persistierten Entities.

use uuid::Uuid;

/// Persistierte Entity mit eindeutiger ID.
pub trait Entity: Clone {
    /// Anzeigename der Entity-Art (für Logs und Fehlermeldungen)
    const KIND: &'static str;

    /// Eindeutige ID
    fn id(&self) -> Uuid;

    /// Event, zu dem die Entity gehört (falls event-gebunden)
    fn event_id(&self) -> Option<Uuid> {
        None
    }
}

/// Ersetzt eine Entity mit gleicher ID oder hängt sie an.
pub fn upsert<T: Entity>(items: &mut Vec<T>, item: T) {
    match items.iter_mut().find(|existing| existing.id() == item.id()) {
        Some(existing) => *existing = item,
        None => items.push(item),
    }
}

/// Entfernt die Entity mit der ID und gibt sie zurück.
pub fn remove_by_id<T: Entity>(items: &mut Vec<T>, id: Uuid) -> Option<T> {
    let index = items.iter().position(|item| item.id() == id)?;
    Some(items.remove(index))
}
