//! Registry der Layer-Bindungen: persistierte Entity-ID ↔ visueller Layer.
//!
//! Der Store ist die einzige Stelle, die Layer gebundener Entities entfernt.
//! Jede Bindungsänderung wird synchron auf der Karte nachgezogen und an
//! Abonnenten gemeldet (Sichtbarkeitsfilter werden daraufhin neu angewendet).

use std::collections::HashMap;
use std::sync::mpsc::{channel, Receiver, Sender};

use indexmap::{IndexMap, IndexSet};
use uuid::Uuid;

use crate::map::{LayerId, MapSurface};

/// Art einer gebundenen Form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ShapeKind {
    /// Punkt-Marker
    Point,
    /// Fläche
    Area,
    /// Weg
    Path,
    /// Sicherheitszone
    SecurityZone,
}

/// Bindung einer Entity an ihren Layer
#[derive(Debug, Clone, PartialEq)]
pub struct LayerBinding {
    /// Entity-ID
    pub entity_id: Uuid,
    /// Art der Form
    pub kind: ShapeKind,
    /// Visueller Layer
    pub layer: LayerId,
    /// Aktuell eingeblendet?
    pub visible: bool,
}

/// Änderungsmeldung des Stores
#[derive(Debug, Clone, PartialEq)]
pub enum StoreChange {
    /// Entity wurde gebunden
    Bound {
        /// Entity-ID
        entity_id: Uuid,
        /// Art der Form
        kind: ShapeKind,
    },
    /// Bindung wurde entfernt (Layer entfernt)
    Unbound {
        /// Entity-ID
        entity_id: Uuid,
        /// Art der Form
        kind: ShapeKind,
    },
    /// Entity hat einen neuen Layer erhalten
    Rebound {
        /// Entity-ID
        entity_id: Uuid,
    },
    /// Alle Bindungen wurden entfernt
    Cleared,
}

/// Registry aller Layer-Bindungen des ausgewählten Events
#[derive(Default)]
pub struct GeometryStore {
    bindings: IndexMap<Uuid, LayerBinding>,
    by_layer: HashMap<LayerId, Uuid>,
    unbound: IndexSet<LayerId>,
    listeners: Vec<Sender<StoreChange>>,
}

impl GeometryStore {
    /// Erstellt einen leeren Store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Abonniert Änderungsmeldungen.
    pub fn subscribe(&mut self) -> Receiver<StoreChange> {
        let (tx, rx) = channel();
        self.listeners.push(tx);
        rx
    }

    fn notify(&mut self, change: StoreChange) {
        self.listeners.retain(|tx| tx.send(change.clone()).is_ok());
    }

    /// Bindet `layer` an die Entity `entity_id`.
    ///
    /// Ist die Entity bereits gebunden, bleibt die bestehende Bindung und ein
    /// abweichender `layer` wird von der Karte entfernt. Gibt `true` zurück,
    /// wenn eine neue Bindung entstanden ist.
    pub fn bind(
        &mut self,
        map: &mut dyn MapSurface,
        entity_id: Uuid,
        kind: ShapeKind,
        layer: LayerId,
    ) -> bool {
        if let Some(existing) = self.bindings.get(&entity_id) {
            if existing.layer != layer {
                log::debug!(
                    "Entity {} bereits an {} gebunden, entferne doppelten Layer {}",
                    entity_id,
                    existing.layer,
                    layer
                );
                self.unbound.shift_remove(&layer);
                map.remove_layer(layer);
            }
            return false;
        }

        self.unbound.shift_remove(&layer);
        self.bindings.insert(
            entity_id,
            LayerBinding {
                entity_id,
                kind,
                layer,
                visible: true,
            },
        );
        self.by_layer.insert(layer, entity_id);
        self.notify(StoreChange::Bound { entity_id, kind });
        true
    }

    /// Macht aus einem ungebundenen Layer eine Bindung.
    pub fn promote(
        &mut self,
        map: &mut dyn MapSurface,
        layer: LayerId,
        entity_id: Uuid,
        kind: ShapeKind,
    ) -> bool {
        if !self.unbound.contains(&layer) {
            log::warn!("Layer {} war nicht als ungebunden registriert", layer);
        }
        self.bind(map, entity_id, kind, layer)
    }

    /// Entfernt die Bindung und den Layer von der Karte.
    ///
    /// Die Entity selbst bleibt unberührt.
    pub fn unbind(&mut self, map: &mut dyn MapSurface, entity_id: Uuid) -> Option<LayerBinding> {
        let binding = self.bindings.shift_remove(&entity_id)?;
        self.by_layer.remove(&binding.layer);
        map.remove_layer(binding.layer);
        self.notify(StoreChange::Unbound {
            entity_id,
            kind: binding.kind,
        });
        Some(binding)
    }

    /// Ersetzt den Layer einer gebundenen Entity (alter Layer wird entfernt).
    ///
    /// Der Sichtbarkeitszustand wird auf den neuen Layer übertragen.
    pub fn rebind(&mut self, map: &mut dyn MapSurface, entity_id: Uuid, layer: LayerId) -> bool {
        let Some(binding) = self.bindings.get_mut(&entity_id) else {
            return false;
        };
        if binding.layer == layer {
            return false;
        }

        let old_layer = std::mem::replace(&mut binding.layer, layer);
        let visible = binding.visible;
        self.by_layer.remove(&old_layer);
        self.by_layer.insert(layer, entity_id);
        self.unbound.shift_remove(&layer);
        map.remove_layer(old_layer);
        if !visible {
            map.set_layer_shown(layer, false);
        }
        self.notify(StoreChange::Rebound { entity_id });
        true
    }

    /// Registriert einen Layer, der noch keiner Entity gehört (laufende Zeichnung).
    pub fn track_unbound(&mut self, layer: LayerId) {
        self.unbound.insert(layer);
    }

    /// Verwirft einen ungebundenen Layer (ohne Persistenz).
    pub fn discard_unbound(&mut self, map: &mut dyn MapSurface, layer: LayerId) -> bool {
        if self.unbound.shift_remove(&layer) {
            map.remove_layer(layer);
            true
        } else {
            false
        }
    }

    /// Ist der Layer als ungebunden registriert?
    pub fn is_unbound(&self, layer: LayerId) -> bool {
        self.unbound.contains(&layer)
    }

    /// Anzahl ungebundener Layer
    pub fn unbound_count(&self) -> usize {
        self.unbound.len()
    }

    /// Blendet den Layer einer Entity ein/aus. Ruft die Karte nur bei Änderung.
    pub fn set_visible(&mut self, map: &mut dyn MapSurface, entity_id: Uuid, visible: bool) -> bool {
        match self.bindings.get_mut(&entity_id) {
            Some(binding) if binding.visible != visible => {
                binding.visible = visible;
                map.set_layer_shown(binding.layer, visible);
                true
            }
            _ => false,
        }
    }

    /// Sichtbarkeit einer gebundenen Entity
    pub fn is_visible(&self, entity_id: Uuid) -> Option<bool> {
        self.bindings.get(&entity_id).map(|b| b.visible)
    }

    /// IDs aller gebundenen Entities einer Art (in Bindungsreihenfolge)
    pub fn by_kind(&self, kind: ShapeKind) -> impl Iterator<Item = Uuid> + '_ {
        self.bindings
            .values()
            .filter(move |b| b.kind == kind)
            .map(|b| b.entity_id)
    }

    /// Layer einer Entity
    pub fn layer_of(&self, entity_id: Uuid) -> Option<LayerId> {
        self.bindings.get(&entity_id).map(|b| b.layer)
    }

    /// Bindung einer Entity
    pub fn binding(&self, entity_id: Uuid) -> Option<&LayerBinding> {
        self.bindings.get(&entity_id)
    }

    /// Bindung zu einem Layer
    pub fn binding_for_layer(&self, layer: LayerId) -> Option<&LayerBinding> {
        self.by_layer
            .get(&layer)
            .and_then(|id| self.bindings.get(id))
    }

    /// Anzahl gebundener Entities
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Gibt `true` zurück, wenn nichts gebunden ist.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Entfernt alle gebundenen und ungebundenen Layer von der Karte.
    pub fn clear(&mut self, map: &mut dyn MapSurface) {
        self.clear_keeping(map, &[]);
    }

    /// Wie [`clear`](Self::clear), lässt aber die Layer in `keep` auf der Karte.
    ///
    /// Behaltene Layer bleiben als ungebunden registriert.
    pub fn clear_keeping(&mut self, map: &mut dyn MapSurface, keep: &[LayerId]) {
        for binding in self.bindings.values() {
            if !keep.contains(&binding.layer) {
                map.remove_layer(binding.layer);
            }
        }
        for layer in self.unbound.iter() {
            if !keep.contains(layer) {
                map.remove_layer(*layer);
            }
        }
        self.bindings.clear();
        self.by_layer.clear();
        self.unbound.retain(|layer| keep.contains(layer));
        for layer in keep {
            self.unbound.insert(*layer);
        }
        self.notify(StoreChange::Cleared);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{DrawKind, HeadlessMap};

    fn setup() -> (HeadlessMap, GeometryStore) {
        (HeadlessMap::new(), GeometryStore::new())
    }

    #[test]
    fn test_bind_is_idempotent_and_removes_duplicate_layer() {
        let (mut map, mut store) = setup();
        let id = Uuid::new_v4();
        let first = map.draw(DrawKind::Polyline, "{}");
        let second = map.draw(DrawKind::Polyline, "{}");

        assert!(store.bind(&mut map, id, ShapeKind::Path, first));
        assert!(!store.bind(&mut map, id, ShapeKind::Path, second));
        assert!(!store.bind(&mut map, id, ShapeKind::Path, first));

        assert_eq!(store.len(), 1);
        assert_eq!(store.layer_of(id), Some(first));
        assert_eq!(map.layer_count(), 1, "Doppelter Layer sollte entfernt sein");
    }

    #[test]
    fn test_unbind_removes_layer_from_map() {
        let (mut map, mut store) = setup();
        let id = Uuid::new_v4();
        let layer = map.draw(DrawKind::Marker, "{}");
        store.bind(&mut map, id, ShapeKind::Point, layer);

        let binding = store.unbind(&mut map, id).expect("Bindung sollte existieren");
        assert_eq!(binding.layer, layer);
        assert!(!map.has_layer(layer));
        assert!(store.binding_for_layer(layer).is_none());
        assert!(store.unbind(&mut map, id).is_none());
    }

    #[test]
    fn test_discard_unbound_only_touches_unbound_layers() {
        let (mut map, mut store) = setup();
        let drawn = map.draw(DrawKind::Polygon, "{}");
        store.track_unbound(drawn);
        assert!(store.is_unbound(drawn));
        assert!(store.discard_unbound(&mut map, drawn));
        assert!(!map.has_layer(drawn));

        let bound = map.draw(DrawKind::Polygon, "{}");
        store.bind(&mut map, Uuid::new_v4(), ShapeKind::Area, bound);
        assert!(!store.discard_unbound(&mut map, bound));
        assert!(map.has_layer(bound));
    }

    #[test]
    fn test_promote_moves_layer_from_unbound_to_bound() {
        let (mut map, mut store) = setup();
        let layer = map.draw(DrawKind::Polyline, "{}");
        let id = Uuid::new_v4();
        store.track_unbound(layer);
        assert!(store.promote(&mut map, layer, id, ShapeKind::SecurityZone));
        assert_eq!(store.unbound_count(), 0);
        assert_eq!(
            store.binding_for_layer(layer).map(|b| b.entity_id),
            Some(id)
        );
    }

    #[test]
    fn test_set_visible_keeps_binding() {
        let (mut map, mut store) = setup();
        let id = Uuid::new_v4();
        let layer = map.draw(DrawKind::Marker, "{}");
        store.bind(&mut map, id, ShapeKind::Point, layer);

        assert!(store.set_visible(&mut map, id, false));
        assert!(!store.set_visible(&mut map, id, false));
        assert_eq!(store.is_visible(id), Some(false));
        assert!(map.has_layer(layer));
        assert!(map.shown_layers().is_empty());
    }

    #[test]
    fn test_rebind_carries_visibility() {
        let (mut map, mut store) = setup();
        let id = Uuid::new_v4();
        let old = map.draw(DrawKind::Marker, "{}");
        let new = map.draw(DrawKind::Marker, "{}");
        store.bind(&mut map, id, ShapeKind::Point, old);
        store.set_visible(&mut map, id, false);

        assert!(store.rebind(&mut map, id, new));
        assert!(!map.has_layer(old));
        assert_eq!(map.layer(new).map(|l| l.shown), Some(false));
        assert_eq!(store.binding_for_layer(new).map(|b| b.entity_id), Some(id));
    }

    #[test]
    fn test_clear_keeping_retains_listed_layers() {
        let (mut map, mut store) = setup();
        let bound = map.draw(DrawKind::Marker, "{}");
        let kept = map.draw(DrawKind::Polygon, "{}");
        let dropped = map.draw(DrawKind::Polyline, "{}");
        store.bind(&mut map, Uuid::new_v4(), ShapeKind::Point, bound);
        store.track_unbound(kept);
        store.track_unbound(dropped);

        store.clear_keeping(&mut map, &[kept]);

        assert!(store.is_empty());
        assert!(map.has_layer(kept));
        assert!(store.is_unbound(kept));
        assert!(!map.has_layer(bound));
        assert!(!map.has_layer(dropped));
    }

    #[test]
    fn test_changes_are_notified() {
        let (mut map, mut store) = setup();
        let rx = store.subscribe();
        let id = Uuid::new_v4();
        let layer = map.draw(DrawKind::Polyline, "{}");

        store.bind(&mut map, id, ShapeKind::Path, layer);
        store.set_visible(&mut map, id, false);
        store.unbind(&mut map, id);
        store.clear(&mut map);

        let changes: Vec<StoreChange> = rx.try_iter().collect();
        assert_eq!(
            changes,
            vec![
                StoreChange::Bound {
                    entity_id: id,
                    kind: ShapeKind::Path
                },
                StoreChange::Unbound {
                    entity_id: id,
                    kind: ShapeKind::Path
                },
                StoreChange::Cleared,
            ]
        );
    }

    #[test]
    fn test_by_kind_filters() {
        let (mut map, mut store) = setup();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let la = map.draw(DrawKind::Polygon, "{}");
        let lb = map.draw(DrawKind::Polyline, "{}");
        store.bind(&mut map, a, ShapeKind::Area, la);
        store.bind(&mut map, b, ShapeKind::Path, lb);
        assert_eq!(store.by_kind(ShapeKind::Area).collect::<Vec<_>>(), vec![a]);
    }
}
