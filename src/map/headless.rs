//! In-Memory-Karte ohne Darstellung (Tests und Replay-Host).

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;

use super::{DrawKind, LayerId, LayerSpec, LayerStyle, MapSurface};

/// Zustand eines Layers der Headless-Karte
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessLayer {
    /// Art der Form
    pub kind: DrawKind,
    /// Aktuelle Geometrie
    pub geojson: String,
    /// Aktueller Stil
    pub style: LayerStyle,
    /// Eingeblendet?
    pub shown: bool,
    /// Vertex-Bearbeitung aktiv?
    pub vertex_editing: bool,
}

#[derive(Debug, Default)]
struct HeadlessState {
    layers: IndexMap<LayerId, HeadlessLayer>,
    next_id: u64,
    active_draw: Option<DrawKind>,
    toolbar_enabled: bool,
}

impl HeadlessState {
    fn insert(&mut self, layer: HeadlessLayer) -> LayerId {
        self.next_id += 1;
        let id = LayerId(self.next_id);
        self.layers.insert(id, layer);
        id
    }
}

/// Karte ohne Darstellung.
///
/// Klone teilen sich denselben Zustand: der Host übergibt einen Klon an die
/// Engine und simuliert mit dem anderen Benutzeraktionen.
#[derive(Debug, Clone, Default)]
pub struct HeadlessMap {
    state: Rc<RefCell<HeadlessState>>,
}

impl HeadlessMap {
    /// Erstellt eine leere Karte
    pub fn new() -> Self {
        Self::default()
    }

    /// Simuliert eine vom Benutzer gezeichnete Form.
    ///
    /// Der Layer entsteht wie in der echten Bibliothek vor der Benachrichtigung
    /// der Engine.
    pub fn draw(&self, kind: DrawKind, geojson: impl Into<String>) -> LayerId {
        self.state.borrow_mut().insert(HeadlessLayer {
            kind,
            geojson: geojson.into(),
            style: LayerStyle::new("#3388ff", 4.0),
            shown: true,
            vertex_editing: false,
        })
    }

    /// Simuliert eine Vertex-Bearbeitung durch den Benutzer
    pub fn edit(&self, layer: LayerId, geojson: impl Into<String>) -> bool {
        match self.state.borrow_mut().layers.get_mut(&layer) {
            Some(entry) => {
                entry.geojson = geojson.into();
                true
            }
            None => false,
        }
    }

    /// Momentaufnahme eines Layers
    pub fn layer(&self, layer: LayerId) -> Option<HeadlessLayer> {
        self.state.borrow().layers.get(&layer).cloned()
    }

    /// Anzahl aller Layer auf der Karte
    pub fn layer_count(&self) -> usize {
        self.state.borrow().layers.len()
    }

    /// IDs aller eingeblendeten Layer
    pub fn shown_layers(&self) -> Vec<LayerId> {
        self.state
            .borrow()
            .layers
            .iter()
            .filter(|(_, l)| l.shown)
            .map(|(id, _)| *id)
            .collect()
    }

    /// Aktiver Zeichen-Handler
    pub fn active_draw(&self) -> Option<DrawKind> {
        self.state.borrow().active_draw
    }

    /// Ist die Standard-Werkzeugleiste aktiv?
    pub fn toolbar_enabled(&self) -> bool {
        self.state.borrow().toolbar_enabled
    }
}

impl MapSurface for HeadlessMap {
    fn add_layer(&mut self, spec: LayerSpec) -> LayerId {
        self.state.borrow_mut().insert(HeadlessLayer {
            kind: spec.kind,
            geojson: spec.geojson,
            style: spec.style,
            shown: true,
            vertex_editing: false,
        })
    }

    fn remove_layer(&mut self, layer: LayerId) {
        self.state.borrow_mut().layers.shift_remove(&layer);
    }

    fn has_layer(&self, layer: LayerId) -> bool {
        self.state.borrow().layers.contains_key(&layer)
    }

    fn layer_geojson(&self, layer: LayerId) -> Option<String> {
        self.state
            .borrow()
            .layers
            .get(&layer)
            .map(|l| l.geojson.clone())
    }

    fn layer_style(&self, layer: LayerId) -> Option<LayerStyle> {
        self.state.borrow().layers.get(&layer).map(|l| l.style.clone())
    }

    fn set_layer_style(&mut self, layer: LayerId, style: LayerStyle) {
        if let Some(entry) = self.state.borrow_mut().layers.get_mut(&layer) {
            entry.style = style;
        }
    }

    fn set_layer_shown(&mut self, layer: LayerId, shown: bool) {
        if let Some(entry) = self.state.borrow_mut().layers.get_mut(&layer) {
            entry.shown = shown;
        }
    }

    fn set_vertex_editing(&mut self, layer: LayerId, enabled: bool) {
        if let Some(entry) = self.state.borrow_mut().layers.get_mut(&layer) {
            entry.vertex_editing = enabled;
        }
    }

    fn start_draw(&mut self, kind: DrawKind) {
        self.state.borrow_mut().active_draw = Some(kind);
    }

    fn stop_draw(&mut self) {
        self.state.borrow_mut().active_draw = None;
    }

    fn set_standard_toolbar(&mut self, enabled: bool) {
        self.state.borrow_mut().toolbar_enabled = enabled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_state() {
        let map = HeadlessMap::new();
        let mut engine_side = map.clone();
        let layer = map.draw(DrawKind::Polyline, "{}");
        assert!(engine_side.has_layer(layer));
        engine_side.set_layer_shown(layer, false);
        assert!(map.shown_layers().is_empty());
        engine_side.remove_layer(layer);
        assert_eq!(map.layer_count(), 0);
    }

    #[test]
    fn test_layer_ids_are_unique() {
        let mut map = HeadlessMap::new();
        let a = map.draw(DrawKind::Marker, "{}");
        map.remove_layer(a);
        let b = map.add_layer(LayerSpec {
            kind: DrawKind::Polygon,
            geojson: "{}".into(),
            style: LayerStyle::new("#000000", 1.0),
        });
        assert_ne!(a, b);
    }
}
