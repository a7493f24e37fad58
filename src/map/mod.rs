//! Schnittstelle zur externen Karten-Bibliothek.
//!
//! Die Engine zeichnet nicht selbst: sie steuert eine `MapSurface`, die Layer
//! anlegt, entfernt, ein-/ausblendet und Zeichen-Handler aktiviert. Die
//! Benachrichtigungen der Karte (Form gezeichnet, bearbeitet, gelöscht)
//! kommen als `AppIntent`s zurück.

mod headless;

pub use headless::{HeadlessLayer, HeadlessMap};

use serde::{Deserialize, Serialize};

/// Identifiziert einen visuellen Layer auf der Karte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LayerId(pub u64);

impl std::fmt::Display for LayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "L{}", self.0)
    }
}

/// Art der gezeichneten Form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawKind {
    /// Einzelner Marker
    Marker,
    /// Offene Linie
    Polyline,
    /// Geschlossene Fläche
    Polygon,
}

/// Darstellung eines Layers
#[derive(Debug, Clone, PartialEq)]
pub struct LayerStyle {
    /// Farbe als `#rrggbb`
    pub color: String,
    /// Linienstärke
    pub weight: f32,
}

impl LayerStyle {
    /// Erstellt einen Stil
    pub fn new(color: impl Into<String>, weight: f32) -> Self {
        Self {
            color: color.into(),
            weight,
        }
    }
}

/// Beschreibung eines neu anzulegenden Layers
#[derive(Debug, Clone, PartialEq)]
pub struct LayerSpec {
    /// Art der Form
    pub kind: DrawKind,
    /// Geometrie als GeoJSON-Text
    pub geojson: String,
    /// Darstellung
    pub style: LayerStyle,
}

/// Fähigkeiten der Karten-Bibliothek, die die Engine benötigt.
pub trait MapSurface {
    /// Legt einen Layer an und zeigt ihn an
    fn add_layer(&mut self, spec: LayerSpec) -> LayerId;
    /// Entfernt einen Layer (unbekannte IDs werden ignoriert)
    fn remove_layer(&mut self, layer: LayerId);
    /// Existiert der Layer noch?
    fn has_layer(&self, layer: LayerId) -> bool;
    /// Aktuelle Geometrie des Layers als GeoJSON-Text
    fn layer_geojson(&self, layer: LayerId) -> Option<String>;
    /// Aktueller Stil des Layers
    fn layer_style(&self, layer: LayerId) -> Option<LayerStyle>;
    /// Setzt den Stil des Layers
    fn set_layer_style(&mut self, layer: LayerId, style: LayerStyle);
    /// Blendet den Layer ein oder aus, ohne ihn zu entfernen
    fn set_layer_shown(&mut self, layer: LayerId, shown: bool);
    /// Aktiviert/deaktiviert die Vertex-Bearbeitung des Layers
    fn set_vertex_editing(&mut self, layer: LayerId, enabled: bool);
    /// Aktiviert den Zeichen-Handler für eine Form-Art
    fn start_draw(&mut self, kind: DrawKind);
    /// Deaktiviert den aktiven Zeichen-Handler
    fn stop_draw(&mut self);
    /// Aktiviert/deaktiviert die Standard-Werkzeugleiste
    fn set_standard_toolbar(&mut self, enabled: bool);
}
