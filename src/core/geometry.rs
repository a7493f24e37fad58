//! GeoJSON-Hilfsfunktionen: Parsen, Entpacken von Features, Linien-Extraktion.
//!
//! Positionen werden als `DVec2 { x: Längengrad, y: Breitengrad }` geführt.

use geojson::{GeoJson, Geometry, Value};
use glam::DVec2;

/// Geometrie-Typ, wie er von der Zeichenoberfläche geliefert wird
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryType {
    /// Einzelner Marker
    Point,
    /// Offene Linie (auch MultiLineString)
    Line,
    /// Geschlossene Fläche
    Polygon,
    /// Alles andere (wird nicht verarbeitet)
    Other,
}

/// Parst GeoJSON-Text und entfernt eine eventuelle Feature-Hülle.
///
/// Gibt `None` zurück bei ungültigem Text, Features ohne Geometrie und
/// FeatureCollections.
pub fn parse_geometry(text: &str) -> Option<Geometry> {
    match text.parse::<GeoJson>().ok()? {
        GeoJson::Geometry(geometry) => Some(geometry),
        GeoJson::Feature(feature) => feature.geometry,
        GeoJson::FeatureCollection(_) => None,
    }
}

/// Ermittelt den Geometrie-Typ eines GeoJSON-Textes.
pub fn geometry_type(text: &str) -> GeometryType {
    match parse_geometry(text).map(|g| g.value) {
        Some(Value::Point(_)) => GeometryType::Point,
        Some(Value::LineString(_)) | Some(Value::MultiLineString(_)) => GeometryType::Line,
        Some(Value::Polygon(_)) => GeometryType::Polygon,
        _ => GeometryType::Other,
    }
}

/// Liefert die Koordinatenfolge einer Linie.
///
/// MultiLineStrings werden zu einer einzigen Folge zusammengehängt.
/// Positionen mit weniger als zwei Werten werden übersprungen.
pub fn line_positions(value: &Value) -> Option<Vec<DVec2>> {
    let positions = match value {
        Value::LineString(coords) => to_positions(coords),
        Value::MultiLineString(lines) => lines.iter().flat_map(|l| to_positions(l)).collect(),
        _ => return None,
    };
    Some(positions)
}

/// Parst GeoJSON-Text als Linie (LineString oder MultiLineString).
pub fn parse_line(text: &str) -> Option<Vec<DVec2>> {
    let geometry = parse_geometry(text)?;
    line_positions(&geometry.value)
}

/// Parst GeoJSON-Text als einzelnen Punkt.
pub fn parse_point(text: &str) -> Option<DVec2> {
    match parse_geometry(text)?.value {
        Value::Point(coords) if coords.len() >= 2 => Some(DVec2::new(coords[0], coords[1])),
        _ => None,
    }
}

/// Prüft, ob zwei GeoJSON-Texte dieselbe Form beschreiben.
///
/// Unterschiede in Whitespace, Feld-Reihenfolge oder Feature-Hülle zählen nicht.
pub fn same_shape(a: &str, b: &str) -> bool {
    if a == b {
        return true;
    }
    match (parse_geometry(a), parse_geometry(b)) {
        (Some(left), Some(right)) => left.value == right.value,
        _ => false,
    }
}

/// Gibt `candidate` zurück, falls sich die Form gegenüber `current` geändert hat.
///
/// Bei unveränderter Form bleibt der bisherige Text byteweise erhalten.
pub fn replace_if_changed(current: &str, candidate: &str) -> Option<String> {
    if same_shape(current, candidate) {
        None
    } else {
        Some(candidate.to_string())
    }
}

/// Serialisiert einen Punkt als GeoJSON-Geometrie.
pub fn point_geojson(position: DVec2) -> String {
    geometry_to_string(Geometry::new(Value::Point(vec![position.x, position.y])))
}

/// Serialisiert eine Koordinatenfolge als LineString.
pub fn line_geojson(positions: &[DVec2]) -> String {
    geometry_to_string(Geometry::new(Value::LineString(from_positions(positions))))
}

/// Serialisiert einen Ring als Polygon (der Ring wird bei Bedarf geschlossen).
pub fn polygon_geojson(ring: &[DVec2]) -> String {
    let mut coords = from_positions(ring);
    let closed = coords.first() == coords.last();
    if !closed {
        if let Some(first) = coords.first().cloned() {
            coords.push(first);
        }
    }
    geometry_to_string(Geometry::new(Value::Polygon(vec![coords])))
}

fn geometry_to_string(geometry: Geometry) -> String {
    serde_json::to_string(&geometry).unwrap_or_default()
}

fn to_positions(coords: &[Vec<f64>]) -> Vec<DVec2> {
    coords
        .iter()
        .filter(|c| c.len() >= 2)
        .map(|c| DVec2::new(c[0], c[1]))
        .collect()
}

fn from_positions(positions: &[DVec2]) -> Vec<Vec<f64>> {
    positions.iter().map(|p| vec![p.x, p.y]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_envelope_is_unwrapped() {
        let text = r#"{"type":"Feature","properties":{},"geometry":{"type":"LineString","coordinates":[[2.0,48.0],[2.001,48.0]]}}"#;
        let line = parse_line(text).expect("Feature sollte als Linie lesbar sein");
        assert_eq!(line.len(), 2);
        assert_eq!(geometry_type(text), GeometryType::Line);
    }

    #[test]
    fn test_multilinestring_is_flattened() {
        let text = r#"{"type":"MultiLineString","coordinates":[[[0,0],[1,0]],[[2,0],[3,0]]]}"#;
        let line = parse_line(text).expect("MultiLineString sollte lesbar sein");
        assert_eq!(line.len(), 4);
        assert_eq!(line[2], DVec2::new(2.0, 0.0));
    }

    #[test]
    fn test_polygon_is_not_a_line() {
        let text = polygon_geojson(&[
            DVec2::new(0.0, 0.0),
            DVec2::new(1.0, 0.0),
            DVec2::new(1.0, 1.0),
        ]);
        assert!(parse_line(&text).is_none());
        assert_eq!(geometry_type(&text), GeometryType::Polygon);
    }

    #[test]
    fn test_polygon_ring_is_closed() {
        let text = polygon_geojson(&[
            DVec2::new(0.0, 0.0),
            DVec2::new(1.0, 0.0),
            DVec2::new(1.0, 1.0),
        ]);
        let geometry = parse_geometry(&text).expect("Polygon sollte parsebar sein");
        match geometry.value {
            Value::Polygon(rings) => assert_eq!(rings[0].first(), rings[0].last()),
            other => panic!("Polygon erwartet, erhalten: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_text_is_other() {
        assert_eq!(geometry_type("kein json"), GeometryType::Other);
        assert!(parse_geometry(r#"{"type":"FeatureCollection","features":[]}"#).is_none());
    }

    #[test]
    fn test_replace_if_changed_keeps_text_for_equal_shape() {
        let original = r#"{"type": "LineString", "coordinates": [[1.0, 2.0], [3.0, 4.0]]}"#;
        let reserialized = line_geojson(&[DVec2::new(1.0, 2.0), DVec2::new(3.0, 4.0)]);
        assert_ne!(original, reserialized);
        assert!(replace_if_changed(original, &reserialized).is_none());

        let moved = line_geojson(&[DVec2::new(1.0, 2.0), DVec2::new(3.5, 4.0)]);
        assert_eq!(replace_if_changed(original, &moved), Some(moved.clone()));
    }

    #[test]
    fn test_point_roundtrip() {
        let text = point_geojson(DVec2::new(2.35, 48.85));
        assert_eq!(parse_point(&text), Some(DVec2::new(2.35, 48.85)));
    }
}
