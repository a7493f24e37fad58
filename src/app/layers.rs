//! Darstellung der Entities als Karten-Layer (Form, Farbe, Linienstärke).

use uuid::Uuid;

use super::catalog::EventCatalog;
use super::geometry_store::ShapeKind;
use crate::core::geometry::point_geojson;
use crate::core::{Area, Point, RoutePath, SecurityZone};
use crate::map::{DrawKind, LayerSpec, LayerStyle};
use crate::shared::PlannerOptions;

/// Basis-Stil einer Form-Art.
///
/// Flächen und Wege tragen ihre eigene Farbe; Punkte und Sicherheitszonen
/// nutzen die festen Farben aus den Optionen.
pub fn base_style(options: &PlannerOptions, kind: ShapeKind, color: Option<&str>) -> LayerStyle {
    match kind {
        ShapeKind::Point => LayerStyle::new(options.point_color.as_str(), options.line_weight),
        ShapeKind::Area => LayerStyle::new(
            color.unwrap_or(options.zone_color.as_str()),
            options.zone_weight,
        ),
        ShapeKind::Path => LayerStyle::new(
            color.unwrap_or(options.line_color.as_str()),
            options.line_weight,
        ),
        ShapeKind::SecurityZone => {
            LayerStyle::new(options.security_zone_color.as_str(), options.line_weight)
        }
    }
}

/// Hervorgehobener Stil (gleiche Farbe, stärkere Linie)
pub fn highlight_style(options: &PlannerOptions, base: LayerStyle) -> LayerStyle {
    LayerStyle {
        weight: options.highlight_weight,
        ..base
    }
}

/// Layer eines Punkts
pub fn point_layer(options: &PlannerOptions, point: &Point) -> LayerSpec {
    LayerSpec {
        kind: DrawKind::Marker,
        geojson: point_geojson(point.position()),
        style: base_style(options, ShapeKind::Point, None),
    }
}

/// Layer einer Fläche
pub fn area_layer(options: &PlannerOptions, area: &Area) -> LayerSpec {
    LayerSpec {
        kind: DrawKind::Polygon,
        geojson: area.geo_json.clone(),
        style: base_style(options, ShapeKind::Area, Some(&area.color_hex)),
    }
}

/// Layer eines Wegs
pub fn path_layer(options: &PlannerOptions, path: &RoutePath) -> LayerSpec {
    LayerSpec {
        kind: DrawKind::Polyline,
        geojson: path.geo_json.clone(),
        style: base_style(options, ShapeKind::Path, Some(&path.color_hex)),
    }
}

/// Layer einer Sicherheitszone
pub fn zone_layer(options: &PlannerOptions, zone: &SecurityZone) -> LayerSpec {
    LayerSpec {
        kind: DrawKind::Polyline,
        geojson: zone.geo_json.clone(),
        style: base_style(options, ShapeKind::SecurityZone, None),
    }
}

/// Layer einer Entity aus dem Katalog (None, wenn sie dort fehlt)
pub fn entity_layer(
    options: &PlannerOptions,
    catalog: &EventCatalog,
    kind: ShapeKind,
    id: Uuid,
) -> Option<LayerSpec> {
    match kind {
        ShapeKind::Point => catalog.point(id).map(|p| point_layer(options, p)),
        ShapeKind::Area => catalog.area(id).map(|a| area_layer(options, a)),
        ShapeKind::Path => catalog.path(id).map(|p| path_layer(options, p)),
        ShapeKind::SecurityZone => catalog.zone(id).map(|z| zone_layer(options, z)),
    }
}

/// Basis-Stil einer Entity aus dem Katalog
pub fn entity_style(
    options: &PlannerOptions,
    catalog: &EventCatalog,
    kind: ShapeKind,
    id: Uuid,
) -> LayerStyle {
    let color = match kind {
        ShapeKind::Area => catalog.area(id).map(|a| a.color_hex.as_str()),
        ShapeKind::Path => catalog.path(id).map(|p| p.color_hex.as_str()),
        ShapeKind::Point | ShapeKind::SecurityZone => None,
    };
    base_style(options, kind, color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Event;
    use glam::DVec2;

    #[test]
    fn test_styles_per_kind() {
        let options = PlannerOptions::default();
        let zone = base_style(&options, ShapeKind::SecurityZone, Some("#000000"));
        assert_eq!(zone.color, "#ff7800");
        assert_eq!(zone.weight, 4.0);

        let area = base_style(&options, ShapeKind::Area, Some("#123456"));
        assert_eq!(area.color, "#123456");
        assert_eq!(area.weight, 3.0);

        let point = base_style(&options, ShapeKind::Point, None);
        assert_eq!(point.color, "#2a81cb");

        let highlighted = highlight_style(&options, area);
        assert_eq!(highlighted.color, "#123456");
        assert_eq!(highlighted.weight, 6.0);
    }

    #[test]
    fn test_entity_layer_uses_catalog() {
        let options = PlannerOptions::default();
        let event = Event::new("Lauf", None, None);
        let mut catalog = EventCatalog::for_event(event.clone());
        let point = Point::new(event.id, DVec2::new(2.35, 48.85), false, 1);
        catalog.upsert_point(point.clone());

        let spec = entity_layer(&options, &catalog, ShapeKind::Point, point.id)
            .expect("Punkt sollte im Katalog sein");
        assert_eq!(spec.kind, DrawKind::Marker);
        assert!(spec.geojson.contains("Point"));
        assert!(entity_layer(&options, &catalog, ShapeKind::Area, point.id).is_none());
    }
}
