//! Geodätische Längen und Mengen-Ableitung für Sicherheitszonen.

use glam::DVec2;

use super::geometry;

/// Erdradius in Metern (Haversine)
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Ab diesem Nachkommaanteil wird die Stückzahl aufgerundet
pub const ROUND_UP_FRACTION: f64 = 0.20;

/// Großkreis-Distanz zweier Positionen `[lon, lat]` in Metern.
pub fn haversine_distance(a: DVec2, b: DVec2) -> f64 {
    let lat1 = a.y.to_radians();
    let lat2 = b.y.to_radians();
    let d_lat = (b.y - a.y).to_radians();
    let d_lon = (b.x - a.x).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_M * c
}

/// Summe der Teilstrecken einer Koordinatenfolge.
pub fn polyline_length(positions: &[DVec2]) -> f64 {
    positions
        .windows(2)
        .map(|pair| haversine_distance(pair[0], pair[1]))
        .sum()
}

/// Länge einer Linien-Geometrie in Metern.
///
/// Akzeptiert LineString und MultiLineString, optional in einer Feature-Hülle.
/// Alles andere (Polygon, Punkt, ungültiger Text) ergibt 0.
pub fn length(geojson: &str) -> f64 {
    geometry::parse_line(geojson)
        .map(|positions| polyline_length(&positions))
        .unwrap_or(0.0)
}

/// Benötigte Stückzahl eines Equipments für eine Linie der Länge `length_m`.
///
/// Ergebnis ist immer mindestens 1. Fehlt die Einheitslänge (oder ist sie
/// nicht positiv) oder ist die Länge nicht positiv, wird 1 zurückgegeben.
pub fn quantity(length_m: f64, unit_length: Option<f64>) -> u32 {
    let unit = match unit_length {
        Some(unit) if unit > 0.0 && unit.is_finite() => unit,
        _ => return 1,
    };
    if length_m <= 0.0 || !length_m.is_finite() {
        return 1;
    }

    let raw = length_m / unit;
    let fraction = raw - raw.floor();
    let rounded = if fraction >= ROUND_UP_FRACTION {
        raw.ceil()
    } else {
        raw.floor()
    };
    (rounded as u32).max(1)
}

/// Anzeige-Text einer Länge: Meter mit einer Nachkommastelle, ab 1 km in Kilometern.
pub fn format_length(meters: f64) -> String {
    if meters >= 1000.0 {
        format!("{:.2} km", meters / 1000.0)
    } else {
        format!("{meters:.1} m")
    }
}
