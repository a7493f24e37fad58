//! Namenskonventionen für Flächen und Wege.
//!
//! Die Rolle einer Fläche bzw. eines Weges ergibt sich ausschließlich aus dem Namen.

use chrono::{DateTime, TimeZone};

/// Präfix der Event-Zone (`Zone - <Titel>`)
pub const EVENT_ZONE_PREFIX: &str = "Zone - ";
/// Präfix des Event-Tracés (`Tracé - <Titel>`)
pub const EVENT_TRACE_PREFIX: &str = "Tracé - ";
/// Präfix frei gezeichneter Flächen (`Zone <Zeitstempel>`)
pub const FREE_AREA_PREFIX: &str = "Zone ";
/// Präfix automatisch benannter Equipment-Linien (`Chemin <Zeitstempel>`)
pub const EQUIPMENT_PATH_PREFIX: &str = "Chemin ";

const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Name der Event-Zone
pub fn event_zone_name(title: &str) -> String {
    format!("{EVENT_ZONE_PREFIX}{title}")
}

/// Name des Event-Tracés
pub fn event_trace_name(title: &str) -> String {
    format!("{EVENT_TRACE_PREFIX}{title}")
}

/// Name einer frei gezeichneten Fläche
pub fn free_area_name<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("{FREE_AREA_PREFIX}{}", now.format(TIMESTAMP_FORMAT))
}

/// Name einer Equipment-Linie
pub fn equipment_path_name<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("{EQUIPMENT_PATH_PREFIX}{}", now.format(TIMESTAMP_FORMAT))
}

/// Gehört die Fläche zum Event selbst?
pub fn is_event_owned_area(name: Option<&str>) -> bool {
    name.is_some_and(|n| n.starts_with(EVENT_ZONE_PREFIX))
}

/// Ist der Weg das Tracé des Events?
pub fn is_event_trace(name: Option<&str>) -> bool {
    name.is_some_and(|n| n.starts_with(EVENT_TRACE_PREFIX))
}

/// Ist der Weg eine automatisch benannte Equipment-Linie?
pub fn is_equipment_path(name: Option<&str>) -> bool {
    name.is_some_and(|n| n.starts_with(EQUIPMENT_PATH_PREFIX))
}

/// Ist der Weg ein benannter Weg (nicht leer, keine Equipment-Linie)?
pub fn is_named_path(name: Option<&str>) -> bool {
    name.is_some_and(|n| !n.trim().is_empty()) && !is_equipment_path(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_event_names_are_classified() {
        let zone = event_zone_name("Marathon");
        let trace = event_trace_name("Marathon");
        assert_eq!(zone, "Zone - Marathon");
        assert_eq!(trace, "Tracé - Marathon");
        assert!(is_event_owned_area(Some(&zone)));
        assert!(is_event_trace(Some(&trace)));
        assert!(is_named_path(Some(&trace)));
    }

    #[test]
    fn test_generated_names_use_prefixes() {
        let now = Utc::now();
        let area = free_area_name(&now);
        let path = equipment_path_name(&now);
        assert!(area.starts_with(FREE_AREA_PREFIX));
        assert!(!is_event_owned_area(Some(&area)));
        assert!(is_equipment_path(Some(&path)));
        assert!(!is_named_path(Some(&path)));
    }

    #[test]
    fn test_missing_names() {
        assert!(!is_event_owned_area(None));
        assert!(!is_named_path(Some("   ")));
        assert!(!is_equipment_path(None));
    }
}
