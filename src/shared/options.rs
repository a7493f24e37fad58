//! Zentrale Konfiguration der Karten-Engine.
//!
//! `PlannerOptions` enthält alle zur Laufzeit änderbaren Werte.
//! Die `const`-Werte bleiben als Fallback/Default erhalten.

use std::time::Duration;

use serde::{Deserialize, Serialize};

// ── Aktualisierung ──────────────────────────────────────────────────

/// Intervall der periodischen Punkt-Aktualisierung in Sekunden.
pub const REFRESH_INTERVAL_SECS: u64 = 30;

// ── Farben ──────────────────────────────────────────────────────────

/// Farbe von Wegen und Event-Tracés.
pub const LINE_COLOR: &str = "#a91a1a";
/// Farbe von Flächen und Event-Zonen.
pub const ZONE_COLOR: &str = "#3388ff";
/// Farbe von Sicherheitszonen.
pub const SECURITY_ZONE_COLOR: &str = "#ff7800";
/// Farbe der Punkt-Marker.
pub const POINT_COLOR: &str = "#2a81cb";

// ── Linienstärken ──────────────────────────────────────────────────

/// Linienstärke von Wegen und Sicherheitszonen.
pub const LINE_WEIGHT: f32 = 4.0;
/// Randstärke von Flächen.
pub const ZONE_WEIGHT: f32 = 3.0;
/// Linienstärke eines hervorgehobenen (angeklickten) Layers.
pub const HIGHLIGHT_WEIGHT: f32 = 6.0;

// ── Geschwindigkeiten ──────────────────────────────────────────────

/// Geschätzte Höchstgeschwindigkeit neuer Wege (km/h).
pub const FASTEST_ESTIMATED_SPEED: f64 = 5.0;
/// Geschätzte Mindestgeschwindigkeit neuer Wege (km/h).
pub const SLOWEST_ESTIMATED_SPEED: f64 = 3.0;

// ── Laufzeit-Optionen (serialisierbar) ─────────────────────────────

/// Alle zur Laufzeit änderbaren Optionen.
/// Wird als `event_planner_map.toml` neben der Binary gespeichert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerOptions {
    /// Intervall der Punkt-Aktualisierung in Sekunden
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,

    // ── Farben ──────────────────────────────────────────────────
    /// Farbe von Wegen
    pub line_color: String,
    /// Farbe von Flächen
    pub zone_color: String,
    /// Farbe von Sicherheitszonen
    pub security_zone_color: String,
    /// Farbe der Punkt-Marker
    #[serde(default = "default_point_color")]
    pub point_color: String,

    // ── Linienstärken ───────────────────────────────────────────
    /// Linienstärke von Wegen und Sicherheitszonen
    pub line_weight: f32,
    /// Randstärke von Flächen
    pub zone_weight: f32,
    /// Linienstärke hervorgehobener Layer
    pub highlight_weight: f32,

    // ── Wege ────────────────────────────────────────────────────
    /// Geschätzte Höchstgeschwindigkeit neuer Wege
    #[serde(default = "default_fastest_speed")]
    pub fastest_estimated_speed: f64,
    /// Geschätzte Mindestgeschwindigkeit neuer Wege
    #[serde(default = "default_slowest_speed")]
    pub slowest_estimated_speed: f64,
}

impl Default for PlannerOptions {
    fn default() -> Self {
        Self {
            refresh_interval_secs: REFRESH_INTERVAL_SECS,

            line_color: LINE_COLOR.to_string(),
            zone_color: ZONE_COLOR.to_string(),
            security_zone_color: SECURITY_ZONE_COLOR.to_string(),
            point_color: POINT_COLOR.to_string(),

            line_weight: LINE_WEIGHT,
            zone_weight: ZONE_WEIGHT,
            highlight_weight: HIGHLIGHT_WEIGHT,

            fastest_estimated_speed: FASTEST_ESTIMATED_SPEED,
            slowest_estimated_speed: SLOWEST_ESTIMATED_SPEED,
        }
    }
}

fn default_refresh_interval_secs() -> u64 {
    REFRESH_INTERVAL_SECS
}

fn default_point_color() -> String {
    POINT_COLOR.to_string()
}

fn default_fastest_speed() -> f64 {
    FASTEST_ESTIMATED_SPEED
}

fn default_slowest_speed() -> f64 {
    SLOWEST_ESTIMATED_SPEED
}

impl PlannerOptions {
    /// Lädt Optionen aus einer TOML-Datei. Bei Fehler: Standardwerte.
    pub fn load_from_file(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(opts) => {
                    log::info!("Optionen geladen aus: {}", path.display());
                    opts
                }
                Err(e) => {
                    log::warn!("Optionen-Datei fehlerhaft, verwende Standardwerte: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Keine Optionen-Datei gefunden, verwende Standardwerte");
                Self::default()
            }
        }
    }

    /// Speichert Optionen als TOML-Datei.
    pub fn save_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("Optionen gespeichert nach: {}", path.display());
        Ok(())
    }

    /// Ermittelt den Pfad zur Optionen-Datei neben der Binary.
    pub fn config_path() -> std::path::PathBuf {
        std::env::current_exe()
            .unwrap_or_else(|_| std::path::PathBuf::from("planner-replay"))
            .parent()
            .unwrap_or_else(|| std::path::Path::new("."))
            .join("event_planner_map.toml")
    }

    /// Intervall der Punkt-Aktualisierung
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    /// Geschwindigkeiten neuer Wege als `(schnellste, langsamste)`
    pub fn path_speeds(&self) -> (f64, f64) {
        (self.fastest_estimated_speed, self.slowest_estimated_speed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_uses_defaults_for_missing_fields() {
        let content = r##"
line_color = "#000000"
zone_color = "#111111"
security_zone_color = "#222222"
line_weight = 2.0
zone_weight = 1.0
highlight_weight = 5.0
"##;
        let opts: PlannerOptions = toml::from_str(content).expect("TOML sollte parsebar sein");
        assert_eq!(opts.line_color, "#000000");
        assert_eq!(opts.refresh_interval_secs, REFRESH_INTERVAL_SECS);
        assert_eq!(opts.point_color, POINT_COLOR);
        assert_eq!(opts.path_speeds(), (5.0, 3.0));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let path = std::env::temp_dir().join(format!(
            "event_planner_map_test_{}.toml",
            uuid::Uuid::new_v4()
        ));
        let opts = PlannerOptions {
            refresh_interval_secs: 5,
            ..PlannerOptions::default()
        };
        opts.save_to_file(&path).expect("Speichern sollte funktionieren");
        let loaded = PlannerOptions::load_from_file(&path);
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, opts);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let loaded = PlannerOptions::load_from_file(std::path::Path::new(
            "/nonexistent/event_planner_map.toml",
        ));
        assert_eq!(loaded, PlannerOptions::default());
    }
}
