//! Gemeinsame Test-Umgebung: Headless-Karte, In-Memory-Backend und Controller.

#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use glam::DVec2;
use uuid::Uuid;

use event_planner_map::backend;
use event_planner_map::core::geometry;
use event_planner_map::core::metrics::EARTH_RADIUS_M;
use event_planner_map::{
    AppController, AppIntent, AppState, DrawKind, Equipment, Event, HeadlessMap, LayerId,
    MemoryBackend, Picture, Point,
};

/// Längengrad-Differenz für `meters` entlang des Äquators
pub fn equator_delta(meters: f64) -> f64 {
    (meters / EARTH_RADIUS_M).to_degrees()
}

/// Linie der Länge `meters` auf dem Äquator
pub fn equator_line(meters: f64) -> String {
    geometry::line_geojson(&[DVec2::new(0.0, 0.0), DVec2::new(equator_delta(meters), 0.0)])
}

/// Kleines Quadrat um `origin`
pub fn square(origin: DVec2, size: f64) -> String {
    geometry::polygon_geojson(&[
        origin,
        origin + DVec2::new(size, 0.0),
        origin + DVec2::new(size, size),
        origin + DVec2::new(0.0, size),
    ])
}

/// Event mit Auf- und Abbau-Datum
pub fn make_event(title: &str) -> Event {
    Event::new(
        title,
        Some(Utc.with_ymd_and_hms(2026, 6, 20, 8, 0, 0).unwrap()),
        Some(Utc.with_ymd_and_hms(2026, 6, 21, 20, 0, 0).unwrap()),
    )
}

/// Equipment mit Einheitslänge
pub fn make_equipment(kind: &str, length: Option<f64>) -> Equipment {
    Equipment {
        id: Uuid::new_v4(),
        kind: Some(kind.to_string()),
        description: None,
        length,
    }
}

/// Komplette Umgebung eines Tests
pub struct Harness {
    pub controller: AppController,
    pub state: AppState,
    pub map: HeadlessMap,
    pub backend: MemoryBackend,
}

impl Harness {
    /// Leere Umgebung (Stammdaten noch nicht geladen)
    pub fn new() -> Self {
        let map = HeadlessMap::new();
        Self {
            controller: AppController::new(),
            state: AppState::new(Box::new(map.clone())),
            map,
            backend: MemoryBackend::new(),
        }
    }

    /// Verarbeitet einen Intent, ohne das Backend anzustoßen.
    pub fn send(&mut self, intent: AppIntent) {
        self.controller
            .handle_intent(&mut self.state, intent)
            .expect("Intent sollte ohne Fehler verarbeitet werden");
    }

    /// Liefert alle offenen Anfragen aus, bis die Outbox leer ist.
    pub fn pump(&mut self) -> usize {
        backend::pump(&mut self.controller, &mut self.state, &mut self.backend)
            .expect("Outbox sollte sich leeren")
    }

    /// Führt nur die aktuell eingereihten Anfragen aus.
    pub fn pump_once(&mut self) -> usize {
        backend::pump_once(&mut self.controller, &mut self.state, &mut self.backend)
            .expect("Antworten sollten verarbeitet werden")
    }

    /// Intent senden und danach pumpen
    pub fn act(&mut self, intent: AppIntent) {
        self.send(intent);
        self.pump();
    }

    /// Lädt die Stammdaten und wählt ein Event aus.
    pub fn startup_and_select(&mut self, event_id: Uuid) {
        self.act(AppIntent::StartupRequested);
        self.act(AppIntent::EventSelected {
            event_id: Some(event_id),
        });
    }

    /// Zeichnet eine Form auf der Karte und meldet sie der Engine.
    pub fn draw(&mut self, kind: DrawKind, geojson: impl Into<String>) -> LayerId {
        let layer = self.map.draw(kind, geojson);
        self.act(AppIntent::ShapeDrawn { layer, kind });
        layer
    }

    /// Layer einer gebundenen Entity
    pub fn layer_of(&self, entity_id: Uuid) -> LayerId {
        self.state
            .geometry
            .layer_of(entity_id)
            .expect("Entity sollte an einen Layer gebunden sein")
    }

    /// Ist der Layer der Entity eingeblendet?
    pub fn is_shown(&self, entity_id: Uuid) -> bool {
        self.map
            .layer(self.layer_of(entity_id))
            .expect("Layer sollte auf der Karte liegen")
            .shown
    }
}

/// Bestand für die Sicherheitszonen-Szenarien
pub struct ZoneFixture {
    pub harness: Harness,
    pub event: Event,
    /// Zweites, leeres Event für Wechsel-Szenarien
    pub other_event: Event,
    pub equipment: Equipment,
    pub point: Point,
    pub picture: Picture,
}

/// Event mit einem Punkt (Kommentar "Gate 3"), einem Foto und 10-m-Equipment
pub fn zone_fixture() -> ZoneFixture {
    let mut harness = Harness::new();
    let event = make_event("Stadtlauf");
    let other_event = make_event("Nachtlauf");
    let equipment = make_equipment("Barrière", Some(10.0));

    let mut point = Point::new(event.id, DVec2::new(0.0, 0.0), false, 1);
    point.comment = Some("Gate 3".to_string());
    point.equipment_id = Some(equipment.id);

    let picture = Picture {
        id: Uuid::new_v4(),
        point_id: Some(point.id),
        security_zone_id: None,
        picture_data: "iVBORw0KGgo=".to_string(),
    };

    harness.backend = MemoryBackend::from_seed(event_planner_map::MemorySeed {
        events: vec![event.clone(), other_event.clone()],
        equipment: vec![equipment.clone()],
        points: vec![point.clone()],
        pictures: vec![picture.clone()],
        ..Default::default()
    });
    harness.startup_and_select(event.id);

    ZoneFixture {
        harness,
        event,
        other_event,
        equipment,
        point,
        picture,
    }
}
