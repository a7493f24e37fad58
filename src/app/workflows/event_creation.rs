//! Ablauf "Event anlegen": Zone (Polygon) und Tracé (Linie) zeichnen,
//! bestätigen und als Fläche + Weg speichern.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::app::error::WorkflowError;
use crate::app::mode::ModeKind;
use crate::core::{geometry, naming, Area, Event, GeometryType, RoutePath};
use crate::map::{LayerId, MapSurface};
use crate::shared::PlannerOptions;

/// Schritt des Ablaufs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EventCreationStep {
    /// Polygon der Event-Zone wird gezeichnet (oder bearbeitet)
    DrawingZone,
    /// Linie des Tracés wird gezeichnet (oder bearbeitet)
    DrawingPath,
    /// Beide Formen vorhanden, wartet auf Bestätigung
    Confirm,
    /// Fläche und Weg gespeichert
    Committed,
}

/// Welche Form nachträglich bearbeitet wird
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifyTarget {
    /// Event-Zone
    Zone,
    /// Tracé
    Path,
}

/// Gezeichnete Form mit zwischengespeicherter Geometrie
#[derive(Debug, Clone, PartialEq)]
pub struct CachedShape {
    /// Ungebundener Layer
    pub layer: LayerId,
    /// Geometrie beim Abschluss des Zeichnens bzw. der letzten Bearbeitung
    pub geojson: String,
}

/// Zu speichernde Entwürfe eines Commit-Versuchs
#[derive(Debug, Clone, Default)]
pub struct CommitDrafts {
    /// Fläche (None = bereits gespeichert)
    pub area: Option<Area>,
    /// Weg (None = bereits gespeichert)
    pub path: Option<RoutePath>,
}

/// Zustand eines laufenden Event-Anlage-Ablaufs
#[derive(Debug, Clone)]
pub struct EventCreationWorkflow {
    event: Event,
    step: EventCreationStep,
    zone: Option<CachedShape>,
    path: Option<CachedShape>,
    modifying: Option<ModifyTarget>,
    committed_area: Option<Area>,
    committed_path: Option<RoutePath>,
    pending_commits: usize,
    commit_failed: bool,
}

impl EventCreationWorkflow {
    /// Startet den Ablauf für ein bereits angelegtes Event.
    pub fn new(event: Event) -> Self {
        Self {
            event,
            step: EventCreationStep::DrawingZone,
            zone: None,
            path: None,
            modifying: None,
            committed_area: None,
            committed_path: None,
            pending_commits: 0,
            commit_failed: false,
        }
    }

    /// Das neue Event
    pub fn event(&self) -> &Event {
        &self.event
    }

    /// Aktueller Schritt
    pub fn step(&self) -> EventCreationStep {
        self.step
    }

    /// Wird die Zone gerade bearbeitet?
    pub fn zone_modification(&self) -> bool {
        self.modifying == Some(ModifyTarget::Zone)
    }

    /// Wird das Tracé gerade bearbeitet?
    pub fn path_modification(&self) -> bool {
        self.modifying == Some(ModifyTarget::Path)
    }

    /// Zwischengespeicherte Zone
    pub fn zone(&self) -> Option<&CachedShape> {
        self.zone.as_ref()
    }

    /// Zwischengespeichertes Tracé
    pub fn path(&self) -> Option<&CachedShape> {
        self.path.as_ref()
    }

    /// Bereits gespeicherte Fläche
    pub fn committed_area(&self) -> Option<&Area> {
        self.committed_area.as_ref()
    }

    /// Bereits gespeicherter Weg
    pub fn committed_path(&self) -> Option<&RoutePath> {
        self.committed_path.as_ref()
    }

    /// Alle Layer des Ablaufs (noch ungebunden)
    pub fn layers(&self) -> Vec<LayerId> {
        self.zone
            .iter()
            .chain(self.path.iter())
            .map(|shape| shape.layer)
            .collect()
    }

    /// Übernimmt eine fertig gezeichnete Form und rückt einen Schritt weiter.
    pub fn on_shape_drawn(
        &mut self,
        layer: LayerId,
        geojson: Option<&str>,
    ) -> Result<EventCreationStep, WorkflowError> {
        if self.modifying.is_some() {
            return Err(WorkflowError::InvalidStep {
                action: "Zeichnen während der Bearbeitung",
            });
        }

        let (expected, label) = match self.step {
            EventCreationStep::DrawingZone => (GeometryType::Polygon, "Fläche"),
            EventCreationStep::DrawingPath => (GeometryType::Line, "Linie"),
            EventCreationStep::Confirm | EventCreationStep::Committed => {
                return Err(WorkflowError::WorkflowBusy {
                    active: ModeKind::EventCreationFlow,
                })
            }
        };
        let text = geojson.ok_or(WorkflowError::MissingGeometry(label))?;
        if geometry::geometry_type(text) != expected {
            return Err(WorkflowError::UnsupportedGeometry { expected: label });
        }

        let shape = CachedShape {
            layer,
            geojson: text.to_string(),
        };
        self.step = match self.step {
            EventCreationStep::DrawingZone => {
                self.zone = Some(shape);
                EventCreationStep::DrawingPath
            }
            _ => {
                self.path = Some(shape);
                EventCreationStep::Confirm
            }
        };
        Ok(self.step)
    }

    /// Beginnt die Bearbeitung einer bereits gezeichneten Form.
    ///
    /// Gibt den Layer zurück, dessen Vertex-Bearbeitung aktiviert werden soll.
    pub fn request_modify(&mut self, target: ModifyTarget) -> Result<LayerId, WorkflowError> {
        if self.step != EventCreationStep::Confirm || self.pending_commits > 0 {
            return Err(WorkflowError::InvalidStep {
                action: "Bearbeiten",
            });
        }
        let shape = match target {
            ModifyTarget::Zone => self.zone.as_ref(),
            ModifyTarget::Path => self.path.as_ref(),
        };
        let layer = shape
            .map(|s| s.layer)
            .ok_or(WorkflowError::MissingGeometry("Bearbeitung"))?;

        self.modifying = Some(target);
        self.step = match target {
            ModifyTarget::Zone => EventCreationStep::DrawingZone,
            ModifyTarget::Path => EventCreationStep::DrawingPath,
        };
        Ok(layer)
    }

    /// Schließt die Bearbeitung ab und liest die Geometrie vom Layer neu ein.
    ///
    /// Bei unveränderter Form bleibt der zwischengespeicherte Text erhalten.
    pub fn finish_modification(
        &mut self,
        map: &dyn MapSurface,
    ) -> Result<(ModifyTarget, LayerId), WorkflowError> {
        let target = self.modifying.ok_or(WorkflowError::InvalidStep {
            action: "Bearbeitung abschließen",
        })?;
        let shape = match target {
            ModifyTarget::Zone => self.zone.as_mut(),
            ModifyTarget::Path => self.path.as_mut(),
        }
        .ok_or(WorkflowError::MissingGeometry("Bearbeitung"))?;

        if let Some(current) = map.layer_geojson(shape.layer) {
            if let Some(changed) = geometry::replace_if_changed(&shape.geojson, &current) {
                log::info!("Geometrie von {:?} wurde geändert", target);
                shape.geojson = changed;
            }
        }
        let layer = shape.layer;

        self.modifying = None;
        self.step = EventCreationStep::Confirm;
        Ok((target, layer))
    }

    /// Baut die Entwürfe für alle noch nicht gespeicherten Entities.
    ///
    /// Bei einem erneuten Versuch wird nur die fehlende Entity neu angelegt.
    pub fn commit_drafts(
        &mut self,
        options: &PlannerOptions,
        now: DateTime<Utc>,
    ) -> Result<CommitDrafts, WorkflowError> {
        if self.step != EventCreationStep::Confirm || self.modifying.is_some() {
            return Err(WorkflowError::InvalidStep {
                action: "Bestätigen",
            });
        }
        if self.pending_commits > 0 {
            return Err(WorkflowError::WorkflowBusy {
                active: ModeKind::EventCreationFlow,
            });
        }
        let zone = self
            .zone
            .as_ref()
            .ok_or(WorkflowError::MissingGeometry("Event-Zone"))?;
        let path = self
            .path
            .as_ref()
            .ok_or(WorkflowError::MissingGeometry("Tracé"))?;

        let area = self.committed_area.is_none().then(|| {
            Area::new(
                self.event.id,
                naming::event_zone_name(&self.event.title),
                options.zone_color.clone(),
                zone.geojson.clone(),
            )
        });
        let route = self.committed_path.is_none().then(|| {
            RoutePath::new(
                self.event.id,
                naming::event_trace_name(&self.event.title),
                options.line_color.clone(),
                options.path_speeds(),
                path.geojson.clone(),
                now,
            )
        });

        self.pending_commits = usize::from(area.is_some()) + usize::from(route.is_some());
        self.commit_failed = false;
        Ok(CommitDrafts { area, path: route })
    }

    /// Fläche wurde gespeichert
    pub fn record_area_created(&mut self, area: Area) {
        self.committed_area = Some(area);
        self.pending_commits = self.pending_commits.saturating_sub(1);
    }

    /// Weg wurde gespeichert
    pub fn record_path_created(&mut self, path: RoutePath) {
        self.committed_path = Some(path);
        self.pending_commits = self.pending_commits.saturating_sub(1);
    }

    /// Eine der beiden Anlagen ist fehlgeschlagen
    pub fn record_commit_failure(&mut self) {
        self.commit_failed = true;
        self.pending_commits = self.pending_commits.saturating_sub(1);
    }

    /// Sind alle Antworten des laufenden Commits eingetroffen?
    pub fn commit_settled(&self) -> bool {
        self.pending_commits == 0
    }

    /// Ist beim laufenden Commit etwas fehlgeschlagen?
    pub fn commit_failed(&self) -> bool {
        self.commit_failed
    }

    /// Sind Fläche und Weg gespeichert?
    pub fn is_fully_committed(&self) -> bool {
        self.committed_area.is_some() && self.committed_path.is_some()
    }

    /// Markiert den Ablauf als abgeschlossen
    pub fn mark_committed(&mut self) {
        self.step = EventCreationStep::Committed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{DrawKind, HeadlessMap};
    use glam::DVec2;

    fn square() -> String {
        geometry::polygon_geojson(&[
            DVec2::new(2.0, 48.0),
            DVec2::new(2.01, 48.0),
            DVec2::new(2.01, 48.01),
            DVec2::new(2.0, 48.01),
        ])
    }

    fn trace() -> String {
        geometry::line_geojson(&[DVec2::new(2.0, 48.0), DVec2::new(2.005, 48.005)])
    }

    fn drawn_workflow(map: &HeadlessMap) -> EventCreationWorkflow {
        let mut wf = EventCreationWorkflow::new(Event::new("Trail", None, None));
        let zone_layer = map.draw(DrawKind::Polygon, square());
        let path_layer = map.draw(DrawKind::Polyline, trace());
        assert_eq!(
            wf.on_shape_drawn(zone_layer, Some(&square())),
            Ok(EventCreationStep::DrawingPath)
        );
        assert_eq!(
            wf.on_shape_drawn(path_layer, Some(&trace())),
            Ok(EventCreationStep::Confirm)
        );
        wf
    }

    #[test]
    fn test_wrong_geometry_type_keeps_step() {
        let mut wf = EventCreationWorkflow::new(Event::new("Trail", None, None));
        let err = wf.on_shape_drawn(LayerId(1), Some(&trace()));
        assert!(matches!(err, Err(WorkflowError::UnsupportedGeometry { .. })));
        assert_eq!(wf.step(), EventCreationStep::DrawingZone);
    }

    #[test]
    fn test_commit_builds_named_drafts() {
        let map = HeadlessMap::new();
        let mut wf = drawn_workflow(&map);
        let drafts = wf
            .commit_drafts(&PlannerOptions::default(), Utc::now())
            .expect("Commit sollte möglich sein");
        let area = drafts.area.expect("Fläche erwartet");
        let path = drafts.path.expect("Weg erwartet");
        assert_eq!(area.name.as_deref(), Some("Zone - Trail"));
        assert_eq!(area.color_hex, "#3388ff");
        assert_eq!(path.name, "Tracé - Trail");
        assert_eq!(path.color_hex, "#a91a1a");
        assert_eq!(path.fastest_estimated_speed, 5.0);
        assert_eq!(path.slowest_estimated_speed, 3.0);
        assert_eq!(area.geo_json, square());
    }

    #[test]
    fn test_retry_only_recreates_missing_entity() {
        let map = HeadlessMap::new();
        let mut wf = drawn_workflow(&map);
        let drafts = wf
            .commit_drafts(&PlannerOptions::default(), Utc::now())
            .expect("Commit sollte möglich sein");
        wf.record_area_created(drafts.area.expect("Fläche erwartet"));
        wf.record_commit_failure();
        assert!(wf.commit_settled());
        assert!(wf.commit_failed());
        assert!(!wf.is_fully_committed());

        let retry = wf
            .commit_drafts(&PlannerOptions::default(), Utc::now())
            .expect("Wiederholung sollte möglich sein");
        assert!(retry.area.is_none());
        assert!(retry.path.is_some());
    }

    #[test]
    fn test_modification_keeps_text_when_shape_unchanged() {
        let mut map = HeadlessMap::new();
        let mut wf = drawn_workflow(&map);
        let original = wf.path().map(|p| p.geojson.clone());

        let layer = wf
            .request_modify(ModifyTarget::Path)
            .expect("Bearbeitung sollte möglich sein");
        map.edit(
            layer,
            r#"{"coordinates":[[2.0,48.0],[2.005,48.005]],"type":"LineString"}"#,
        );
        wf.finish_modification(&map)
            .expect("Abschluss sollte möglich sein");
        assert_eq!(wf.path().map(|p| p.geojson.clone()), original);

        let layer = wf
            .request_modify(ModifyTarget::Zone)
            .expect("Bearbeitung sollte möglich sein");
        assert_eq!(wf.step(), EventCreationStep::DrawingZone);
        assert!(wf.zone_modification());
        let moved = geometry::polygon_geojson(&[
            DVec2::new(2.0, 48.0),
            DVec2::new(2.02, 48.0),
            DVec2::new(2.02, 48.02),
        ]);
        map.edit(layer, moved.clone());
        let (target, _) = wf
            .finish_modification(&map)
            .expect("Abschluss sollte möglich sein");
        assert_eq!(target, ModifyTarget::Zone);
        assert_eq!(wf.zone().map(|z| z.geojson.clone()), Some(moved));
        assert_eq!(wf.step(), EventCreationStep::Confirm);
        map.remove_layer(layer);
    }

    #[test]
    fn test_commit_rejected_while_modifying() {
        let map = HeadlessMap::new();
        let mut wf = drawn_workflow(&map);
        wf.request_modify(ModifyTarget::Zone)
            .expect("Bearbeitung sollte möglich sein");
        assert!(wf
            .commit_drafts(&PlannerOptions::default(), Utc::now())
            .is_err());
    }
}
