//! Ablauf "Sicherheitszone zeichnen": Punkt + Equipment → persistierte Zone.

use crate::app::error::WorkflowError;
use crate::core::{geometry, metrics, Equipment, Event, Point, SecurityZone};
use crate::map::LayerId;
use uuid::Uuid;

use super::steps::{FailurePolicy, StepPlan};

/// Phase des Ablaufs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneDrawPhase {
    /// Zeichen-Handler aktiv, wartet auf die Linie
    AwaitingDraw,
    /// Zone wird angelegt
    Persisting,
    /// Zone angelegt
    Completed,
    /// Abgebrochen
    Cancelled,
}

/// Persistenz-Schritte nach dem Zeichnen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneStep {
    /// Sicherheitszone anlegen (Abbruch bei Fehler)
    CreateZone,
    /// Fotos des Punkts an die Zone hängen
    TransferPhotos,
    /// Ursprungspunkt löschen
    DeleteSourcePoint,
}

/// Schrittfolge: Anlegen ist Pflicht, der Rest best-effort.
pub fn zone_step_plan() -> StepPlan<ZoneStep> {
    StepPlan::new([
        (ZoneStep::CreateZone, FailurePolicy::AbortWorkflow),
        (ZoneStep::TransferPhotos, FailurePolicy::LogAndContinue),
        (ZoneStep::DeleteSourcePoint, FailurePolicy::LogAndContinue),
    ])
}

/// Zustand eines laufenden Sicherheitszonen-Ablaufs
#[derive(Debug, Clone)]
pub struct SecurityZoneDrawWorkflow {
    source_point: Point,
    equipment: Equipment,
    event: Event,
    phase: ZoneDrawPhase,
    drawn_layer: Option<LayerId>,
    measured_length: Option<f64>,
}

impl SecurityZoneDrawWorkflow {
    /// Startet den Ablauf für einen Punkt mit aufgelöstem Equipment.
    pub fn new(source_point: Point, equipment: Equipment, event: Event) -> Self {
        Self {
            source_point,
            equipment,
            event,
            phase: ZoneDrawPhase::AwaitingDraw,
            drawn_layer: None,
            measured_length: None,
        }
    }

    /// Ursprungspunkt
    pub fn source_point(&self) -> &Point {
        &self.source_point
    }

    /// Gewähltes Equipment
    pub fn equipment(&self) -> &Equipment {
        &self.equipment
    }

    /// Event der Zone
    pub fn event(&self) -> &Event {
        &self.event
    }

    /// ID des Events
    pub fn event_id(&self) -> Uuid {
        self.event.id
    }

    /// Aktuelle Phase
    pub fn phase(&self) -> ZoneDrawPhase {
        self.phase
    }

    /// Gezeichneter (noch ungebundener) Layer
    pub fn drawn_layer(&self) -> Option<LayerId> {
        self.drawn_layer
    }

    /// Gemessene Länge der gezeichneten Linie in Metern
    pub fn measured_length(&self) -> Option<f64> {
        self.measured_length
    }

    /// Verarbeitet die fertig gezeichnete Linie und baut den Zonen-Entwurf.
    ///
    /// Der Layer wird in jedem Fall übernommen, damit er bei Fehler oder
    /// Abbruch verworfen werden kann.
    pub fn on_shape_drawn(
        &mut self,
        layer: LayerId,
        geojson: Option<&str>,
    ) -> Result<SecurityZone, WorkflowError> {
        self.drawn_layer = Some(layer);
        let text = geojson.ok_or(WorkflowError::MissingGeometry("Sicherheitszone"))?;
        if geometry::parse_line(text).is_none() {
            return Err(WorkflowError::UnsupportedGeometry { expected: "Linie" });
        }

        let length = metrics::length(text);
        let quantity = metrics::quantity(length, self.equipment.unit_length());
        self.measured_length = Some(length);
        self.phase = ZoneDrawPhase::Persisting;

        log::info!(
            "Sicherheitszone gezeichnet: {} mit {} ({} Stück)",
            metrics::format_length(length),
            self.equipment.label(),
            quantity
        );

        Ok(SecurityZone {
            id: Uuid::new_v4(),
            event_id: self.event.id,
            equipment_id: self.equipment.id,
            quantity,
            comment: self.source_point.comment_text().map(str::to_string),
            installation_date: self.event.start_date,
            removal_date: self.event.end_date,
            geo_json: text.to_string(),
            installation_team_id: None,
            removal_team_id: None,
        })
    }

    /// Markiert den Ablauf als abgeschlossen
    pub fn mark_completed(&mut self) {
        self.phase = ZoneDrawPhase::Completed;
    }

    /// Markiert den Ablauf als abgebrochen
    pub fn mark_cancelled(&mut self) {
        self.phase = ZoneDrawPhase::Cancelled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::metrics::EARTH_RADIUS_M;
    use chrono::{TimeZone, Utc};
    use glam::DVec2;

    fn workflow(unit_length: Option<f64>) -> SecurityZoneDrawWorkflow {
        let event = Event::new(
            "Marathon",
            Some(Utc.with_ymd_and_hms(2026, 5, 1, 8, 0, 0).unwrap()),
            Some(Utc.with_ymd_and_hms(2026, 5, 2, 20, 0, 0).unwrap()),
        );
        let mut point = Point::new(event.id, DVec2::new(0.0, 0.0), false, 1);
        point.comment = Some("Gate 3".into());
        let equipment = Equipment {
            id: Uuid::new_v4(),
            kind: Some("Barrière".into()),
            description: None,
            length: unit_length,
        };
        point.equipment_id = Some(equipment.id);
        SecurityZoneDrawWorkflow::new(point, equipment, event)
    }

    fn line_of(meters: f64) -> String {
        let d = (meters / EARTH_RADIUS_M).to_degrees();
        geometry::line_geojson(&[DVec2::new(0.0, 0.0), DVec2::new(d, 0.0)])
    }

    #[test]
    fn test_drawn_line_builds_zone_draft() {
        let mut wf = workflow(Some(10.0));
        let text = line_of(47.0);
        let zone = wf
            .on_shape_drawn(LayerId(7), Some(&text))
            .expect("Linie sollte akzeptiert werden");

        assert_eq!(zone.quantity, 5);
        assert_eq!(zone.comment.as_deref(), Some("Gate 3"));
        assert_eq!(zone.installation_date, wf.event().start_date);
        assert_eq!(zone.removal_date, wf.event().end_date);
        assert_eq!(zone.geo_json, text);
        assert_eq!(wf.phase(), ZoneDrawPhase::Persisting);
        assert_eq!(wf.drawn_layer(), Some(LayerId(7)));
    }

    #[test]
    fn test_polygon_is_rejected_but_layer_is_kept() {
        let mut wf = workflow(Some(10.0));
        let polygon = geometry::polygon_geojson(&[
            DVec2::new(0.0, 0.0),
            DVec2::new(0.001, 0.0),
            DVec2::new(0.001, 0.001),
        ]);
        let err = wf
            .on_shape_drawn(LayerId(3), Some(&polygon))
            .expect_err("Polygon sollte abgelehnt werden");
        assert!(matches!(err, WorkflowError::UnsupportedGeometry { .. }));
        assert_eq!(wf.drawn_layer(), Some(LayerId(3)));
        assert_eq!(wf.phase(), ZoneDrawPhase::AwaitingDraw);
    }

    #[test]
    fn test_missing_unit_length_gives_one() {
        let mut wf = workflow(None);
        let zone = wf
            .on_shape_drawn(LayerId(1), Some(&line_of(300.0)))
            .expect("Linie sollte akzeptiert werden");
        assert_eq!(zone.quantity, 1);
    }

    #[test]
    fn test_empty_comment_is_not_copied() {
        let mut wf = workflow(Some(10.0));
        wf.source_point.comment = Some(String::new());
        let zone = wf
            .on_shape_drawn(LayerId(1), Some(&line_of(20.0)))
            .expect("Linie sollte akzeptiert werden");
        assert_eq!(zone.comment, None);
    }
}
