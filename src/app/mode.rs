//! Zeichenmodus der Karte: genau ein Modus besitzt die Zeichen-Ereignisse.
//!
//! ```text
//! Idle ──select──▶ Standard ──start_zone_creation──▶ ZoneCreationDrawing
//!   │                 │  ▲                                   │
//!   │                 │  └──────── stop / complete ──────────┘
//!   └──start_event_creation──▶ EventCreationFlow ──cancel/complete──▶ Standard | Idle
//! ```
//!
//! Jeder Übergang erhöht die Epoche; Antworten, die unter einer älteren
//! Epoche angefordert wurden, werden verworfen.

use std::sync::mpsc::{channel, Receiver, Sender};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::WorkflowError;
use super::geometry_store::GeometryStore;
use super::workflows::{
    EventCreationStep, EventCreationWorkflow, ModifyTarget, SecurityZoneDrawWorkflow,
};
use crate::core::Event;
use crate::map::{DrawKind, LayerId, MapSurface};

/// Art des aktiven Modus (ohne Nutzdaten)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModeKind {
    /// Kein Event ausgewählt
    Idle,
    /// Standard-Werkzeugleiste für das ausgewählte Event
    Standard,
    /// Sicherheitszone wird gezeichnet
    ZoneCreationDrawing,
    /// Event wird angelegt
    EventCreationFlow,
}

/// Aktiver Modus mit Zustand des Arbeitsablaufs
#[derive(Debug, Default)]
pub enum DrawingMode {
    /// Kein Event ausgewählt
    #[default]
    Idle,
    /// Standard-Zeichnen für ein Event
    Standard {
        /// Ausgewähltes Event
        event_id: Uuid,
    },
    /// Sicherheitszone zeichnen
    ZoneCreationDrawing(SecurityZoneDrawWorkflow),
    /// Event anlegen
    EventCreationFlow(EventCreationWorkflow),
}

impl DrawingMode {
    /// Art des Modus
    pub fn kind(&self) -> ModeKind {
        match self {
            DrawingMode::Idle => ModeKind::Idle,
            DrawingMode::Standard { .. } => ModeKind::Standard,
            DrawingMode::ZoneCreationDrawing(_) => ModeKind::ZoneCreationDrawing,
            DrawingMode::EventCreationFlow(_) => ModeKind::EventCreationFlow,
        }
    }
}

/// Meldung über einen Moduswechsel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeChange {
    /// Vorheriger Modus
    pub from: ModeKind,
    /// Neuer Modus
    pub to: ModeKind,
    /// Epoche nach dem Wechsel
    pub epoch: u64,
}

/// Zustandsautomat des Zeichenmodus
#[derive(Default)]
pub struct DrawingModeController {
    mode: DrawingMode,
    epoch: u64,
    /// Event, das vor dem Start einer Event-Anlage ausgewählt war
    previous_event: Option<Uuid>,
    listeners: Vec<Sender<ModeChange>>,
}

impl DrawingModeController {
    /// Erstellt den Controller im Modus `Idle`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Aktiver Modus
    pub fn mode(&self) -> &DrawingMode {
        &self.mode
    }

    /// Art des aktiven Modus
    pub fn mode_kind(&self) -> ModeKind {
        self.mode.kind()
    }

    /// Aktuelle Epoche
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Event des Standard-Modus
    pub fn standard_event(&self) -> Option<Uuid> {
        match &self.mode {
            DrawingMode::Standard { event_id } => Some(*event_id),
            _ => None,
        }
    }

    /// Laufender Sicherheitszonen-Ablauf
    pub fn zone_workflow(&self) -> Option<&SecurityZoneDrawWorkflow> {
        match &self.mode {
            DrawingMode::ZoneCreationDrawing(wf) => Some(wf),
            _ => None,
        }
    }

    /// Laufender Sicherheitszonen-Ablauf (veränderbar)
    pub fn zone_workflow_mut(&mut self) -> Option<&mut SecurityZoneDrawWorkflow> {
        match &mut self.mode {
            DrawingMode::ZoneCreationDrawing(wf) => Some(wf),
            _ => None,
        }
    }

    /// Laufender Event-Anlage-Ablauf
    pub fn event_workflow(&self) -> Option<&EventCreationWorkflow> {
        match &self.mode {
            DrawingMode::EventCreationFlow(wf) => Some(wf),
            _ => None,
        }
    }

    /// Laufender Event-Anlage-Ablauf (veränderbar)
    pub fn event_workflow_mut(&mut self) -> Option<&mut EventCreationWorkflow> {
        match &mut self.mode {
            DrawingMode::EventCreationFlow(wf) => Some(wf),
            _ => None,
        }
    }

    /// Abonniert Moduswechsel.
    pub fn subscribe(&mut self) -> Receiver<ModeChange> {
        let (tx, rx) = channel();
        self.listeners.push(tx);
        rx
    }

    /// Wechselt den Modus und stellt die Zeichen-Handler der Karte um.
    fn transition(&mut self, map: &mut dyn MapSurface, next: DrawingMode) -> DrawingMode {
        let from = self.mode.kind();
        let to = next.kind();

        match &next {
            DrawingMode::Idle => {
                map.stop_draw();
                map.set_standard_toolbar(false);
            }
            DrawingMode::Standard { .. } => {
                map.stop_draw();
                map.set_standard_toolbar(true);
            }
            DrawingMode::ZoneCreationDrawing(_) => {
                map.set_standard_toolbar(false);
                map.start_draw(DrawKind::Polyline);
            }
            DrawingMode::EventCreationFlow(_) => {
                map.set_standard_toolbar(false);
                map.start_draw(DrawKind::Polygon);
            }
        }

        let previous = std::mem::replace(&mut self.mode, next);
        self.epoch += 1;
        log::info!("Modus: {:?} → {:?} (Epoche {})", from, to, self.epoch);

        let change = ModeChange {
            from,
            to,
            epoch: self.epoch,
        };
        self.listeners.retain(|tx| tx.send(change).is_ok());
        previous
    }

    /// Wechselt in den Standard-Modus für ein Event.
    pub fn enter_standard(&mut self, map: &mut dyn MapSurface, event_id: Uuid) -> DrawingMode {
        self.transition(map, DrawingMode::Standard { event_id })
    }

    /// Wechselt in den Idle-Modus.
    pub fn enter_idle(&mut self, map: &mut dyn MapSurface) -> DrawingMode {
        self.transition(map, DrawingMode::Idle)
    }

    /// Startet das Zeichnen einer Sicherheitszone.
    ///
    /// Nur aus dem Standard-Modus; läuft bereits ein Ablauf, wird abgelehnt.
    pub fn start_zone_creation(
        &mut self,
        map: &mut dyn MapSurface,
        workflow: SecurityZoneDrawWorkflow,
    ) -> Result<(), WorkflowError> {
        match self.mode_kind() {
            ModeKind::Standard => {
                self.transition(map, DrawingMode::ZoneCreationDrawing(workflow));
                Ok(())
            }
            ModeKind::Idle => Err(WorkflowError::NoEventSelected),
            active => Err(WorkflowError::WorkflowBusy { active }),
        }
    }

    /// Bricht das Zeichnen einer Sicherheitszone ab und verwirft den Layer.
    pub fn stop_zone_creation(
        &mut self,
        map: &mut dyn MapSurface,
        store: &mut GeometryStore,
    ) -> Option<SecurityZoneDrawWorkflow> {
        let event_id = self.zone_workflow()?.event_id();
        let DrawingMode::ZoneCreationDrawing(mut workflow) =
            self.transition(map, DrawingMode::Standard { event_id })
        else {
            return None;
        };
        if let Some(layer) = workflow.drawn_layer() {
            store.discard_unbound(map, layer);
        }
        workflow.mark_cancelled();
        Some(workflow)
    }

    /// Schließt das Zeichnen einer Sicherheitszone ab (Layer bleibt erhalten).
    pub fn complete_zone_creation(
        &mut self,
        map: &mut dyn MapSurface,
    ) -> Option<SecurityZoneDrawWorkflow> {
        let event_id = self.zone_workflow()?.event_id();
        match self.transition(map, DrawingMode::Standard { event_id }) {
            DrawingMode::ZoneCreationDrawing(mut workflow) => {
                workflow.mark_completed();
                Some(workflow)
            }
            _ => None,
        }
    }

    /// Startet die Anlage eines Events (aus Idle oder Standard).
    pub fn start_event_creation(
        &mut self,
        map: &mut dyn MapSurface,
        event: Event,
    ) -> Result<(), WorkflowError> {
        match self.mode_kind() {
            ModeKind::Idle | ModeKind::Standard => {
                self.previous_event = self.standard_event();
                self.transition(
                    map,
                    DrawingMode::EventCreationFlow(EventCreationWorkflow::new(event)),
                );
                Ok(())
            }
            active => Err(WorkflowError::WorkflowBusy { active }),
        }
    }

    /// Übergibt eine gezeichnete Form an den Event-Anlage-Ablauf.
    ///
    /// Nach der Zone wird der Linien-Handler aktiviert, nach dem Tracé
    /// der Zeichen-Handler beendet.
    pub fn advance_event_creation(
        &mut self,
        map: &mut dyn MapSurface,
        layer: LayerId,
        geojson: Option<&str>,
    ) -> Result<EventCreationStep, WorkflowError> {
        let workflow = self
            .event_workflow_mut()
            .ok_or(WorkflowError::InvalidStep {
                action: "Event-Form übernehmen",
            })?;
        let step = workflow.on_shape_drawn(layer, geojson)?;
        match step {
            EventCreationStep::DrawingPath => map.start_draw(DrawKind::Polyline),
            _ => map.stop_draw(),
        }
        Ok(step)
    }

    /// Aktiviert die Bearbeitung einer gezeichneten Event-Form.
    pub fn request_modify(
        &mut self,
        map: &mut dyn MapSurface,
        target: ModifyTarget,
    ) -> Result<LayerId, WorkflowError> {
        let workflow = self.event_workflow_mut().ok_or(WorkflowError::InvalidStep {
            action: "Bearbeiten",
        })?;
        let layer = workflow.request_modify(target)?;
        map.set_vertex_editing(layer, true);
        Ok(layer)
    }

    /// Beendet die Bearbeitung und übernimmt die Geometrie vom Layer.
    pub fn finish_modification(
        &mut self,
        map: &mut dyn MapSurface,
    ) -> Result<ModifyTarget, WorkflowError> {
        let workflow = self.event_workflow_mut().ok_or(WorkflowError::InvalidStep {
            action: "Bearbeitung abschließen",
        })?;
        let (target, layer) = workflow.finish_modification(map)?;
        map.set_vertex_editing(layer, false);
        Ok(target)
    }

    /// Bricht die Event-Anlage ab.
    ///
    /// Verwirft die ungebundenen Layer und kehrt zum vorher ausgewählten
    /// Event zurück (oder nach Idle). Das Löschen des Events übernimmt der Aufrufer.
    pub fn cancel_event_creation(
        &mut self,
        map: &mut dyn MapSurface,
        store: &mut GeometryStore,
    ) -> Option<EventCreationWorkflow> {
        self.event_workflow()?;
        let next = match self.previous_event.take() {
            Some(event_id) => DrawingMode::Standard { event_id },
            None => DrawingMode::Idle,
        };
        let DrawingMode::EventCreationFlow(workflow) = self.transition(map, next) else {
            return None;
        };
        for layer in workflow.layers() {
            map.set_vertex_editing(layer, false);
            store.discard_unbound(map, layer);
        }
        Some(workflow)
    }

    /// Schließt die Event-Anlage ab und wechselt in den Standard-Modus des neuen Events.
    pub fn complete_event_creation(
        &mut self,
        map: &mut dyn MapSurface,
    ) -> Option<EventCreationWorkflow> {
        let event_id = self.event_workflow()?.event().id;
        self.previous_event = None;
        match self.transition(map, DrawingMode::Standard { event_id }) {
            DrawingMode::EventCreationFlow(mut workflow) => {
                workflow.mark_committed();
                Some(workflow)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Equipment, Point};
    use crate::map::HeadlessMap;
    use glam::DVec2;

    fn zone_workflow(event: &Event) -> SecurityZoneDrawWorkflow {
        let point = Point::new(event.id, DVec2::ZERO, false, 1);
        let equipment = Equipment {
            id: Uuid::new_v4(),
            kind: None,
            description: None,
            length: Some(2.0),
        };
        SecurityZoneDrawWorkflow::new(point, equipment, event.clone())
    }

    #[test]
    fn test_zone_creation_requires_standard() {
        let mut map = HeadlessMap::new();
        let mut modes = DrawingModeController::new();
        let event = Event::new("Fest", None, None);

        assert_eq!(
            modes.start_zone_creation(&mut map, zone_workflow(&event)),
            Err(WorkflowError::NoEventSelected)
        );

        modes.enter_standard(&mut map, event.id);
        assert!(map.toolbar_enabled());
        modes
            .start_zone_creation(&mut map, zone_workflow(&event))
            .expect("Start aus Standard sollte klappen");
        assert_eq!(modes.mode_kind(), ModeKind::ZoneCreationDrawing);
        assert!(!map.toolbar_enabled());
        assert_eq!(map.active_draw(), Some(DrawKind::Polyline));
    }

    #[test]
    fn test_only_one_sub_workflow_at_a_time() {
        let mut map = HeadlessMap::new();
        let mut modes = DrawingModeController::new();
        let event = Event::new("Fest", None, None);
        modes.enter_standard(&mut map, event.id);
        modes
            .start_event_creation(&mut map, Event::new("Neu", None, None))
            .expect("Event-Anlage sollte starten");
        let epoch = modes.epoch();

        let result = modes.start_zone_creation(&mut map, zone_workflow(&event));
        assert_eq!(
            result,
            Err(WorkflowError::WorkflowBusy {
                active: ModeKind::EventCreationFlow
            })
        );
        assert_eq!(modes.epoch(), epoch, "Ablehnung darf nichts ändern");
        assert!(modes
            .start_event_creation(&mut map, Event::new("Noch eins", None, None))
            .is_err());
    }

    #[test]
    fn test_stop_zone_creation_discards_drawn_layer() {
        let mut map = HeadlessMap::new();
        let mut store = GeometryStore::new();
        let mut modes = DrawingModeController::new();
        let event = Event::new("Fest", None, None);
        modes.enter_standard(&mut map, event.id);
        modes
            .start_zone_creation(&mut map, zone_workflow(&event))
            .expect("Start sollte klappen");

        let layer = map.draw(DrawKind::Polyline, "{}");
        store.track_unbound(layer);
        if let Some(wf) = modes.zone_workflow_mut() {
            let _ = wf.on_shape_drawn(layer, None);
        }

        let wf = modes
            .stop_zone_creation(&mut map, &mut store)
            .expect("Ablauf sollte aktiv gewesen sein");
        assert_eq!(wf.phase(), crate::app::workflows::ZoneDrawPhase::Cancelled);
        assert!(!map.has_layer(layer));
        assert_eq!(modes.standard_event(), Some(event.id));
    }

    #[test]
    fn test_cancel_event_creation_returns_to_previous_event() {
        let mut map = HeadlessMap::new();
        let mut store = GeometryStore::new();
        let mut modes = DrawingModeController::new();
        let previous = Uuid::new_v4();
        modes.enter_standard(&mut map, previous);
        modes
            .start_event_creation(&mut map, Event::new("Neu", None, None))
            .expect("Start sollte klappen");
        assert_eq!(map.active_draw(), Some(DrawKind::Polygon));

        modes.cancel_event_creation(&mut map, &mut store);
        assert_eq!(modes.standard_event(), Some(previous));

        modes
            .start_event_creation(&mut map, Event::new("Neu", None, None))
            .expect("Start sollte klappen");
        modes.cancel_event_creation(&mut map, &mut store);
        assert_eq!(modes.standard_event(), Some(previous));

        modes.enter_idle(&mut map);
        modes
            .start_event_creation(&mut map, Event::new("Neu", None, None))
            .expect("Start aus Idle sollte klappen");
        modes.cancel_event_creation(&mut map, &mut store);
        assert_eq!(modes.mode_kind(), ModeKind::Idle);
    }

    #[test]
    fn test_transitions_bump_epoch_and_notify() {
        let mut map = HeadlessMap::new();
        let mut modes = DrawingModeController::new();
        let rx = modes.subscribe();
        modes.enter_standard(&mut map, Uuid::new_v4());
        modes.enter_idle(&mut map);
        let changes: Vec<ModeChange> = rx.try_iter().collect();
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].to, ModeKind::Standard);
        assert_eq!(changes[1].from, ModeKind::Standard);
        assert_eq!(modes.epoch(), 2);
    }
}
