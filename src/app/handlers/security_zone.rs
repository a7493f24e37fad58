//! Handler für das Anlegen einer Sicherheitszone aus einem Punkt.
//!
//! Ablauf: Equipment auflösen, Linie zeichnen, Zone anlegen, Fotos des
//! Punkts übertragen, Punkt löschen. Jeder Persistenz-Schritt startet erst
//! nach der Antwort des vorigen.

use uuid::Uuid;

use super::binding;
use crate::app::outbox::{
    expect_reply, Awaiting, Guard, PersistReply, PersistRequest, ZoneCreationContext,
};
use crate::app::workflows::{
    zone_step_plan, SecurityZoneDrawWorkflow, StepOutcome, StepPlan, ZoneDrawPhase, ZoneEditView,
    ZoneStep,
};
use crate::app::{AppState, ModeKind, ShapeKind, WorkflowError};
use crate::core::{Equipment, Point};
use crate::map::LayerId;

fn ensure_standard(state: &AppState) -> Result<(), WorkflowError> {
    match state.mode.mode_kind() {
        ModeKind::Standard => Ok(()),
        ModeKind::Idle => Err(WorkflowError::NoEventSelected),
        active => Err(WorkflowError::WorkflowBusy { active }),
    }
}

/// Startet den Ablauf für einen Punkt.
///
/// Hat der Punkt kein bekanntes Equipment, öffnet sich die Equipment-Auswahl.
pub fn request(state: &mut AppState, point_id: Uuid) {
    if let Err(err) = ensure_standard(state) {
        state.ui.report(&err);
        return;
    }
    let Some(point) = state.catalog.point(point_id).cloned() else {
        state.ui.report(&WorkflowError::StaleReference {
            kind: "Punkt",
            id: point_id,
        });
        return;
    };

    let equipment = point
        .equipment_id
        .and_then(|id| state.find_equipment(id))
        .cloned();
    match equipment {
        Some(equipment) => start_with(state, point, equipment),
        None => {
            if let Some(equipment_id) = point.equipment_id {
                log::warn!(
                    "Equipment {} des Punkts {} ist nicht im Katalog",
                    equipment_id,
                    point_id
                );
            }
            log::info!("Equipment-Auswahl für Punkt {} geöffnet", point_id);
            state.ui.equipment_picker = Some(point_id);
        }
    }
}

/// Startet das Zeichnen mit dem gewählten Equipment.
pub fn start(state: &mut AppState, point_id: Uuid, equipment_id: Uuid) {
    let Some(point) = state.catalog.point(point_id).cloned() else {
        state.ui.report(&WorkflowError::StaleReference {
            kind: "Punkt",
            id: point_id,
        });
        return;
    };
    let Some(equipment) = state.find_equipment(equipment_id).cloned() else {
        state.ui.report(&WorkflowError::MissingEquipment(point_id));
        return;
    };
    start_with(state, point, equipment);
}

fn start_with(state: &mut AppState, point: Point, equipment: Equipment) {
    let Some(event) = state.selected_event().cloned() else {
        state.ui.report(&WorkflowError::NoEventSelected);
        return;
    };
    log::info!(
        "Sicherheitszone für Punkt {} mit {}",
        point.id,
        equipment.label()
    );
    let workflow = SecurityZoneDrawWorkflow::new(point, equipment, event);
    if let Err(err) = state.mode.start_zone_creation(state.map.as_mut(), workflow) {
        state.ui.report(&err);
    }
}

/// Schließt die Equipment-Auswahl.
pub fn close_picker(state: &mut AppState) {
    state.ui.equipment_picker = None;
}

/// Bricht das Zeichnen ab (gezeichneter Layer wird verworfen).
pub fn stop(state: &mut AppState) {
    if let Some(workflow) = state
        .mode
        .stop_zone_creation(state.map.as_mut(), &mut state.geometry)
    {
        log::info!(
            "Sicherheitszone für Punkt {} abgebrochen",
            workflow.source_point().id
        );
    }
}

/// Übernimmt die gezeichnete Linie und legt die Zone an.
pub fn complete_draw(state: &mut AppState, layer: LayerId) {
    state.geometry.track_unbound(layer);
    let geojson = state.map.layer_geojson(layer);

    let Some(workflow) = state.mode.zone_workflow_mut() else {
        state.geometry.discard_unbound(state.map.as_mut(), layer);
        return;
    };
    if workflow.phase() != ZoneDrawPhase::AwaitingDraw {
        log::debug!("Zone wird bereits gespeichert, Layer {} verworfen", layer);
        state.geometry.discard_unbound(state.map.as_mut(), layer);
        return;
    }

    match workflow.on_shape_drawn(layer, geojson.as_deref()) {
        Ok(zone) => {
            let source_point_id = workflow.source_point().id;
            let context = ZoneCreationContext {
                source_point_id,
                layer,
                zone,
                event_guard: state.event_guard(),
            };
            state.map.stop_draw();
            issue_step(state, zone_step_plan(), context);
        }
        Err(err) => {
            state.ui.report(&err);
            stop(state);
        }
    }
}

/// Startet den nächsten Schritt des Plans.
///
/// Nur das Anlegen hängt am Modus. Foto-Übertragung und Punkt-Löschung laufen
/// auch nach einem Event-Wechsel bis zum Ende.
fn issue_step(state: &mut AppState, mut plan: StepPlan<ZoneStep>, context: ZoneCreationContext) {
    let Some(step) = plan.start_next() else {
        log::info!("Sicherheitszone {} vollständig angelegt", context.zone.id);
        return;
    };
    let (request, guard) = match step {
        ZoneStep::CreateZone => (
            PersistRequest::CreateSecurityZone(context.zone.clone()),
            state.mode_guard(),
        ),
        ZoneStep::TransferPhotos => (
            PersistRequest::TransferPhotos {
                point_id: context.source_point_id,
                zone_id: context.zone.id,
            },
            Guard::Unguarded,
        ),
        ZoneStep::DeleteSourcePoint => (
            PersistRequest::DeletePoint(context.source_point_id),
            Guard::Unguarded,
        ),
    };
    state
        .outbox
        .issue(request, guard, Awaiting::ZoneCreation { plan, context });
}

/// Verarbeitet die Antwort auf einen Schritt und startet den nächsten.
pub fn on_step_finished(
    state: &mut AppState,
    mut plan: StepPlan<ZoneStep>,
    mut context: ZoneCreationContext,
    outcome: Result<PersistReply, String>,
) {
    let Some(step) = plan.current() else {
        return;
    };

    match step {
        ZoneStep::CreateZone => match expect_reply(outcome, PersistReply::into_security_zone) {
            Ok(zone) => {
                plan.succeed();
                state.mode.complete_zone_creation(state.map.as_mut());
                state.catalog.upsert_zone(zone.clone());
                binding::adopt_layer(state, context.layer, ShapeKind::SecurityZone, zone.id);
                let equipment = state.find_equipment(zone.equipment_id);
                state.ui.zone_edit = Some(ZoneEditView::open(&zone, equipment));
                state.ui.info("Sicherheitszone angelegt");
                context.zone = zone;
            }
            Err(message) => {
                plan.fail();
                state.ui.report(&WorkflowError::Persistence {
                    what: "Sicherheitszone",
                    message,
                });
                stop(state);
                return;
            }
        },
        ZoneStep::TransferPhotos => match outcome {
            Ok(reply) => {
                plan.succeed();
                if let PersistReply::PhotosTransferred(count) = reply {
                    log::info!("{} Fotos auf Zone {} übertragen", count, context.zone.id);
                }
            }
            Err(message) => {
                log::warn!("Fotos konnten nicht übertragen werden: {}", message);
                if plan.fail() == StepOutcome::Abort {
                    return;
                }
            }
        },
        ZoneStep::DeleteSourcePoint => match outcome {
            Ok(_) => {
                plan.succeed();
                let point_id = context.source_point_id;
                if state.guard_holds(context.event_guard) {
                    state.catalog.remove_point(point_id);
                    state.geometry.unbind(state.map.as_mut(), point_id);
                    if state.refresh.suspended_for() == Some(point_id) {
                        super::point_edit::end(state);
                    }
                }
                log::info!("Punkt {} durch Sicherheitszone ersetzt", point_id);
            }
            Err(message) => {
                log::warn!(
                    "Punkt {} konnte nicht gelöscht werden: {}",
                    context.source_point_id,
                    message
                );
                if plan.fail() == StepOutcome::Abort {
                    return;
                }
            }
        },
    }

    issue_step(state, plan, context);
}
