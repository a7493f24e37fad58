//! Handler für die Anlage eines Events: Zone zeichnen, Tracé zeichnen,
//! nachbearbeiten, bestätigen oder abbrechen.

use chrono::Utc;
use uuid::Uuid;

use super::binding;
use crate::app::outbox::{Awaiting, CommitPart, Guard, PersistReply, PersistRequest};
use crate::app::workflows::ModifyTarget;
use crate::app::{AppState, EventCatalog, ShapeKind, WorkflowError};
use crate::core::entity::{remove_by_id, upsert};
use crate::core::Event;
use crate::map::LayerId;

/// Startet die Anlage für ein bereits gespeichertes Event.
pub fn start(state: &mut AppState, event: Event) {
    log::info!("Event-Anlage gestartet: {} ({})", event.title, event.id);
    upsert(&mut state.events, event.clone());
    if let Err(err) = state.mode.start_event_creation(state.map.as_mut(), event) {
        state.ui.report(&err);
    }
}

/// Übergibt eine gezeichnete Form an den aktuellen Schritt.
pub fn advance(state: &mut AppState, layer: LayerId) {
    state.geometry.track_unbound(layer);
    let geojson = state.map.layer_geojson(layer);
    match state
        .mode
        .advance_event_creation(state.map.as_mut(), layer, geojson.as_deref())
    {
        Ok(step) => log::info!("Event-Anlage: weiter mit {:?}", step),
        Err(err) => {
            state.geometry.discard_unbound(state.map.as_mut(), layer);
            state.ui.report(&err);
        }
    }
}

/// Aktiviert die Nachbearbeitung von Zone oder Tracé.
pub fn request_modification(state: &mut AppState, target: ModifyTarget) {
    match state.mode.request_modify(state.map.as_mut(), target) {
        Ok(layer) => log::info!("{:?} wird bearbeitet ({})", target, layer),
        Err(err) => state.ui.report(&err),
    }
}

/// Beendet die Nachbearbeitung.
pub fn finish_modification(state: &mut AppState) {
    match state.mode.finish_modification(state.map.as_mut()) {
        Ok(target) => log::info!("{:?} übernommen", target),
        Err(err) => state.ui.report(&err),
    }
}

/// Speichert Event-Zone und Tracé (nur die noch fehlenden).
pub fn commit(state: &mut AppState) {
    let guard = state.mode_guard();
    let Some(workflow) = state.mode.event_workflow_mut() else {
        state.ui.report(&WorkflowError::InvalidStep {
            action: "Bestätigen",
        });
        return;
    };

    let drafts = match workflow.commit_drafts(&state.options, Utc::now()) {
        Ok(drafts) => drafts,
        Err(err) => {
            state.ui.report(&err);
            return;
        }
    };
    if drafts.area.is_none() && drafts.path.is_none() {
        finalize(state);
        return;
    }

    if let Some(area) = drafts.area {
        state.outbox.issue(
            PersistRequest::CreateArea(area),
            guard,
            Awaiting::EventCommit {
                part: CommitPart::Area,
            },
        );
    }
    if let Some(path) = drafts.path {
        state.outbox.issue(
            PersistRequest::CreatePath(path),
            guard,
            Awaiting::EventCommit {
                part: CommitPart::Path,
            },
        );
    }
}

/// Verarbeitet die Antwort auf einen Teil des Commits.
///
/// Erst wenn beide Antworten da sind, wird abgeschlossen; schlägt ein Teil
/// fehl, bleibt der Ablauf im Bestätigungsschritt.
pub fn on_commit_finished(
    state: &mut AppState,
    part: CommitPart,
    outcome: Result<PersistReply, String>,
) {
    let Some(workflow) = state.mode.event_workflow_mut() else {
        return;
    };

    let failure = match (part, outcome) {
        (CommitPart::Area, Ok(PersistReply::Area(area))) => {
            workflow.record_area_created(area);
            None
        }
        (CommitPart::Path, Ok(PersistReply::Path(path))) => {
            workflow.record_path_created(path);
            None
        }
        (_, Ok(_)) => {
            workflow.record_commit_failure();
            Some("Unerwartete Antwort des Backends".to_string())
        }
        (_, Err(message)) => {
            workflow.record_commit_failure();
            Some(message)
        }
    };
    let settled = workflow.commit_settled();
    let committed = workflow.is_fully_committed();

    if let Some(message) = failure {
        let what = match part {
            CommitPart::Area => "Event-Zone",
            CommitPart::Path => "Tracé",
        };
        state
            .ui
            .report(&WorkflowError::Persistence { what, message });
    }
    if settled && committed {
        finalize(state);
    }
}

/// Schließt die Anlage ab: das neue Event wird ausgewählt, die gezeichneten
/// Layer bleiben als Darstellung von Zone und Tracé erhalten.
fn finalize(state: &mut AppState) {
    let Some(workflow) = state.mode.complete_event_creation(state.map.as_mut()) else {
        return;
    };
    let (Some(area), Some(path)) = (
        workflow.committed_area().cloned(),
        workflow.committed_path().cloned(),
    ) else {
        return;
    };
    let zone_layer = workflow.zone().map(|shape| shape.layer);
    let path_layer = workflow.path().map(|shape| shape.layer);
    let event = workflow.event().clone();

    state
        .geometry
        .clear_keeping(state.map.as_mut(), &workflow.layers());
    state.event_epoch += 1;
    state.visibility.reset();
    state.ui.reset_views();
    state.refresh.resume();
    state.refresh.reset();

    upsert(&mut state.events, event.clone());
    let title = event.title.clone();
    state.catalog = EventCatalog::for_event(event);
    let (area_id, path_id) = (area.id, path.id);
    state.catalog.upsert_area(area);
    state.catalog.upsert_path(path);

    if let Some(layer) = zone_layer {
        binding::adopt_layer(state, layer, ShapeKind::Area, area_id);
    }
    if let Some(layer) = path_layer {
        binding::adopt_layer(state, layer, ShapeKind::Path, path_id);
    }

    log::info!("Event {} angelegt", title);
    state.ui.info(format!("Event \"{title}\" angelegt"));
}

/// Bricht die Anlage ab und löscht das Event wieder.
pub fn cancel(state: &mut AppState) {
    let Some(workflow) = state
        .mode
        .cancel_event_creation(state.map.as_mut(), &mut state.geometry)
    else {
        return;
    };
    let event_id = workflow.event().id;
    remove_by_id(&mut state.events, event_id);
    log::info!("Event-Anlage abgebrochen, lösche Event {}", event_id);
    state.outbox.issue(
        PersistRequest::DeleteEvent(event_id),
        Guard::Unguarded,
        Awaiting::EventDeleted { event_id },
    );
}

/// Ergebnis des Löschens eines abgebrochenen Events.
pub fn on_event_deleted(event_id: Uuid, outcome: Result<PersistReply, String>) {
    match outcome {
        Ok(_) => log::info!("Event {} gelöscht", event_id),
        Err(message) => log::warn!("Event {} konnte nicht gelöscht werden: {}", event_id, message),
    }
}
