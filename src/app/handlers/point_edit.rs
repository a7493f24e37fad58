//! Handler für die Punkt-Bearbeitung.
//!
//! Solange ein Punkt bearbeitet wird, ist die periodische Aktualisierung
//! ausgesetzt.

use uuid::Uuid;

use crate::app::outbox::{Awaiting, PersistRequest};
use crate::app::state::PointEditView;
use crate::app::{AppState, ShapeKind, WorkflowError};
use crate::core::Point;

/// Öffnet die Bearbeitung eines Punkts.
pub fn begin(state: &mut AppState, point_id: Uuid) {
    let Some(point) = state.catalog.point(point_id).cloned() else {
        state.ui.report(&WorkflowError::StaleReference {
            kind: "Punkt",
            id: point_id,
        });
        return;
    };
    log::debug!("Punkt {} wird bearbeitet, Aktualisierung ausgesetzt", point_id);
    state.ui.point_edit = Some(PointEditView { point });
    state.refresh.suspend(point_id);
}

/// Speichert den bearbeiteten Punkt.
pub fn save(state: &mut AppState, point: Point) {
    if state.catalog.point(point.id).is_none() {
        state.ui.report(&WorkflowError::StaleReference {
            kind: "Punkt",
            id: point.id,
        });
        return;
    }
    let id = point.id;
    let guard = state.event_guard();
    state.outbox.issue(
        PersistRequest::UpdatePoint(point),
        guard,
        Awaiting::EntitySaved {
            kind: ShapeKind::Point,
            id,
        },
    );
}

/// Übernimmt einen gespeicherten Stand in die offene Bearbeitung.
pub(super) fn refresh_view(state: &mut AppState, point: &Point) {
    if let Some(view) = state.ui.point_edit.as_mut() {
        if view.point.id == point.id {
            view.point = point.clone();
        }
    }
}

/// Beendet die Bearbeitung und nimmt die Aktualisierung wieder auf.
pub fn end(state: &mut AppState) {
    state.ui.point_edit = None;
    state.refresh.resume();
}
