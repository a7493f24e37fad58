//! Verteilt Backend-Antworten an die zuständigen Handler.
//!
//! Antworten, deren Guard nicht mehr gilt (Modus oder Event gewechselt),
//! werden verworfen.

use super::{catalog, drawing, event_creation, refresh, security_zone, zone_edit};
use crate::app::outbox::{Awaiting, PersistReply, RequestId};
use crate::app::AppState;

/// Verarbeitet eine Antwort.
pub fn apply(state: &mut AppState, id: RequestId, outcome: Result<PersistReply, String>) {
    let Some((guard, awaiting)) = state.outbox.resolve(id) else {
        log::warn!("Antwort auf unbekannte Anfrage {:?}", id);
        return;
    };
    if !state.guard_holds(guard) {
        log::debug!("Veraltete Antwort {:?} verworfen ({:?})", id, guard);
        return;
    }

    match awaiting {
        Awaiting::Events => catalog::on_events(state, outcome),
        Awaiting::Equipment => catalog::on_equipment(state, outcome),
        Awaiting::EventData { event_id } => catalog::on_event_data(state, event_id, outcome),
        Awaiting::PointRefresh { event_id } => refresh::on_points(state, event_id, outcome),
        Awaiting::PointCreated { layer } => drawing::on_point_created(state, layer, outcome),
        Awaiting::AreaCreated { layer } => drawing::on_area_created(state, layer, outcome),
        Awaiting::PathCreated { layer } => drawing::on_path_created(state, layer, outcome),
        Awaiting::EntitySaved { kind, id } => drawing::on_entity_saved(state, kind, id, outcome),
        Awaiting::EntityDeleted { kind, id } => {
            drawing::on_entity_deleted(state, kind, id, outcome)
        }
        Awaiting::ZoneCreation { plan, context } => {
            security_zone::on_step_finished(state, plan, context, outcome)
        }
        Awaiting::ZoneEdit { plan, draft } => {
            zone_edit::on_step_finished(state, plan, draft, outcome)
        }
        Awaiting::EventCommit { part } => event_creation::on_commit_finished(state, part, outcome),
        Awaiting::EventDeleted { event_id } => event_creation::on_event_deleted(event_id, outcome),
    }
}
