//! Handler für Event-Auswahl und das Laden der Stammdaten.

use uuid::Uuid;

use super::{binding, event_creation, security_zone};
use crate::app::outbox::{Awaiting, EventData, Guard, PersistReply, PersistRequest};
use crate::app::{AppState, EventCatalog, ModeKind, ShapeKind};

/// Fordert Event-Liste und Equipment-Katalog an.
pub fn load_catalog(state: &mut AppState) {
    state
        .outbox
        .issue(PersistRequest::ListEvents, Guard::Unguarded, Awaiting::Events);
    state.outbox.issue(
        PersistRequest::ListEquipment,
        Guard::Unguarded,
        Awaiting::Equipment,
    );
}

/// Wählt ein Event aus (None hebt die Auswahl auf).
///
/// Laufende Abläufe werden abgebrochen, alle Layer des bisherigen Events
/// entfernt und die Daten des neuen Events angefordert.
pub fn select_event(state: &mut AppState, event_id: Option<Uuid>) {
    cancel_active_workflow(state);

    state.event_epoch += 1;
    state.geometry.clear(state.map.as_mut());
    state.catalog.clear();
    state.visibility.reset();
    state.ui.reset_views();
    state.refresh.resume();
    state.refresh.reset();

    let event = event_id.and_then(|id| state.find_event(id).cloned());
    let Some(event) = event else {
        if let Some(id) = event_id {
            log::warn!("Event {} ist nicht bekannt", id);
        }
        if state.mode.mode_kind() != ModeKind::Idle {
            state.mode.enter_idle(state.map.as_mut());
        }
        return;
    };

    let id = event.id;
    log::info!("Event ausgewählt: {} ({})", event.title, id);
    state.catalog = EventCatalog::for_event(event);
    state.mode.enter_standard(state.map.as_mut(), id);

    let guard = state.event_guard();
    state.outbox.issue(
        PersistRequest::LoadEventData { event_id: id },
        guard,
        Awaiting::EventData { event_id: id },
    );
}

fn cancel_active_workflow(state: &mut AppState) {
    match state.mode.mode_kind() {
        ModeKind::ZoneCreationDrawing => security_zone::stop(state),
        ModeKind::EventCreationFlow => event_creation::cancel(state),
        ModeKind::Idle | ModeKind::Standard => {}
    }
}

/// Übernimmt die Event-Liste.
pub fn on_events(state: &mut AppState, outcome: Result<PersistReply, String>) {
    match outcome {
        Ok(PersistReply::Events(events)) => {
            log::info!("{} Events geladen", events.len());
            state.events = events;
        }
        Ok(_) => log::warn!("Unerwartete Antwort auf die Event-Liste"),
        Err(message) => {
            log::error!("Events konnten nicht geladen werden: {}", message);
            state.ui.error(format!("Events konnten nicht geladen werden: {message}"));
        }
    }
}

/// Übernimmt den Equipment-Katalog.
pub fn on_equipment(state: &mut AppState, outcome: Result<PersistReply, String>) {
    match outcome {
        Ok(PersistReply::Equipment(equipment)) => {
            log::info!("{} Equipment-Einträge geladen", equipment.len());
            state.equipment = equipment;
        }
        Ok(_) => log::warn!("Unerwartete Antwort auf den Equipment-Katalog"),
        Err(message) => {
            log::error!("Equipment konnte nicht geladen werden: {}", message);
            state
                .ui
                .error(format!("Equipment konnte nicht geladen werden: {message}"));
        }
    }
}

/// Baut Katalog und Layer des ausgewählten Events auf.
pub fn on_event_data(state: &mut AppState, event_id: Uuid, outcome: Result<PersistReply, String>) {
    if state.catalog.event_id() != Some(event_id) {
        log::debug!("Daten für nicht mehr ausgewähltes Event {} verworfen", event_id);
        return;
    }

    let data = match outcome {
        Ok(PersistReply::EventData(data)) => data,
        Ok(_) => {
            log::warn!("Unerwartete Antwort auf die Event-Daten");
            return;
        }
        Err(message) => {
            log::error!("Event-Daten konnten nicht geladen werden: {}", message);
            state
                .ui
                .error(format!("Event-Daten konnten nicht geladen werden: {message}"));
            return;
        }
    };

    let EventData {
        points,
        areas,
        paths,
        zones,
    } = data;
    log::info!(
        "Event {}: {} Punkte, {} Flächen, {} Wege, {} Sicherheitszonen",
        event_id,
        points.len(),
        areas.len(),
        paths.len(),
        zones.len()
    );

    let mut shown = Vec::new();
    shown.extend(areas.iter().map(|a| (ShapeKind::Area, a.id)));
    shown.extend(paths.iter().map(|p| (ShapeKind::Path, p.id)));
    shown.extend(zones.iter().map(|z| (ShapeKind::SecurityZone, z.id)));
    shown.extend(points.iter().map(|p| (ShapeKind::Point, p.id)));

    state.catalog.points = points;
    state.catalog.areas = areas;
    state.catalog.paths = paths;
    state.catalog.zones = zones;

    for (kind, id) in shown {
        binding::show_entity(state, kind, id);
    }
    state.refresh.reset();
}
