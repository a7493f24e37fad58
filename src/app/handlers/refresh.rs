//! Handler für die periodische Aktualisierung der Punkte.

use std::collections::HashSet;
use std::time::Instant;

use uuid::Uuid;

use super::binding;
use crate::app::outbox::{expect_reply, Awaiting, PersistReply, PersistRequest};
use crate::app::{AppState, ShapeKind};
use crate::core::Point;

/// Fordert die Punkt-Liste an, wenn das Intervall abgelaufen ist.
pub fn refresh_if_due(state: &mut AppState, now: Instant) {
    let Some(event_id) = state.catalog.event_id() else {
        return;
    };
    if !state.refresh.poll(now) {
        return;
    }
    log::debug!("Aktualisiere Punkte von Event {}", event_id);
    let guard = state.event_guard();
    state.outbox.issue(
        PersistRequest::ListPoints { event_id },
        guard,
        Awaiting::PointRefresh { event_id },
    );
}

/// Ersetzt die Punkte des Events durch die neue Liste.
///
/// Während einer Punkt-Bearbeitung wird die Antwort verworfen.
pub fn on_points(state: &mut AppState, event_id: Uuid, outcome: Result<PersistReply, String>) {
    if state.refresh.is_suspended() {
        log::debug!("Punkt-Aktualisierung während Bearbeitung verworfen");
        return;
    }
    if state.catalog.event_id() != Some(event_id) {
        return;
    }
    match expect_reply(outcome, PersistReply::into_points) {
        Ok(points) => replace_points(state, points),
        Err(message) => log::warn!("Punkte konnten nicht aktualisiert werden: {}", message),
    }
}

fn replace_points(state: &mut AppState, points: Vec<Point>) {
    let fresh: HashSet<Uuid> = points.iter().map(|p| p.id).collect();
    let previous = std::mem::replace(&mut state.catalog.points, points);

    for old in previous.iter().filter(|p| !fresh.contains(&p.id)) {
        state.geometry.unbind(state.map.as_mut(), old.id);
    }

    let changed: Vec<Uuid> = state
        .catalog
        .points
        .iter()
        .filter(|point| {
            let moved = previous
                .iter()
                .find(|old| old.id == point.id)
                .is_none_or(|old| old.position() != point.position());
            moved || state.geometry.layer_of(point.id).is_none()
        })
        .map(|p| p.id)
        .collect();

    for id in &changed {
        binding::show_entity(state, ShapeKind::Point, *id);
    }
    if !changed.is_empty() {
        log::debug!("{} Punkte neu dargestellt", changed.len());
    }
}
