//! Handler für das Standard-Zeichnen: Punkte, Flächen, Equipment-Linien,
//! Bearbeiten, Löschen und Hervorheben.

use chrono::{Local, Utc};
use uuid::Uuid;

use super::{binding, point_edit, zone_edit};
use crate::app::layers;
use crate::app::outbox::{expect_reply, Awaiting, PersistReply, PersistRequest};
use crate::app::state::PendingPoint;
use crate::app::{AppState, ModeKind, ShapeKind, WorkflowError};
use crate::core::geometry::{self, GeometryType};
use crate::core::{naming, Area, Point, RoutePath};
use crate::map::{DrawKind, LayerId};

/// Entfernt eine Zeichnung, die im aktuellen Modus keine Bedeutung hat.
pub fn discard_layer(state: &mut AppState, layer: LayerId) {
    log::debug!("Layer {} verworfen (Modus {:?})", layer, state.mode.mode_kind());
    state.geometry.discard_unbound(state.map.as_mut(), layer);
    state.map.remove_layer(layer);
}

/// Verwirft eine Form des falschen Typs.
pub fn reject_shape(state: &mut AppState, layer: LayerId, kind: DrawKind) {
    log::warn!("{:?} im Modus {:?} abgelehnt", kind, state.mode.mode_kind());
    state.map.remove_layer(layer);
    state
        .ui
        .report(&WorkflowError::UnsupportedGeometry { expected: "Linie" });
}

/// Merkt einen gezeichneten Marker, bis die Punkt-Art gewählt ist.
pub fn begin_point_placement(state: &mut AppState, layer: LayerId) {
    let position = state
        .map
        .layer_geojson(layer)
        .as_deref()
        .and_then(geometry::parse_point);
    let Some(position) = position else {
        state.map.remove_layer(layer);
        state.ui.report(&WorkflowError::MissingGeometry("Punkt"));
        return;
    };

    if let Some(previous) = state.ui.pending_point.take() {
        state
            .geometry
            .discard_unbound(state.map.as_mut(), previous.layer);
    }
    state.geometry.track_unbound(layer);
    state.ui.pending_point = Some(PendingPoint { layer, position });
}

/// Legt den Punkt des gemerkten Markers an.
pub fn create_pending_point(state: &mut AppState, is_point_of_interest: bool) {
    let Some(pending) = state.ui.pending_point.take() else {
        return;
    };
    let Some(event_id) = state.mode.standard_event() else {
        state
            .geometry
            .discard_unbound(state.map.as_mut(), pending.layer);
        state.ui.report(&WorkflowError::NoEventSelected);
        return;
    };

    let order = if is_point_of_interest {
        0
    } else {
        state.catalog.regular_point_count() as u32 + 1
    };
    let point = Point::new(event_id, pending.position, is_point_of_interest, order);
    log::info!("Neuer Punkt {} (Reihenfolge {})", point.id, order);

    let guard = state.event_guard();
    state.outbox.issue(
        PersistRequest::CreatePoint(point),
        guard,
        Awaiting::PointCreated {
            layer: pending.layer,
        },
    );
}

/// Verwirft den gemerkten Marker.
pub fn discard_pending_point(state: &mut AppState) {
    if let Some(pending) = state.ui.pending_point.take() {
        state
            .geometry
            .discard_unbound(state.map.as_mut(), pending.layer);
    }
}

/// Übernimmt die Geometrie eines gezeichneten Layers für eine neue Entity.
///
/// Bei fehlendem Event oder falschem Typ wird der Layer verworfen.
fn take_drawn_geometry(
    state: &mut AppState,
    layer: LayerId,
    expected: GeometryType,
    label: &'static str,
) -> Option<(Uuid, String)> {
    let Some(event_id) = state.mode.standard_event() else {
        state.map.remove_layer(layer);
        state.ui.report(&WorkflowError::NoEventSelected);
        return None;
    };
    let geojson = state
        .map
        .layer_geojson(layer)
        .filter(|text| geometry::geometry_type(text) == expected);
    let Some(geojson) = geojson else {
        state.map.remove_layer(layer);
        state
            .ui
            .report(&WorkflowError::UnsupportedGeometry { expected: label });
        return None;
    };
    state.geometry.track_unbound(layer);
    Some((event_id, geojson))
}

/// Legt eine frei gezeichnete Fläche an.
pub fn create_area(state: &mut AppState, layer: LayerId) {
    let Some((event_id, geojson)) =
        take_drawn_geometry(state, layer, GeometryType::Polygon, "Fläche")
    else {
        return;
    };
    let color = state
        .map
        .layer_style(layer)
        .map(|s| s.color)
        .unwrap_or_else(|| state.options.zone_color.clone());
    let area = Area::new(
        event_id,
        naming::free_area_name(&Local::now()),
        color,
        geojson,
    );
    log::info!("Neue Fläche {:?}", area.name);

    let guard = state.event_guard();
    state.outbox.issue(
        PersistRequest::CreateArea(area),
        guard,
        Awaiting::AreaCreated { layer },
    );
}

/// Legt eine frei gezeichnete Equipment-Linie an.
pub fn create_equipment_path(state: &mut AppState, layer: LayerId) {
    let Some((event_id, geojson)) =
        take_drawn_geometry(state, layer, GeometryType::Line, "Linie")
    else {
        return;
    };
    let color = state
        .map
        .layer_style(layer)
        .map(|s| s.color)
        .unwrap_or_else(|| state.options.line_color.clone());
    let path = RoutePath::new(
        event_id,
        naming::equipment_path_name(&Local::now()),
        color,
        state.options.path_speeds(),
        geojson,
        Utc::now(),
    );
    log::info!("Neue Equipment-Linie {}", path.name);

    let guard = state.event_guard();
    state.outbox.issue(
        PersistRequest::CreatePath(path),
        guard,
        Awaiting::PathCreated { layer },
    );
}

/// Bindet den neuen Punkt an seinen Marker und öffnet seine Bearbeitung.
pub fn on_point_created(state: &mut AppState, layer: LayerId, outcome: Result<PersistReply, String>) {
    match expect_reply(outcome, PersistReply::into_point) {
        Ok(point) => {
            let id = point.id;
            state.catalog.upsert_point(point);
            binding::adopt_layer(state, layer, ShapeKind::Point, id);
            select_layer(state, layer);
        }
        Err(message) => {
            state.geometry.discard_unbound(state.map.as_mut(), layer);
            state.ui.report(&WorkflowError::Persistence {
                what: "Punkt",
                message,
            });
        }
    }
}

/// Bindet die neue Fläche an ihren Layer.
pub fn on_area_created(state: &mut AppState, layer: LayerId, outcome: Result<PersistReply, String>) {
    match expect_reply(outcome, PersistReply::into_area) {
        Ok(area) => {
            let id = area.id;
            state.catalog.upsert_area(area);
            binding::adopt_layer(state, layer, ShapeKind::Area, id);
        }
        Err(message) => {
            state.geometry.discard_unbound(state.map.as_mut(), layer);
            state.ui.report(&WorkflowError::Persistence {
                what: "Fläche",
                message,
            });
        }
    }
}

/// Bindet den neuen Weg an seinen Layer.
pub fn on_path_created(state: &mut AppState, layer: LayerId, outcome: Result<PersistReply, String>) {
    match expect_reply(outcome, PersistReply::into_path) {
        Ok(path) => {
            let id = path.id;
            state.catalog.upsert_path(path);
            binding::adopt_layer(state, layer, ShapeKind::Path, id);
        }
        Err(message) => {
            state.geometry.discard_unbound(state.map.as_mut(), layer);
            state.ui.report(&WorkflowError::Persistence {
                what: "Weg",
                message,
            });
        }
    }
}

/// Speichert die Geometrien bearbeiteter Layer.
///
/// Unveränderte Geometrien und ungebundene Layer werden übersprungen.
pub fn sync_edited_layers(state: &mut AppState, layers: Vec<LayerId>) {
    for layer in layers {
        let Some(binding) = state.geometry.binding_for_layer(layer).cloned() else {
            log::debug!("Bearbeiteter Layer {} ist nicht gebunden", layer);
            continue;
        };
        let Some(geojson) = state.map.layer_geojson(layer) else {
            continue;
        };
        let Some(request) = updated_entity(state, binding.kind, binding.entity_id, &geojson)
        else {
            continue;
        };

        log::info!("{:?} {} geändert, speichere", binding.kind, binding.entity_id);
        let guard = state.event_guard();
        state.outbox.issue(
            request,
            guard,
            Awaiting::EntitySaved {
                kind: binding.kind,
                id: binding.entity_id,
            },
        );
    }
}

/// Update-Anfrage für eine geänderte Geometrie (None = unverändert oder unbekannt)
fn updated_entity(
    state: &AppState,
    kind: ShapeKind,
    id: Uuid,
    geojson: &str,
) -> Option<PersistRequest> {
    let catalog = &state.catalog;
    let request = match kind {
        ShapeKind::Point => {
            let position = geometry::parse_point(geojson)?;
            let mut point = catalog.point(id)?.clone();
            if point.position() == position {
                return None;
            }
            point.set_position(position);
            PersistRequest::UpdatePoint(point)
        }
        ShapeKind::Area => {
            let mut area = catalog.area(id)?.clone();
            area.geo_json = geometry::replace_if_changed(&area.geo_json, geojson)?;
            PersistRequest::UpdateArea(area)
        }
        ShapeKind::Path => {
            let mut path = catalog.path(id)?.clone();
            path.geo_json = geometry::replace_if_changed(&path.geo_json, geojson)?;
            PersistRequest::UpdatePath(path)
        }
        ShapeKind::SecurityZone => {
            let mut zone = catalog.zone(id)?.clone();
            zone.geo_json = geometry::replace_if_changed(&zone.geo_json, geojson)?;
            PersistRequest::UpdateSecurityZone(zone)
        }
    };
    Some(request)
}

/// Übernimmt eine gespeicherte Entity oder stellt bei Fehler den alten Stand dar.
pub fn on_entity_saved(
    state: &mut AppState,
    kind: ShapeKind,
    id: Uuid,
    outcome: Result<PersistReply, String>,
) {
    let saved = match outcome {
        Ok(reply) => reply,
        Err(message) => {
            state.ui.report(&WorkflowError::Persistence {
                what: kind_label(kind),
                message,
            });
            if state.geometry.binding(id).is_some() {
                binding::show_entity(state, kind, id);
            }
            return;
        }
    };

    match saved {
        PersistReply::Point(point) => {
            let moved = state
                .catalog
                .point(id)
                .is_some_and(|old| old.position() != point.position());
            let shown = state
                .geometry
                .layer_of(id)
                .and_then(|layer| state.map.layer_geojson(layer))
                .and_then(|text| geometry::parse_point(&text));
            state.catalog.upsert_point(point.clone());
            if moved && shown != Some(point.position()) {
                binding::show_entity(state, kind, id);
            }
            point_edit::refresh_view(state, &point);
        }
        PersistReply::Area(area) => state.catalog.upsert_area(area),
        PersistReply::Path(path) => state.catalog.upsert_path(path),
        PersistReply::SecurityZone(zone) => state.catalog.upsert_zone(zone),
        other => log::warn!("Unerwartete Antwort beim Speichern: {:?}", other),
    }
}

/// Löscht die Entities gelöschter Layer.
pub fn delete_layers(state: &mut AppState, layers: Vec<LayerId>) {
    for layer in layers {
        if state.geometry.discard_unbound(state.map.as_mut(), layer) {
            if state.ui.pending_point.is_some_and(|p| p.layer == layer) {
                state.ui.pending_point = None;
            }
            continue;
        }
        let Some(binding) = state.geometry.binding_for_layer(layer).cloned() else {
            continue;
        };
        if state.ui.highlighted == Some(layer) {
            state.ui.highlighted = None;
        }
        state.geometry.unbind(state.map.as_mut(), binding.entity_id);
        issue_delete(state, binding.kind, binding.entity_id);
    }
}

/// Fordert das Löschen einer Entity an.
pub(super) fn issue_delete(state: &mut AppState, kind: ShapeKind, id: Uuid) {
    let request = match kind {
        ShapeKind::Point => PersistRequest::DeletePoint(id),
        ShapeKind::Area => PersistRequest::DeleteArea(id),
        ShapeKind::Path => PersistRequest::DeletePath(id),
        ShapeKind::SecurityZone => PersistRequest::DeleteSecurityZone(id),
    };
    log::info!("{:?} {} wird gelöscht", kind, id);
    let guard = state.event_guard();
    state
        .outbox
        .issue(request, guard, Awaiting::EntityDeleted { kind, id });
}

/// Entfernt die gelöschte Entity aus dem Katalog oder stellt sie wieder dar.
pub fn on_entity_deleted(
    state: &mut AppState,
    kind: ShapeKind,
    id: Uuid,
    outcome: Result<PersistReply, String>,
) {
    if let Err(message) = outcome {
        state.ui.error(format!(
            "{} konnte nicht gelöscht werden: {message}",
            kind_label(kind)
        ));
        log::error!("{:?} {} konnte nicht gelöscht werden: {}", kind, id, message);
        binding::show_entity(state, kind, id);
        return;
    }

    match kind {
        ShapeKind::Point => {
            state.catalog.remove_point(id);
            if state.refresh.suspended_for() == Some(id) {
                point_edit::end(state);
            }
        }
        ShapeKind::Area => {
            state.catalog.remove_area(id);
        }
        ShapeKind::Path => {
            state.catalog.remove_path(id);
        }
        ShapeKind::SecurityZone => {
            state.catalog.remove_zone(id);
            if state.ui.zone_edit.as_ref().is_some_and(|v| v.zone_id() == id) {
                zone_edit::close(state);
            }
        }
    }
    state.geometry.unbind(state.map.as_mut(), id);
}

/// Hebt einen Layer hervor und öffnet im Standard-Modus die passende Ansicht.
pub fn select_layer(state: &mut AppState, layer: LayerId) {
    if let Some(previous) = state.ui.highlighted.take() {
        binding::restore_style(state, previous);
    }
    let Some(binding) = state.geometry.binding_for_layer(layer).cloned() else {
        return;
    };

    let base = layers::entity_style(&state.options, &state.catalog, binding.kind, binding.entity_id);
    let style = layers::highlight_style(&state.options, base);
    state.map.set_layer_style(layer, style);
    state.ui.highlighted = Some(layer);

    if state.mode.mode_kind() != ModeKind::Standard {
        return;
    }
    match binding.kind {
        ShapeKind::SecurityZone => zone_edit::open(state, binding.entity_id),
        ShapeKind::Point => point_edit::begin(state, binding.entity_id),
        ShapeKind::Area | ShapeKind::Path => {}
    }
}

fn kind_label(kind: ShapeKind) -> &'static str {
    match kind {
        ShapeKind::Point => "Punkt",
        ShapeKind::Area => "Fläche",
        ShapeKind::Path => "Weg",
        ShapeKind::SecurityZone => "Sicherheitszone",
    }
}
