//! Gemeinsame Helfer: Entities aus dem Katalog auf die Karte bringen.

use uuid::Uuid;

use crate::app::layers;
use crate::app::{AppState, ShapeKind};
use crate::map::LayerId;

/// Zeichnet eine Entity aus dem Katalog neu.
///
/// Ist sie bereits gebunden, ersetzt der neue Layer den alten.
pub(super) fn show_entity(state: &mut AppState, kind: ShapeKind, id: Uuid) -> Option<LayerId> {
    let Some(spec) = layers::entity_layer(&state.options, &state.catalog, kind, id) else {
        log::warn!("{:?} {} nicht im Katalog, kein Layer", kind, id);
        return None;
    };
    let layer = state.map.add_layer(spec);
    if state.geometry.binding(id).is_some() {
        state.geometry.rebind(state.map.as_mut(), id, layer);
    } else {
        state.geometry.bind(state.map.as_mut(), id, kind, layer);
    }
    Some(layer)
}

/// Übernimmt einen gezeichneten Layer als Darstellung einer gespeicherten Entity.
pub(super) fn adopt_layer(state: &mut AppState, layer: LayerId, kind: ShapeKind, id: Uuid) {
    state.geometry.promote(state.map.as_mut(), layer, id, kind);
    let style = layers::entity_style(&state.options, &state.catalog, kind, id);
    state.map.set_layer_style(layer, style);
}

/// Setzt den Layer einer Entity auf den Basis-Stil zurück.
pub(super) fn restore_style(state: &mut AppState, layer: LayerId) {
    let Some(binding) = state.geometry.binding_for_layer(layer).cloned() else {
        return;
    };
    let style = layers::entity_style(&state.options, &state.catalog, binding.kind, binding.entity_id);
    state.map.set_layer_style(layer, style);
}
