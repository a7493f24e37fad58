//! Handler für die Sichtbarkeitsfilter der Seitenleiste.

use uuid::Uuid;

use crate::app::{AppState, FilterCategory};

/// Schaltet eine Kategorie um.
pub fn toggle_category(state: &mut AppState, category: FilterCategory) {
    state.visibility.toggle_category(
        category,
        &state.catalog,
        &mut state.geometry,
        state.map.as_mut(),
    );
}

/// Schaltet eine einzelne Entity um.
pub fn toggle_item(state: &mut AppState, category: FilterCategory, id: Uuid) {
    let visible = state.visibility.toggle_item(
        category,
        id,
        &state.catalog,
        &mut state.geometry,
        state.map.as_mut(),
    );
    log::debug!("{:?} {} sichtbar: {}", category, id, visible);
}

/// Setzt den Filter einer Kategorie (None = alle sichtbar).
pub fn set_filter(state: &mut AppState, category: FilterCategory, ids: Option<Vec<Uuid>>) {
    state.visibility.set_filter(
        category,
        ids,
        &state.catalog,
        &mut state.geometry,
        state.map.as_mut(),
    );
}
