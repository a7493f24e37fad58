//! Sichtbarkeitsfilter pro Kategorie.
//!
//! Jede Kategorie hat entweder keinen Filter (alles sichtbar) oder eine
//! Allow-Liste sichtbarer IDs. Filter ändern nur die Sichtbarkeit gebundener
//! Layer, niemals Bindungen oder Persistenz.

use std::collections::HashMap;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::catalog::EventCatalog;
use super::geometry_store::GeometryStore;
use crate::map::MapSurface;

/// Filter-Kategorie der Seitenleiste
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterCategory {
    /// Reguläre Punkte
    Points,
    /// Points of Interest
    PointsOfInterest,
    /// Flächen
    Areas,
    /// Benannte Wege (inkl. Event-Tracé)
    NamedPaths,
    /// Sicherheitszonen
    SecurityZones,
    /// Equipment-Linien (`Chemin …`)
    EquipmentPaths,
}

impl FilterCategory {
    /// Alle Kategorien
    pub const ALL: [FilterCategory; 6] = [
        FilterCategory::Points,
        FilterCategory::PointsOfInterest,
        FilterCategory::Areas,
        FilterCategory::NamedPaths,
        FilterCategory::SecurityZones,
        FilterCategory::EquipmentPaths,
    ];
}

/// Aktive Sichtbarkeitsfilter
#[derive(Debug, Clone, Default)]
pub struct VisibilityFilters {
    filters: HashMap<FilterCategory, IndexSet<Uuid>>,
}

impl VisibilityFilters {
    /// Erstellt Filter ohne Einschränkung.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow-Liste einer Kategorie (None = alles sichtbar)
    pub fn filter(&self, category: FilterCategory) -> Option<&IndexSet<Uuid>> {
        self.filters.get(&category)
    }

    /// Ist die Entity laut Filter sichtbar?
    pub fn is_visible(&self, category: FilterCategory, id: Uuid) -> bool {
        self.filters
            .get(&category)
            .is_none_or(|allowed| allowed.contains(&id))
    }

    /// Sind alle Mitglieder der Kategorie auf der Karte sichtbar?
    ///
    /// Maßgeblich ist der Store; ungebundene Mitglieder zählen nach Filter.
    pub fn all_visible(
        &self,
        category: FilterCategory,
        catalog: &EventCatalog,
        store: &GeometryStore,
    ) -> bool {
        catalog.members(category).iter().all(|id| {
            store
                .is_visible(*id)
                .unwrap_or_else(|| self.is_visible(category, *id))
        })
    }

    /// Entfernt alle Filter (z.B. bei Event-Wechsel)
    pub fn reset(&mut self) {
        self.filters.clear();
    }

    /// Setzt den Filter einer Kategorie von außen (z.B. Suche in der Seitenleiste).
    pub fn set_filter(
        &mut self,
        category: FilterCategory,
        ids: Option<Vec<Uuid>>,
        catalog: &EventCatalog,
        store: &mut GeometryStore,
        map: &mut dyn MapSurface,
    ) {
        match ids {
            Some(ids) => {
                self.filters.insert(category, ids.into_iter().collect());
            }
            None => {
                self.filters.remove(&category);
            }
        }
        self.apply_category(category, catalog, store, map);
    }

    /// Schaltet eine ganze Kategorie um.
    ///
    /// Sind alle Mitglieder sichtbar, werden alle ausgeblendet, sonst alle
    /// eingeblendet. Equipment-Linien ziehen die Sicherheitszonen mit.
    /// Gibt den neuen Zielzustand zurück.
    pub fn toggle_category(
        &mut self,
        category: FilterCategory,
        catalog: &EventCatalog,
        store: &mut GeometryStore,
        map: &mut dyn MapSurface,
    ) -> bool {
        let target = !self.all_visible(category, catalog, store);
        let members = catalog.members(category);
        self.set_members(category, &members, &members, target);
        self.apply_category(category, catalog, store, map);

        if category == FilterCategory::EquipmentPaths {
            let zones = catalog.members(FilterCategory::SecurityZones);
            self.set_members(FilterCategory::SecurityZones, &zones, &zones, target);
            self.apply_category(FilterCategory::SecurityZones, catalog, store, map);
        }

        log::info!(
            "Kategorie {:?} {}",
            category,
            if target { "eingeblendet" } else { "ausgeblendet" }
        );
        target
    }

    /// Schaltet eine einzelne Entity um. Gibt den neuen Zustand zurück.
    pub fn toggle_item(
        &mut self,
        category: FilterCategory,
        id: Uuid,
        catalog: &EventCatalog,
        store: &mut GeometryStore,
        map: &mut dyn MapSurface,
    ) -> bool {
        let target = !self.is_visible(category, id);
        let members = catalog.members(category);
        self.set_members(category, &members, &[id], target);
        store.set_visible(map, id, target);
        target
    }

    /// Wendet alle Filter erneut an (nach Änderungen im Store).
    pub fn reapply(
        &self,
        catalog: &EventCatalog,
        store: &mut GeometryStore,
        map: &mut dyn MapSurface,
    ) {
        for category in FilterCategory::ALL {
            self.apply_category(category, catalog, store, map);
        }
    }

    fn apply_category(
        &self,
        category: FilterCategory,
        catalog: &EventCatalog,
        store: &mut GeometryStore,
        map: &mut dyn MapSurface,
    ) {
        for id in catalog.members(category) {
            store.set_visible(map, id, self.is_visible(category, id));
        }
    }

    /// Setzt `ids` auf `visible`; eine Liste, die wieder alle Mitglieder
    /// abdeckt, fällt auf "kein Filter" zurück.
    fn set_members(
        &mut self,
        category: FilterCategory,
        members: &[Uuid],
        ids: &[Uuid],
        visible: bool,
    ) {
        let mut allowed: IndexSet<Uuid> = match self.filters.get(&category) {
            Some(list) => list.clone(),
            None => members.iter().copied().collect(),
        };
        if visible {
            allowed.extend(ids.iter().copied());
        } else {
            for id in ids {
                allowed.shift_remove(id);
            }
        }

        if members.iter().all(|id| allowed.contains(id)) {
            self.filters.remove(&category);
        } else {
            self.filters.insert(category, allowed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::geometry_store::ShapeKind;
    use crate::core::{RoutePath, SecurityZone};
    use crate::map::{DrawKind, HeadlessMap};
    use chrono::Utc;

    struct Fixture {
        map: HeadlessMap,
        store: GeometryStore,
        catalog: EventCatalog,
        filters: VisibilityFilters,
    }

    fn path(event_id: Uuid, name: &str) -> RoutePath {
        RoutePath::new(
            event_id,
            name.to_string(),
            "#a91a1a".into(),
            (5.0, 3.0),
            "{}".into(),
            Utc::now(),
        )
    }

    fn zone(event_id: Uuid) -> SecurityZone {
        SecurityZone {
            id: Uuid::new_v4(),
            event_id,
            equipment_id: Uuid::new_v4(),
            quantity: 1,
            comment: None,
            installation_date: None,
            removal_date: None,
            geo_json: "{}".into(),
            installation_team_id: None,
            removal_team_id: None,
        }
    }

    /// Zwei Equipment-Linien, ein benannter Weg, drei Sicherheitszonen
    fn fixture() -> Fixture {
        let mut map = HeadlessMap::new();
        let mut store = GeometryStore::new();
        let mut catalog = EventCatalog::default();
        let event_id = Uuid::new_v4();

        for name in ["Chemin 01/01/2026 10:00:00", "Chemin 01/01/2026 10:05:00", "Parcours"] {
            let p = path(event_id, name);
            let layer = map.draw(DrawKind::Polyline, "{}");
            store.bind(&mut map, p.id, ShapeKind::Path, layer);
            catalog.paths.push(p);
        }
        for _ in 0..3 {
            let z = zone(event_id);
            let layer = map.draw(DrawKind::Polyline, "{}");
            store.bind(&mut map, z.id, ShapeKind::SecurityZone, layer);
            catalog.zones.push(z);
        }

        Fixture {
            map,
            store,
            catalog,
            filters: VisibilityFilters::new(),
        }
    }

    fn visible_ids(f: &Fixture, category: FilterCategory) -> Vec<Uuid> {
        f.catalog
            .members(category)
            .into_iter()
            .filter(|id| f.store.is_visible(*id) == Some(true))
            .collect()
    }

    #[test]
    fn test_equipment_toggle_couples_security_zones() {
        let mut f = fixture();
        let target = f.filters.toggle_category(
            FilterCategory::EquipmentPaths,
            &f.catalog,
            &mut f.store,
            &mut f.map,
        );
        assert!(!target);
        assert!(visible_ids(&f, FilterCategory::EquipmentPaths).is_empty());
        assert!(visible_ids(&f, FilterCategory::SecurityZones).is_empty());
        assert_eq!(visible_ids(&f, FilterCategory::NamedPaths).len(), 1);
        assert_eq!(f.store.len(), 6, "Ausblenden darf nichts entbinden");

        let target = f.filters.toggle_category(
            FilterCategory::EquipmentPaths,
            &f.catalog,
            &mut f.store,
            &mut f.map,
        );
        assert!(target);
        assert_eq!(visible_ids(&f, FilterCategory::SecurityZones).len(), 3);
        assert!(f.filters.filter(FilterCategory::SecurityZones).is_none());
    }

    #[test]
    fn test_double_toggle_restores_uniform_state() {
        let mut f = fixture();
        for _ in 0..2 {
            f.filters.toggle_category(
                FilterCategory::SecurityZones,
                &f.catalog,
                &mut f.store,
                &mut f.map,
            );
        }
        assert_eq!(visible_ids(&f, FilterCategory::SecurityZones).len(), 3);
        assert!(f.filters.filter(FilterCategory::SecurityZones).is_none());
    }

    #[test]
    fn test_partial_category_toggles_to_all_visible() {
        let mut f = fixture();
        let first = f.catalog.zones[0].id;
        let shown = f.filters.toggle_item(
            FilterCategory::SecurityZones,
            first,
            &f.catalog,
            &mut f.store,
            &mut f.map,
        );
        assert!(!shown);
        assert_eq!(
            f.filters.filter(FilterCategory::SecurityZones).map(|l| l.len()),
            Some(2)
        );

        let target = f.filters.toggle_category(
            FilterCategory::SecurityZones,
            &f.catalog,
            &mut f.store,
            &mut f.map,
        );
        assert!(target, "Teilweise sichtbar sollte alles einblenden");
        assert_eq!(visible_ids(&f, FilterCategory::SecurityZones).len(), 3);
    }

    #[test]
    fn test_category_toggle_reads_visibility_from_store() {
        let mut f = fixture();
        let hidden = f.catalog.zones[2].id;
        f.store.set_visible(&mut f.map, hidden, false);
        assert!(f.filters.filter(FilterCategory::SecurityZones).is_none());

        let target = f.filters.toggle_category(
            FilterCategory::SecurityZones,
            &f.catalog,
            &mut f.store,
            &mut f.map,
        );
        assert!(target, "Ausgeblendeter Layer sollte wieder eingeblendet werden");
        assert_eq!(f.store.is_visible(hidden), Some(true));
    }

    #[test]
    fn test_item_toggle_collapses_to_no_filter() {
        let mut f = fixture();
        let id = f.catalog.zones[1].id;
        for _ in 0..2 {
            f.filters.toggle_item(
                FilterCategory::SecurityZones,
                id,
                &f.catalog,
                &mut f.store,
                &mut f.map,
            );
        }
        assert!(f.filters.filter(FilterCategory::SecurityZones).is_none());
        assert_eq!(f.store.is_visible(id), Some(true));
    }

    #[test]
    fn test_set_filter_and_reapply_after_new_binding() {
        let mut f = fixture();
        let keep = f.catalog.zones[0].id;
        f.filters.set_filter(
            FilterCategory::SecurityZones,
            Some(vec![keep]),
            &f.catalog,
            &mut f.store,
            &mut f.map,
        );
        assert_eq!(visible_ids(&f, FilterCategory::SecurityZones), vec![keep]);

        let late = zone(Uuid::new_v4());
        let layer = f.map.draw(DrawKind::Polyline, "{}");
        f.store.bind(&mut f.map, late.id, ShapeKind::SecurityZone, layer);
        f.catalog.zones.push(late.clone());
        assert_eq!(f.store.is_visible(late.id), Some(true));

        f.filters.reapply(&f.catalog, &mut f.store, &mut f.map);
        assert_eq!(f.store.is_visible(late.id), Some(false));
    }
}
