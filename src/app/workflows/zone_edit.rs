//! Bearbeitungsansicht einer Sicherheitszone.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::steps::{FailurePolicy, StepPlan};
use crate::core::{metrics, Equipment, SecurityZone, TeamRole};

/// Speicher-Schritte der Bearbeitungsansicht
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneEditStep {
    /// Zone aktualisieren
    UpdateZone,
    /// Team zuweisen bzw. Zuweisung aufheben
    AssignTeam(TeamRole),
}

/// Editierbare Felder
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ZoneEditFields {
    /// Aufbau-Datum
    pub installation_date: Option<DateTime<Utc>>,
    /// Abbau-Datum
    pub removal_date: Option<DateTime<Utc>>,
    /// Stückzahl
    pub quantity: u32,
    /// Kommentar
    pub comment: String,
    /// Aufbau-Team
    pub installation_team_id: Option<Uuid>,
    /// Abbau-Team
    pub removal_team_id: Option<Uuid>,
}

impl ZoneEditFields {
    fn from_zone(zone: &SecurityZone) -> Self {
        Self {
            installation_date: zone.installation_date,
            removal_date: zone.removal_date,
            quantity: zone.quantity,
            comment: zone.comment.clone().unwrap_or_default(),
            installation_team_id: zone.installation_team_id,
            removal_team_id: zone.removal_team_id,
        }
    }

    fn team(&self, role: TeamRole) -> Option<Uuid> {
        match role {
            TeamRole::Installation => self.installation_team_id,
            TeamRole::Removal => self.removal_team_id,
        }
    }
}

/// Zustand der geöffneten Bearbeitungsansicht
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneEditView {
    /// Stand der Zone beim Öffnen
    pub original: SecurityZone,
    /// Aktuelle Eingaben
    pub fields: ZoneEditFields,
    /// Länge der Linie (nur Anzeige)
    pub length_m: f64,
    /// Vorgeschlagene Stückzahl (nur Anzeige, wird nie automatisch übernommen)
    pub suggested_quantity: u32,
    /// Speichern läuft
    pub saving: bool,
}

impl ZoneEditView {
    /// Öffnet die Ansicht für eine Zone.
    pub fn open(zone: &SecurityZone, equipment: Option<&Equipment>) -> Self {
        let length_m = metrics::length(&zone.geo_json);
        let suggested_quantity =
            metrics::quantity(length_m, equipment.and_then(Equipment::unit_length));
        Self {
            original: zone.clone(),
            fields: ZoneEditFields::from_zone(zone),
            length_m,
            suggested_quantity,
            saving: false,
        }
    }

    /// ID der Zone
    pub fn zone_id(&self) -> Uuid {
        self.original.id
    }

    /// Anzeige-Text der Länge
    pub fn length_label(&self) -> String {
        metrics::format_length(self.length_m)
    }

    /// Gibt es ungespeicherte Änderungen?
    pub fn has_changes(&self) -> bool {
        self.fields != ZoneEditFields::from_zone(&self.original)
    }

    /// Darf gespeichert werden?
    pub fn can_save(&self) -> bool {
        !self.saving
            && self.fields.installation_date.is_some()
            && self.fields.removal_date.is_some()
            && self.fields.quantity > 0
            && self.has_changes()
    }

    /// Überträgt die Eingaben auf den aktuellen Stand der Zone.
    ///
    /// Geometrie und alle nicht editierbaren Felder stammen aus `current`.
    pub fn draft(&self, current: &SecurityZone) -> SecurityZone {
        let comment = self.fields.comment.trim();
        SecurityZone {
            installation_date: self.fields.installation_date,
            removal_date: self.fields.removal_date,
            quantity: self.fields.quantity,
            comment: (!comment.is_empty()).then(|| comment.to_string()),
            installation_team_id: self.fields.installation_team_id,
            removal_team_id: self.fields.removal_team_id,
            ..current.clone()
        }
    }

    /// Zielteam einer Rolle
    pub fn team(&self, role: TeamRole) -> Option<Uuid> {
        self.fields.team(role)
    }

    /// Schrittfolge für das Speichern: Update, danach nur geänderte Team-Zuweisungen.
    pub fn save_plan(&self) -> StepPlan<ZoneEditStep> {
        let mut steps = vec![(ZoneEditStep::UpdateZone, FailurePolicy::AbortWorkflow)];
        for role in [TeamRole::Installation, TeamRole::Removal] {
            if self.fields.team(role) != self.original.team(role) {
                steps.push((ZoneEditStep::AssignTeam(role), FailurePolicy::AbortWorkflow));
            }
        }
        StepPlan::new(steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry;
    use crate::core::metrics::EARTH_RADIUS_M;
    use glam::DVec2;

    fn zone() -> SecurityZone {
        let d = (47.0 / EARTH_RADIUS_M).to_degrees();
        SecurityZone {
            id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            equipment_id: Uuid::new_v4(),
            quantity: 5,
            comment: Some("Gate 3".into()),
            installation_date: Some(Utc::now()),
            removal_date: Some(Utc::now()),
            geo_json: geometry::line_geojson(&[DVec2::ZERO, DVec2::new(d, 0.0)]),
            installation_team_id: None,
            removal_team_id: None,
        }
    }

    #[test]
    fn test_fresh_view_has_no_changes() {
        let view = ZoneEditView::open(&zone(), None);
        assert!(!view.has_changes());
        assert!(!view.can_save());
        assert_eq!(view.length_label(), "47.0 m");
        assert_eq!(view.suggested_quantity, 1);
    }

    #[test]
    fn test_can_save_requires_dates_and_quantity() {
        let mut view = ZoneEditView::open(&zone(), None);
        view.fields.quantity = 7;
        assert!(view.can_save());
        view.fields.quantity = 0;
        assert!(!view.can_save());
        view.fields.quantity = 7;
        view.fields.removal_date = None;
        assert!(!view.can_save());
    }

    #[test]
    fn test_save_plan_contains_only_changed_teams() {
        let mut view = ZoneEditView::open(&zone(), None);
        assert_eq!(view.save_plan().remaining(), 1);
        view.fields.removal_team_id = Some(Uuid::new_v4());
        let mut plan = view.save_plan();
        assert_eq!(plan.start_next(), Some(ZoneEditStep::UpdateZone));
        plan.succeed();
        assert_eq!(
            plan.start_next(),
            Some(ZoneEditStep::AssignTeam(TeamRole::Removal))
        );
    }

    #[test]
    fn test_draft_keeps_current_geometry() {
        let original = zone();
        let mut view = ZoneEditView::open(&original, None);
        view.fields.quantity = 9;
        view.fields.comment = "  ".into();

        let mut current = original.clone();
        current.geo_json = geometry::line_geojson(&[DVec2::ZERO, DVec2::new(0.001, 0.0)]);
        let draft = view.draft(&current);

        assert_eq!(draft.geo_json, current.geo_json);
        assert_eq!(draft.quantity, 9);
        assert_eq!(draft.comment, None);
    }

    #[test]
    fn test_suggested_quantity_uses_unit_length() {
        let equipment = Equipment {
            id: Uuid::new_v4(),
            kind: None,
            description: None,
            length: Some(10.0),
        };
        let view = ZoneEditView::open(&zone(), Some(&equipment));
        assert_eq!(view.suggested_quantity, 5);
    }
}
