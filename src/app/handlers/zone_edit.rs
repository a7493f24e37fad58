//! Handler für die Bearbeitungsansicht einer Sicherheitszone.

use uuid::Uuid;

use super::drawing;
use crate::app::outbox::{Awaiting, PersistReply, PersistRequest};
use crate::app::workflows::{StepPlan, ZoneEditFields, ZoneEditStep, ZoneEditView};
use crate::app::{AppState, ShapeKind, WorkflowError};
use crate::core::SecurityZone;

/// Öffnet die Ansicht für eine Zone.
pub fn open(state: &mut AppState, zone_id: Uuid) {
    let Some(zone) = state.catalog.zone(zone_id).cloned() else {
        state.ui.report(&WorkflowError::StaleReference {
            kind: "Sicherheitszone",
            id: zone_id,
        });
        return;
    };
    let equipment = state.find_equipment(zone.equipment_id);
    state.ui.zone_edit = Some(ZoneEditView::open(&zone, equipment));
}

/// Übernimmt die Eingaben der Ansicht.
pub fn update(state: &mut AppState, fields: ZoneEditFields) {
    match state.ui.zone_edit.as_mut() {
        Some(view) if !view.saving => view.fields = fields,
        Some(_) => log::debug!("Eingaben während des Speicherns ignoriert"),
        None => log::debug!("Keine Zonen-Bearbeitung offen"),
    }
}

/// Speichert die Zone, danach geänderte Team-Zuweisungen.
///
/// Geometrie und nicht editierbare Felder kommen aus dem aktuellen Katalog-Stand.
pub fn save(state: &mut AppState) {
    let guard = state.event_guard();
    let Some(view) = state.ui.zone_edit.as_mut() else {
        return;
    };
    if !view.can_save() {
        if !view.saving {
            state.ui.warn("Bitte Daten und Stückzahl prüfen");
        }
        return;
    }
    let Some(current) = state.catalog.zone(view.zone_id()).cloned() else {
        let id = view.zone_id();
        state.ui.zone_edit = None;
        state.ui.report(&WorkflowError::StaleReference {
            kind: "Sicherheitszone",
            id,
        });
        return;
    };

    view.saving = true;
    let draft = view.draft(&current);
    let update = SecurityZone {
        installation_team_id: current.installation_team_id,
        removal_team_id: current.removal_team_id,
        ..draft.clone()
    };
    let mut plan = view.save_plan();
    plan.start_next();

    log::info!("Sicherheitszone {} wird gespeichert", draft.id);
    state.outbox.issue(
        PersistRequest::UpdateSecurityZone(update),
        guard,
        Awaiting::ZoneEdit { plan, draft },
    );
}

/// Verarbeitet die Antwort auf einen Speicher-Schritt.
pub fn on_step_finished(
    state: &mut AppState,
    mut plan: StepPlan<ZoneEditStep>,
    draft: SecurityZone,
    outcome: Result<PersistReply, String>,
) {
    let Some(step) = plan.current() else {
        return;
    };

    match outcome {
        Ok(reply) => {
            plan.succeed();
            if let Some(zone) = reply.into_security_zone() {
                state.catalog.upsert_zone(zone);
            }
        }
        Err(message) => {
            plan.fail();
            let what = match step {
                ZoneEditStep::UpdateZone => "Sicherheitszone",
                ZoneEditStep::AssignTeam(_) => "Team-Zuweisung",
            };
            state
                .ui
                .report(&WorkflowError::Persistence { what, message });
            if let Some(view) = state.ui.zone_edit.as_mut() {
                view.saving = false;
            }
            return;
        }
    }

    match plan.start_next() {
        Some(ZoneEditStep::AssignTeam(role)) => {
            let guard = state.event_guard();
            state.outbox.issue(
                PersistRequest::AssignTeam {
                    zone_id: draft.id,
                    role,
                    team_id: draft.team(role),
                },
                guard,
                Awaiting::ZoneEdit { plan, draft },
            );
        }
        Some(ZoneEditStep::UpdateZone) | None => {
            log::info!("Sicherheitszone {} gespeichert", draft.id);
            if state
                .ui
                .zone_edit
                .as_ref()
                .is_some_and(|v| v.zone_id() == draft.id)
            {
                state.ui.zone_edit = None;
            }
            state.ui.info("Sicherheitszone gespeichert");
        }
    }
}

/// Schließt die Ansicht ohne zu speichern.
pub fn close(state: &mut AppState) {
    state.ui.zone_edit = None;
}

/// Löscht die bearbeitete Zone.
pub fn delete(state: &mut AppState) {
    let Some(view) = state.ui.zone_edit.take() else {
        return;
    };
    let zone_id = view.zone_id();
    if state
        .ui
        .highlighted
        .is_some_and(|layer| state.geometry.layer_of(zone_id) == Some(layer))
    {
        state.ui.highlighted = None;
    }
    state.geometry.unbind(state.map.as_mut(), zone_id);
    drawing::issue_delete(state, ShapeKind::SecurityZone, zone_id);
}
