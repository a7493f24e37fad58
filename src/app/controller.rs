//! Application Controller für zentrale Event-Verarbeitung.

use super::{AppCommand, AppIntent, AppState};

/// Orchestriert Karten-, UI- und Backend-Events auf den AppState.
#[derive(Default)]
pub struct AppController;

impl AppController {
    /// Erstellt einen neuen Controller.
    pub fn new() -> Self {
        Self
    }

    /// Verarbeitet einen Intent über Intent->Command Mapping.
    pub fn handle_intent(&mut self, state: &mut AppState, intent: AppIntent) -> anyhow::Result<()> {
        let commands = self.map_intent_to_commands(state, intent);
        for command in commands {
            self.handle_command(state, command)?;
        }

        Ok(())
    }

    fn map_intent_to_commands(&self, state: &AppState, intent: AppIntent) -> Vec<AppCommand> {
        super::intent_mapping::map_intent_to_commands(state, intent)
    }

    /// Führt mutierende Commands auf dem AppState aus.
    /// Dispatcht an Feature-Handler in `handlers/`.
    pub fn handle_command(
        &mut self,
        state: &mut AppState,
        command: AppCommand,
    ) -> anyhow::Result<()> {
        state.command_log.record(&command);
        use super::handlers;

        match command {
            // === Stammdaten & Auswahl ===
            AppCommand::LoadCatalog => handlers::catalog::load_catalog(state),
            AppCommand::SelectEvent { event_id } => {
                handlers::catalog::select_event(state, event_id)
            }
            AppCommand::DiscardLayer { layer } => handlers::drawing::discard_layer(state, layer),

            // === Standard-Zeichnen ===
            AppCommand::BeginPointPlacement { layer } => {
                handlers::drawing::begin_point_placement(state, layer)
            }
            AppCommand::CreatePendingPoint {
                is_point_of_interest,
            } => handlers::drawing::create_pending_point(state, is_point_of_interest),
            AppCommand::DiscardPendingPoint => handlers::drawing::discard_pending_point(state),
            AppCommand::CreateArea { layer } => handlers::drawing::create_area(state, layer),
            AppCommand::CreateEquipmentPath { layer } => {
                handlers::drawing::create_equipment_path(state, layer)
            }
            AppCommand::SyncEditedLayers { layers } => {
                handlers::drawing::sync_edited_layers(state, layers)
            }
            AppCommand::DeleteLayers { layers } => handlers::drawing::delete_layers(state, layers),
            AppCommand::SelectLayer { layer } => handlers::drawing::select_layer(state, layer),
            AppCommand::RejectShape { layer, kind } => {
                handlers::drawing::reject_shape(state, layer, kind)
            }

            // === Sicherheitszone ===
            AppCommand::RequestSecurityZone { point_id } => {
                handlers::security_zone::request(state, point_id)
            }
            AppCommand::StartSecurityZone {
                point_id,
                equipment_id,
            } => handlers::security_zone::start(state, point_id, equipment_id),
            AppCommand::CloseEquipmentPicker => handlers::security_zone::close_picker(state),
            AppCommand::CompleteSecurityZoneDraw { layer } => {
                handlers::security_zone::complete_draw(state, layer)
            }
            AppCommand::StopSecurityZone => handlers::security_zone::stop(state),

            // === Event-Anlage ===
            AppCommand::StartEventCreation { event } => {
                handlers::event_creation::start(state, event)
            }
            AppCommand::AdvanceEventCreation { layer } => {
                handlers::event_creation::advance(state, layer)
            }
            AppCommand::RequestEventModification { target } => {
                handlers::event_creation::request_modification(state, target)
            }
            AppCommand::FinishEventModification => {
                handlers::event_creation::finish_modification(state)
            }
            AppCommand::CommitEventCreation => handlers::event_creation::commit(state),
            AppCommand::CancelEventCreation => handlers::event_creation::cancel(state),

            // === Zonen-Bearbeitung ===
            AppCommand::OpenZoneEdit { zone_id } => handlers::zone_edit::open(state, zone_id),
            AppCommand::UpdateZoneEdit { fields } => handlers::zone_edit::update(state, fields),
            AppCommand::SaveZoneEdit => handlers::zone_edit::save(state),
            AppCommand::CloseZoneEdit => handlers::zone_edit::close(state),
            AppCommand::DeleteEditedZone => handlers::zone_edit::delete(state),

            // === Punkt-Bearbeitung ===
            AppCommand::BeginPointEdit { point_id } => {
                handlers::point_edit::begin(state, point_id)
            }
            AppCommand::SavePoint { point } => handlers::point_edit::save(state, point),
            AppCommand::EndPointEdit => handlers::point_edit::end(state),

            // === Sichtbarkeit ===
            AppCommand::ToggleCategory { category } => {
                handlers::visibility::toggle_category(state, category)
            }
            AppCommand::ToggleItem { category, id } => {
                handlers::visibility::toggle_item(state, category, id)
            }
            AppCommand::SetCategoryFilter { category, ids } => {
                handlers::visibility::set_filter(state, category, ids)
            }

            // === System ===
            AppCommand::RefreshPointsIfDue { now } => {
                handlers::refresh::refresh_if_due(state, now)
            }
            AppCommand::ApplyReply { id, outcome } => {
                handlers::replies::apply(state, id, outcome)
            }
            AppCommand::DismissNotices => state.ui.dismiss_notices(),
        }

        // Neue oder ersetzte Layer übernehmen die aktiven Filter
        state.sync_visibility();

        Ok(())
    }
}
