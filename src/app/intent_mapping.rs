//! Übersetzt Intents in Commands.
//!
//! Karten-Ereignisse werden hier nach dem aktiven Modus verteilt: nur der
//! aktive Modus erhält gezeichnete, bearbeitete oder gelöschte Formen.

use super::mode::ModeKind;
use super::{AppCommand, AppIntent, AppState};
use crate::map::{DrawKind, LayerId};

/// Mappt einen Intent auf eine Folge von Commands (ohne Zustand zu ändern).
pub fn map_intent_to_commands(state: &AppState, intent: AppIntent) -> Vec<AppCommand> {
    let mode = state.mode.mode_kind();

    match intent {
        AppIntent::StartupRequested => vec![AppCommand::LoadCatalog],
        AppIntent::EventSelected { event_id } => vec![AppCommand::SelectEvent { event_id }],

        AppIntent::ShapeDrawn { layer, kind } => map_shape_drawn(mode, layer, kind),
        AppIntent::ShapesEdited { layers } if mode == ModeKind::Standard => {
            vec![AppCommand::SyncEditedLayers { layers }]
        }
        AppIntent::ShapesDeleted { layers } if mode == ModeKind::Standard => {
            vec![AppCommand::DeleteLayers { layers }]
        }
        AppIntent::ShapesEdited { .. } | AppIntent::ShapesDeleted { .. } => {
            log::debug!("Bearbeitung im Modus {:?} ignoriert", mode);
            vec![]
        }
        AppIntent::LayerClicked { layer } => vec![AppCommand::SelectLayer { layer }],

        AppIntent::PointTypeChosen {
            is_point_of_interest,
        } if state.ui.pending_point.is_some() => vec![AppCommand::CreatePendingPoint {
            is_point_of_interest,
        }],
        AppIntent::PointTypeChosen { .. } => vec![],
        AppIntent::PointTypeCancelled => vec![AppCommand::DiscardPendingPoint],

        AppIntent::SecurityZoneRequested { point_id } => {
            vec![AppCommand::RequestSecurityZone { point_id }]
        }
        AppIntent::EquipmentPicked { equipment_id } => match state.ui.equipment_picker {
            Some(point_id) => vec![
                AppCommand::CloseEquipmentPicker,
                AppCommand::StartSecurityZone {
                    point_id,
                    equipment_id,
                },
            ],
            None => vec![],
        },
        AppIntent::EquipmentPickerCancelled => vec![AppCommand::CloseEquipmentPicker],
        AppIntent::SecurityZoneDrawCancelled => vec![AppCommand::StopSecurityZone],

        AppIntent::EventCreationStarted { event } => {
            vec![AppCommand::StartEventCreation { event }]
        }
        AppIntent::EventModificationRequested { target } => {
            vec![AppCommand::RequestEventModification { target }]
        }
        AppIntent::EventModificationFinished => vec![AppCommand::FinishEventModification],
        AppIntent::EventCreationConfirmed => vec![AppCommand::CommitEventCreation],
        AppIntent::EventCreationCancelled => vec![AppCommand::CancelEventCreation],

        AppIntent::ZoneEditChanged { fields } => vec![AppCommand::UpdateZoneEdit { fields }],
        AppIntent::ZoneEditSaved => vec![AppCommand::SaveZoneEdit],
        AppIntent::ZoneEditClosed => vec![AppCommand::CloseZoneEdit],
        AppIntent::ZoneDeleteRequested => vec![AppCommand::DeleteEditedZone],

        AppIntent::PointEditStarted { point_id } => vec![AppCommand::BeginPointEdit { point_id }],
        AppIntent::PointEditSaved { point } => vec![AppCommand::SavePoint { point }],
        AppIntent::PointEditEnded => vec![AppCommand::EndPointEdit],

        AppIntent::CategoryVisibilityToggled { category } => {
            vec![AppCommand::ToggleCategory { category }]
        }
        AppIntent::ItemVisibilityToggled { category, id } => {
            vec![AppCommand::ToggleItem { category, id }]
        }
        AppIntent::CategoryFilterSet { category, ids } => {
            vec![AppCommand::SetCategoryFilter { category, ids }]
        }

        AppIntent::Tick { now } => vec![AppCommand::RefreshPointsIfDue { now }],
        AppIntent::RequestFinished { id, outcome } => vec![AppCommand::ApplyReply { id, outcome }],
        AppIntent::NoticesDismissed => vec![AppCommand::DismissNotices],
    }
}

/// Verteilt eine gezeichnete Form an den aktiven Modus.
fn map_shape_drawn(mode: ModeKind, layer: LayerId, kind: DrawKind) -> Vec<AppCommand> {
    let command = match (mode, kind) {
        (ModeKind::Idle, _) => AppCommand::DiscardLayer { layer },
        (ModeKind::Standard, DrawKind::Marker) => AppCommand::BeginPointPlacement { layer },
        (ModeKind::Standard, DrawKind::Polygon) => AppCommand::CreateArea { layer },
        (ModeKind::Standard, DrawKind::Polyline) => AppCommand::CreateEquipmentPath { layer },
        (ModeKind::ZoneCreationDrawing, DrawKind::Polyline) => {
            AppCommand::CompleteSecurityZoneDraw { layer }
        }
        (ModeKind::ZoneCreationDrawing, _) => AppCommand::RejectShape { layer, kind },
        (ModeKind::EventCreationFlow, _) => AppCommand::AdvanceEventCreation { layer },
    };
    vec![command]
}

#[cfg(test)]
mod tests;
