use uuid::Uuid;

use crate::app::{AppCommand, AppIntent, AppState};
use crate::core::Event;
use crate::map::{DrawKind, HeadlessMap, LayerId};

use super::map_intent_to_commands;

fn state() -> (HeadlessMap, AppState) {
    let map = HeadlessMap::new();
    let state = AppState::new(Box::new(map.clone()));
    (map, state)
}

#[test]
fn shape_drawn_in_idle_is_discarded() {
    let (_, state) = state();

    let commands = map_intent_to_commands(
        &state,
        AppIntent::ShapeDrawn {
            layer: LayerId(1),
            kind: DrawKind::Polygon,
        },
    );

    assert_eq!(commands.len(), 1);
    assert!(matches!(
        commands[0],
        AppCommand::DiscardLayer { layer: LayerId(1) }
    ));
}

#[test]
fn shape_drawn_in_standard_is_routed_by_kind() {
    let (mut map, mut state) = state();
    state.mode.enter_standard(&mut map, Uuid::new_v4());

    let marker = map_intent_to_commands(
        &state,
        AppIntent::ShapeDrawn {
            layer: LayerId(1),
            kind: DrawKind::Marker,
        },
    );
    let polygon = map_intent_to_commands(
        &state,
        AppIntent::ShapeDrawn {
            layer: LayerId(2),
            kind: DrawKind::Polygon,
        },
    );
    let polyline = map_intent_to_commands(
        &state,
        AppIntent::ShapeDrawn {
            layer: LayerId(3),
            kind: DrawKind::Polyline,
        },
    );

    assert!(matches!(marker[0], AppCommand::BeginPointPlacement { .. }));
    assert!(matches!(polygon[0], AppCommand::CreateArea { .. }));
    assert!(matches!(polyline[0], AppCommand::CreateEquipmentPath { .. }));
}

#[test]
fn shape_drawn_during_event_creation_goes_to_workflow() {
    let (mut map, mut state) = state();
    state
        .mode
        .start_event_creation(&mut map, Event::new("Trail", None, None))
        .expect("Event-Anlage sollte starten");

    let commands = map_intent_to_commands(
        &state,
        AppIntent::ShapeDrawn {
            layer: LayerId(9),
            kind: DrawKind::Polyline,
        },
    );

    assert!(matches!(
        commands[0],
        AppCommand::AdvanceEventCreation { layer: LayerId(9) }
    ));
}

#[test]
fn edits_outside_standard_are_ignored() {
    let (_, state) = state();

    let commands = map_intent_to_commands(
        &state,
        AppIntent::ShapesEdited {
            layers: vec![LayerId(1)],
        },
    );

    assert!(commands.is_empty());
}

#[test]
fn equipment_picked_without_open_picker_does_nothing() {
    let (_, state) = state();

    let commands = map_intent_to_commands(
        &state,
        AppIntent::EquipmentPicked {
            equipment_id: Uuid::new_v4(),
        },
    );

    assert!(commands.is_empty());
}

#[test]
fn equipment_picked_closes_picker_then_starts_zone() {
    let (_, mut state) = state();
    let point_id = Uuid::new_v4();
    let equipment_id = Uuid::new_v4();
    state.ui.equipment_picker = Some(point_id);

    let commands = map_intent_to_commands(&state, AppIntent::EquipmentPicked { equipment_id });

    assert_eq!(commands.len(), 2);
    assert!(matches!(commands[0], AppCommand::CloseEquipmentPicker));
    assert!(matches!(
        commands[1],
        AppCommand::StartSecurityZone { point_id: p, equipment_id: e } if p == point_id && e == equipment_id
    ));
}
