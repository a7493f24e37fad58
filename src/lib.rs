//! Event Planner Map Library.
//! Zeichen- und Synchronisations-Engine der Event-Karte, als Library exportiert
//! für Tests, Benchmarks und den Replay-Host.

pub mod app;
pub mod backend;
pub mod core;
pub mod map;
pub mod shared;

pub use app::{
    AppCommand, AppController, AppIntent, AppState, FilterCategory, ModeKind, ShapeKind,
    UiState, WorkflowError,
};
pub use backend::{EntityBackend, MemoryBackend, MemorySeed, Repository};
pub use core::{Area, Equipment, Event, Picture, Point, RoutePath, SecurityZone};
pub use map::{DrawKind, HeadlessMap, LayerId, MapSurface};
pub use shared::PlannerOptions;
