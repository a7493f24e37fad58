//! Application-Layer: Controller, State, Events, Abläufe und Handler.

pub mod catalog;
pub mod command_log;
pub mod controller;
pub mod error;
pub mod events;
pub mod geometry_store;
pub mod handlers;
mod intent_mapping;
pub mod layers;
pub mod mode;
pub mod outbox;
pub mod refresh;
/// Application State und Controller
///
/// Dieses Modul verwaltet den Zustand der Anwendung (Event, Layer, Abläufe, Ansichten).
pub mod state;
pub mod visibility;
pub mod workflows;

pub use catalog::EventCatalog;
pub use command_log::CommandLog;
pub use controller::AppController;
pub use error::WorkflowError;
pub use events::{AppCommand, AppIntent};
pub use geometry_store::{GeometryStore, LayerBinding, ShapeKind, StoreChange};
pub use mode::{DrawingMode, DrawingModeController, ModeChange, ModeKind};
pub use outbox::{
    Awaiting, EventData, Guard, OutgoingRequest, Outbox, PersistReply, PersistRequest,
    RequestId, RequestKind,
};
pub use refresh::RefreshScheduler;
pub use state::{AppState, Notice, NoticeLevel, PendingPoint, PointEditView, UiState};
pub use visibility::{FilterCategory, VisibilityFilters};
