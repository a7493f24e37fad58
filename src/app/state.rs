//! Application State: zentrale Datenhaltung.

mod app_state;
mod ui;

pub use app_state::AppState;
pub use ui::{Notice, NoticeLevel, PendingPoint, PointEditView, UiState};
