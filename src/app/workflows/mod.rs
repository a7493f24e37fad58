//! Mehrstufige Arbeitsabläufe (Sicherheitszone zeichnen, Event anlegen).

pub mod event_creation;
pub mod security_zone;
pub mod steps;
pub mod zone_edit;

pub use event_creation::{
    CachedShape, CommitDrafts, EventCreationStep, EventCreationWorkflow, ModifyTarget,
};
pub use security_zone::{zone_step_plan, SecurityZoneDrawWorkflow, ZoneDrawPhase, ZoneStep};
pub use steps::{FailurePolicy, StepOutcome, StepPlan};
pub use zone_edit::{ZoneEditFields, ZoneEditStep, ZoneEditView};
