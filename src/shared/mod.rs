//! Geteilte Typen für schichtübergreifende Verträge.
//!
//! Enthält die Laufzeit-Optionen, die von `app` und dem Host-Binary
//! gleichermaßen gelesen werden.

pub mod options;

pub use options::PlannerOptions;
pub use options::{HIGHLIGHT_WEIGHT, LINE_WEIGHT, ZONE_WEIGHT};
