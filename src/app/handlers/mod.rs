//! Feature-Handler für AppCommand-Verarbeitung.
//!
//! Jeder Handler gruppiert die Command-Ausführung eines Feature-Bereichs.
//! Der Controller dispatcht an die passende Handler-Funktion; Backend-Antworten
//! laufen über `replies` zurück in den zuständigen Handler.

mod binding;
pub mod catalog;
pub mod drawing;
pub mod event_creation;
pub mod point_edit;
pub mod refresh;
pub mod replies;
pub mod security_zone;
pub mod visibility;
pub mod zone_edit;
