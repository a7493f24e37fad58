use std::sync::mpsc::Receiver;

use uuid::Uuid;

use crate::app::catalog::EventCatalog;
use crate::app::geometry_store::{GeometryStore, StoreChange};
use crate::app::mode::DrawingModeController;
use crate::app::outbox::{Guard, Outbox};
use crate::app::refresh::RefreshScheduler;
use crate::app::visibility::VisibilityFilters;
use crate::app::CommandLog;
use crate::core::{Equipment, Event};
use crate::map::MapSurface;
use crate::shared::PlannerOptions;

use super::UiState;

/// Hauptzustand der Anwendung
pub struct AppState {
    /// Karten-Bibliothek
    pub map: Box<dyn MapSurface>,
    /// Laufzeit-Optionen (Farben, Stärken, Intervalle)
    pub options: PlannerOptions,
    /// Alle bekannten Events
    pub events: Vec<Event>,
    /// Equipment-Katalog
    pub equipment: Vec<Equipment>,
    /// Entities des ausgewählten Events
    pub catalog: EventCatalog,
    /// Layer-Bindungen
    pub geometry: GeometryStore,
    /// Sichtbarkeitsfilter
    pub visibility: VisibilityFilters,
    /// Zeichenmodus
    pub mode: DrawingModeController,
    /// Ausgehende Anfragen
    pub outbox: Outbox,
    /// Periodische Punkt-Aktualisierung
    pub refresh: RefreshScheduler,
    /// UI-State
    pub ui: UiState,
    /// Verlauf ausgeführter Commands
    pub command_log: CommandLog,
    /// Zähler der Event-Auswahl (für Guards event-bezogener Antworten)
    pub event_epoch: u64,
    store_changes: Receiver<StoreChange>,
}

impl AppState {
    /// Erstellt einen leeren App-State mit Standard-Optionen.
    pub fn new(map: Box<dyn MapSurface>) -> Self {
        Self::with_options(map, PlannerOptions::default())
    }

    /// Erstellt einen leeren App-State.
    pub fn with_options(map: Box<dyn MapSurface>, options: PlannerOptions) -> Self {
        let mut geometry = GeometryStore::new();
        let store_changes = geometry.subscribe();
        Self {
            map,
            refresh: RefreshScheduler::new(options.refresh_interval()),
            options,
            events: Vec::new(),
            equipment: Vec::new(),
            catalog: EventCatalog::default(),
            geometry,
            visibility: VisibilityFilters::new(),
            mode: DrawingModeController::new(),
            outbox: Outbox::new(),
            ui: UiState::new(),
            command_log: CommandLog::new(),
            event_epoch: 0,
            store_changes,
        }
    }

    /// Ausgewähltes Event
    pub fn selected_event(&self) -> Option<&Event> {
        self.catalog.event.as_ref()
    }

    /// Event nach ID
    pub fn find_event(&self, id: Uuid) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    /// Equipment nach ID
    pub fn find_equipment(&self, id: Uuid) -> Option<&Equipment> {
        self.equipment.iter().find(|e| e.id == id)
    }

    /// Guard für Antworten, die nur im aktuellen Modus gelten
    pub fn mode_guard(&self) -> Guard {
        Guard::Mode(self.mode.epoch())
    }

    /// Guard für Antworten, die nur für das ausgewählte Event gelten
    pub fn event_guard(&self) -> Guard {
        Guard::Event(self.event_epoch)
    }

    /// Gilt eine Antwort mit diesem Guard noch?
    pub fn guard_holds(&self, guard: Guard) -> bool {
        match guard {
            Guard::Mode(epoch) => epoch == self.mode.epoch(),
            Guard::Event(epoch) => epoch == self.event_epoch,
            Guard::Unguarded => true,
        }
    }

    /// Wendet die Sichtbarkeitsfilter neu an, falls sich Bindungen geändert haben.
    pub fn sync_visibility(&mut self) -> bool {
        let changes = self.store_changes.try_iter().count();
        if changes == 0 {
            return false;
        }
        self.visibility
            .reapply(&self.catalog, &mut self.geometry, self.map.as_mut());
        true
    }
}
