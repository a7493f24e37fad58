//! Event Planner Map – Replay-Host.
//!
//! Spielt ein JSON-Skript aus Karten- und UI-Aktionen gegen die Engine ab
//! (Headless-Karte, In-Memory-Backend) und gibt den Endzustand als JSON aus.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use event_planner_map::app::workflows::ModifyTarget;
use event_planner_map::app::{Notice, RequestKind};
use event_planner_map::backend::{self, Repository};
use event_planner_map::{
    AppController, AppIntent, AppState, DrawKind, Event, FilterCategory, HeadlessMap, LayerId,
    MemoryBackend, MemorySeed, ModeKind, PlannerOptions,
};

/// Spielt Planungs-Abläufe gegen die Karten-Engine ab
#[derive(Parser, Debug)]
#[command(name = "planner-replay", version, about)]
struct Cli {
    /// Ablauf-Skript (JSON-Liste von Schritten)
    script: PathBuf,
    /// Anfangsbestand des Backends (JSON)
    #[arg(short, long)]
    seed: Option<PathBuf>,
    /// Optionen-Datei (TOML), Standard: neben dem Programm
    #[arg(short, long)]
    config: Option<PathBuf>,
}

/// Verweis auf einen Layer im Skript
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
enum LayerRef {
    /// Im Skript gezeichneter Layer
    Label(String),
    /// Layer einer gebundenen Entity
    Entity(Uuid),
}

/// Ein Schritt des Skripts
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
enum ReplayStep {
    Startup,
    SelectEvent {
        event_id: Option<Uuid>,
    },
    Draw {
        kind: DrawKind,
        geojson: serde_json::Value,
        #[serde(default)]
        label: Option<String>,
    },
    Edit {
        layer: LayerRef,
        geojson: serde_json::Value,
    },
    Delete {
        layer: LayerRef,
    },
    Click {
        layer: LayerRef,
    },
    ChoosePointType {
        #[serde(default)]
        point_of_interest: bool,
    },
    RequestSecurityZone {
        point_id: Uuid,
    },
    PickEquipment {
        equipment_id: Uuid,
    },
    CancelSecurityZone,
    CreateEvent {
        title: String,
        #[serde(default)]
        start_date: Option<DateTime<Utc>>,
        #[serde(default)]
        end_date: Option<DateTime<Utc>>,
    },
    Modify {
        target: ModifyTarget,
    },
    FinishModification,
    ConfirmEvent,
    CancelEvent,
    EditZone {
        #[serde(default)]
        quantity: Option<u32>,
        #[serde(default)]
        comment: Option<String>,
    },
    ToggleCategory {
        category: FilterCategory,
    },
    ToggleItem {
        category: FilterCategory,
        id: Uuid,
    },
    Wait {
        seconds: u64,
    },
    FailNext {
        request: RequestKind,
    },
}

/// Endzustand nach dem Abspielen
#[derive(Debug, Serialize)]
struct Summary {
    mode: ModeKind,
    selected_event: Option<Uuid>,
    layers: usize,
    shown_layers: usize,
    commands: usize,
    notices: Vec<Notice>,
    backend: MemorySeed,
}

struct Replay {
    controller: AppController,
    state: AppState,
    map: HeadlessMap,
    backend: MemoryBackend,
    labels: HashMap<String, LayerId>,
    clock: Instant,
}

impl Replay {
    fn new(options: PlannerOptions, seed: MemorySeed) -> Self {
        let map = HeadlessMap::new();
        Self {
            controller: AppController::new(),
            state: AppState::with_options(Box::new(map.clone()), options),
            map,
            backend: MemoryBackend::from_seed(seed),
            labels: HashMap::new(),
            clock: Instant::now(),
        }
    }

    fn resolve(&self, layer: &LayerRef) -> Result<LayerId> {
        match layer {
            LayerRef::Label(label) => self
                .labels
                .get(label)
                .copied()
                .ok_or_else(|| anyhow!("Unbekannter Layer \"{}\"", label)),
            LayerRef::Entity(id) => self
                .state
                .geometry
                .layer_of(*id)
                .ok_or_else(|| anyhow!("Entity {} hat keinen Layer", id)),
        }
    }

    fn send(&mut self, intent: AppIntent) -> Result<()> {
        self.controller.handle_intent(&mut self.state, intent)
    }

    fn run_step(&mut self, step: ReplayStep) -> Result<()> {
        match step {
            ReplayStep::Startup => self.send(AppIntent::StartupRequested)?,
            ReplayStep::SelectEvent { event_id } => {
                self.send(AppIntent::EventSelected { event_id })?
            }
            ReplayStep::Draw {
                kind,
                geojson,
                label,
            } => {
                let layer = self.map.draw(kind, geojson.to_string());
                if let Some(label) = label {
                    self.labels.insert(label, layer);
                }
                self.send(AppIntent::ShapeDrawn { layer, kind })?;
            }
            ReplayStep::Edit { layer, geojson } => {
                let layer = self.resolve(&layer)?;
                self.map.edit(layer, geojson.to_string());
                self.send(AppIntent::ShapesEdited {
                    layers: vec![layer],
                })?;
            }
            ReplayStep::Delete { layer } => {
                let layer = self.resolve(&layer)?;
                self.send(AppIntent::ShapesDeleted {
                    layers: vec![layer],
                })?;
            }
            ReplayStep::Click { layer } => {
                let layer = self.resolve(&layer)?;
                self.send(AppIntent::LayerClicked { layer })?;
            }
            ReplayStep::ChoosePointType { point_of_interest } => {
                self.send(AppIntent::PointTypeChosen {
                    is_point_of_interest: point_of_interest,
                })?
            }
            ReplayStep::RequestSecurityZone { point_id } => {
                self.send(AppIntent::SecurityZoneRequested { point_id })?
            }
            ReplayStep::PickEquipment { equipment_id } => {
                self.send(AppIntent::EquipmentPicked { equipment_id })?
            }
            ReplayStep::CancelSecurityZone => self.send(AppIntent::SecurityZoneDrawCancelled)?,
            ReplayStep::CreateEvent {
                title,
                start_date,
                end_date,
            } => {
                // Das Formular speichert das Event vor dem Zeichnen
                let event = Event::new(title, start_date, end_date);
                self.backend.events.create(event.clone())?;
                self.send(AppIntent::EventCreationStarted { event })?;
            }
            ReplayStep::Modify { target } => {
                self.send(AppIntent::EventModificationRequested { target })?
            }
            ReplayStep::FinishModification => self.send(AppIntent::EventModificationFinished)?,
            ReplayStep::ConfirmEvent => self.send(AppIntent::EventCreationConfirmed)?,
            ReplayStep::CancelEvent => self.send(AppIntent::EventCreationCancelled)?,
            ReplayStep::EditZone { quantity, comment } => {
                let Some(view) = self.state.ui.zone_edit.as_ref() else {
                    log::warn!("Keine Zonen-Bearbeitung offen");
                    return Ok(());
                };
                let mut fields = view.fields.clone();
                if let Some(quantity) = quantity {
                    fields.quantity = quantity;
                }
                if let Some(comment) = comment {
                    fields.comment = comment;
                }
                self.send(AppIntent::ZoneEditChanged { fields })?;
                self.send(AppIntent::ZoneEditSaved)?;
            }
            ReplayStep::ToggleCategory { category } => {
                self.send(AppIntent::CategoryVisibilityToggled { category })?
            }
            ReplayStep::ToggleItem { category, id } => {
                self.send(AppIntent::ItemVisibilityToggled { category, id })?
            }
            ReplayStep::Wait { seconds } => {
                self.clock += Duration::from_secs(seconds);
                let now = self.clock;
                self.send(AppIntent::Tick { now })?;
            }
            ReplayStep::FailNext { request } => self.backend.fail_once(request),
        }
        backend::pump(&mut self.controller, &mut self.state, &mut self.backend)?;
        Ok(())
    }

    fn summary(&self) -> Summary {
        Summary {
            mode: self.state.mode.mode_kind(),
            selected_event: self.state.catalog.event_id(),
            layers: self.map.layer_count(),
            shown_layers: self.map.shown_layers().len(),
            commands: self.state.command_log.len(),
            notices: self.state.ui.notices.clone(),
            backend: self.backend.snapshot(),
        }
    }
}

fn main() -> Result<()> {
    // Logger initialisieren
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cli = Cli::parse();
    log::info!("planner-replay v{} startet...", env!("CARGO_PKG_VERSION"));

    let config_path = cli.config.unwrap_or_else(PlannerOptions::config_path);
    let options = PlannerOptions::load_from_file(&config_path);
    let seed = match &cli.seed {
        Some(path) => MemorySeed::load_from_file(path)?,
        None => MemorySeed::default(),
    };

    let text = std::fs::read_to_string(&cli.script)
        .with_context(|| format!("Skript {} nicht lesbar", cli.script.display()))?;
    let steps: Vec<ReplayStep> = serde_json::from_str(&text)
        .with_context(|| format!("Skript {} ist ungültig", cli.script.display()))?;

    let mut replay = Replay::new(options, seed);
    // Der Start lädt immer zuerst die Stammdaten
    replay.run_step(ReplayStep::Startup)?;
    for (index, step) in steps.into_iter().enumerate() {
        log::debug!("Schritt {}: {:?}", index + 1, step);
        replay
            .run_step(step)
            .with_context(|| format!("Schritt {} fehlgeschlagen", index + 1))?;
    }

    let summary = replay.summary();
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
