//! Liefert Backend-Antworten als `RequestFinished`-Intents zurück.

use anyhow::{bail, Result};

use super::EntityBackend;
use crate::app::{AppController, AppIntent, AppState};

/// Obergrenze der Runden, bis die Outbox leer sein muss
pub const MAX_PUMP_ROUNDS: usize = 64;

/// Führt alle eingereihten Anfragen aus und liefert danach die Antworten.
///
/// Anfragen eines Batches laufen unabhängig voneinander; Folge-Anfragen aus
/// den Antworten landen im nächsten Batch. Gibt die Anzahl der Anfragen zurück.
pub fn pump_once(
    controller: &mut AppController,
    state: &mut AppState,
    backend: &mut dyn EntityBackend,
) -> Result<usize> {
    let batch = state.outbox.take_queued();
    let replies: Vec<_> = batch
        .into_iter()
        .map(|outgoing| {
            let outcome = backend
                .execute(&outgoing.request)
                .map_err(|err| format!("{err:#}"));
            (outgoing.id, outcome)
        })
        .collect();

    let count = replies.len();
    for (id, outcome) in replies {
        controller.handle_intent(state, AppIntent::RequestFinished { id, outcome })?;
    }
    Ok(count)
}

/// Pumpt, bis keine Anfragen mehr eingereiht sind.
pub fn pump(
    controller: &mut AppController,
    state: &mut AppState,
    backend: &mut dyn EntityBackend,
) -> Result<usize> {
    let mut total = 0;
    for _ in 0..MAX_PUMP_ROUNDS {
        let count = pump_once(controller, state, backend)?;
        if count == 0 {
            return Ok(total);
        }
        total += count;
    }
    bail!(
        "Outbox nach {} Runden nicht leer ({} Anfragen offen)",
        MAX_PUMP_ROUNDS,
        state.outbox.queued().len()
    )
}
