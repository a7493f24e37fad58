//! Geordnete Arbeitsschritte mit Fehler-Strategie pro Schritt.

use std::collections::VecDeque;

/// Verhalten bei Fehlschlag eines Schritts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Ablauf abbrechen, verbleibende Schritte verwerfen
    AbortWorkflow,
    /// Nur protokollieren und mit dem nächsten Schritt weitermachen
    LogAndContinue,
}

/// Ergebnis nach einem fehlgeschlagenen Schritt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Weiter mit dem nächsten Schritt
    Continue,
    /// Ablauf abgebrochen
    Abort,
}

/// Plan sequenzieller Schritte.
///
/// Es läuft immer höchstens ein Schritt; der nächste startet erst nach
/// `succeed`/`fail` des laufenden.
#[derive(Debug, Clone, PartialEq)]
pub struct StepPlan<S> {
    pending: VecDeque<(S, FailurePolicy)>,
    current: Option<(S, FailurePolicy)>,
    succeeded: Vec<S>,
    failed: Vec<S>,
}

impl<S: Copy + PartialEq + std::fmt::Debug> StepPlan<S> {
    /// Erstellt einen Plan aus Schritten in Ausführungsreihenfolge.
    pub fn new(steps: impl IntoIterator<Item = (S, FailurePolicy)>) -> Self {
        Self {
            pending: steps.into_iter().collect(),
            current: None,
            succeeded: Vec::new(),
            failed: Vec::new(),
        }
    }

    /// Startet den nächsten Schritt.
    ///
    /// Gibt `None` zurück, wenn noch ein Schritt läuft oder keiner mehr übrig ist.
    pub fn start_next(&mut self) -> Option<S> {
        if self.current.is_some() {
            return None;
        }
        self.current = self.pending.pop_front();
        self.current.map(|(step, _)| step)
    }

    /// Laufender Schritt
    pub fn current(&self) -> Option<S> {
        self.current.map(|(step, _)| step)
    }

    /// Markiert den laufenden Schritt als erfolgreich.
    pub fn succeed(&mut self) {
        if let Some((step, _)) = self.current.take() {
            self.succeeded.push(step);
        }
    }

    /// Markiert den laufenden Schritt als fehlgeschlagen.
    pub fn fail(&mut self) -> StepOutcome {
        let Some((step, policy)) = self.current.take() else {
            return StepOutcome::Continue;
        };
        self.failed.push(step);
        match policy {
            FailurePolicy::AbortWorkflow => {
                self.pending.clear();
                StepOutcome::Abort
            }
            FailurePolicy::LogAndContinue => StepOutcome::Continue,
        }
    }

    /// Noch nicht gestartete Schritte
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    /// Kein Schritt läuft und keiner ist übrig
    pub fn is_done(&self) -> bool {
        self.current.is_none() && self.pending.is_empty()
    }

    /// Erfolgreiche Schritte
    pub fn succeeded(&self) -> &[S] {
        &self.succeeded
    }

    /// Fehlgeschlagene Schritte
    pub fn failed(&self) -> &[S] {
        &self.failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Step {
        A,
        B,
        C,
    }

    fn plan() -> StepPlan<Step> {
        StepPlan::new([
            (Step::A, FailurePolicy::AbortWorkflow),
            (Step::B, FailurePolicy::LogAndContinue),
            (Step::C, FailurePolicy::LogAndContinue),
        ])
    }

    #[test]
    fn test_steps_run_sequentially() {
        let mut plan = plan();
        assert_eq!(plan.start_next(), Some(Step::A));
        assert_eq!(plan.start_next(), None, "A läuft noch");
        plan.succeed();
        assert_eq!(plan.start_next(), Some(Step::B));
        assert_eq!(plan.fail(), StepOutcome::Continue);
        assert_eq!(plan.start_next(), Some(Step::C));
        plan.succeed();
        assert!(plan.is_done());
        assert_eq!(plan.succeeded(), &[Step::A, Step::C]);
        assert_eq!(plan.failed(), &[Step::B]);
    }

    #[test]
    fn test_abort_discards_remaining_steps() {
        let mut plan = plan();
        plan.start_next();
        assert_eq!(plan.fail(), StepOutcome::Abort);
        assert_eq!(plan.remaining(), 0);
        assert_eq!(plan.start_next(), None);
        assert!(plan.is_done());
    }
}
