//! Periodische Aktualisierung der Punkt-Liste.
//!
//! Während ein Punkt bearbeitet wird, ist die Aktualisierung ausgesetzt,
//! damit Eingaben nicht überschrieben werden.

use std::time::{Duration, Instant};

use uuid::Uuid;

/// Taktgeber der Punkt-Aktualisierung
#[derive(Debug, Clone)]
pub struct RefreshScheduler {
    interval: Duration,
    last_refresh: Option<Instant>,
    suspended_for: Option<Uuid>,
}

impl RefreshScheduler {
    /// Erstellt einen Taktgeber mit festem Intervall.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_refresh: None,
            suspended_for: None,
        }
    }

    /// Intervall
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Setzt die Aktualisierung aus, solange `point_id` bearbeitet wird.
    pub fn suspend(&mut self, point_id: Uuid) {
        self.suspended_for = Some(point_id);
    }

    /// Nimmt die Aktualisierung wieder auf.
    pub fn resume(&mut self) {
        self.suspended_for = None;
    }

    /// Ist die Aktualisierung ausgesetzt?
    pub fn is_suspended(&self) -> bool {
        self.suspended_for.is_some()
    }

    /// Punkt, dessen Bearbeitung die Aktualisierung aussetzt
    pub fn suspended_for(&self) -> Option<Uuid> {
        self.suspended_for
    }

    /// Startet die Zählung neu (z.B. nach Event-Wechsel).
    pub fn reset(&mut self) {
        self.last_refresh = None;
    }

    /// Ist eine Aktualisierung fällig? Merkt sich dann `now` als letzten Lauf.
    ///
    /// Der erste Aufruf nach `reset` startet nur die Zählung.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.is_suspended() {
            return false;
        }
        match self.last_refresh {
            None => {
                self.last_refresh = Some(now);
                false
            }
            Some(last) if now.saturating_duration_since(last) >= self.interval => {
                self.last_refresh = Some(now);
                true
            }
            Some(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poll_fires_after_interval() {
        let start = Instant::now();
        let mut scheduler = RefreshScheduler::new(Duration::from_secs(30));
        assert!(!scheduler.poll(start));
        assert!(!scheduler.poll(start + Duration::from_secs(29)));
        assert!(scheduler.poll(start + Duration::from_secs(30)));
        assert!(!scheduler.poll(start + Duration::from_secs(31)));
    }

    #[test]
    fn test_suspended_scheduler_never_fires() {
        let start = Instant::now();
        let mut scheduler = RefreshScheduler::new(Duration::from_secs(1));
        scheduler.poll(start);
        scheduler.suspend(Uuid::new_v4());
        assert!(!scheduler.poll(start + Duration::from_secs(10)));
        scheduler.resume();
        assert!(scheduler.poll(start + Duration::from_secs(11)));
    }
}
