use std::collections::VecDeque;

use uuid::Uuid;

use super::event::TelemetryEvent;
use super::metrics::{compute_snapshot, TelemetrySnapshot};

const MAX_EVENTS: usize = 10_000;

#[derive(Debug)]
pub struct TelemetryRecorder {
    session_id: Uuid,
    buffer: VecDeque<TelemetryEvent>,
}

impl Default for TelemetryRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl TelemetryRecorder {
    pub fn new() -> Self {
        Self::with_session(Uuid::new_v4())
    }

    pub fn with_session(session_id: Uuid) -> Self {
        Self {
            session_id,
            buffer: VecDeque::with_capacity(256),
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn record(&mut self, event: TelemetryEvent) {
        if self.buffer.len() >= MAX_EVENTS {
            self.buffer.pop_front();
        }
        self.buffer.push_back(event);
    }

    pub fn snapshot(&self) -> TelemetrySnapshot {
        compute_snapshot(&self.buffer)
    }

    pub fn events(&self) -> impl Iterator<Item = &TelemetryEvent> {
        self.buffer.iter()
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Called on shutdown.
    pub fn aggregate_session(&self, duration_ticks: u64) -> TelemetryEvent {
        let snap = self.snapshot();

        TelemetryEvent::SessionSummary {
            session_id: self.session_id,
            duration_ticks,
            levels_completed: snap.level_stats.completed,
            wraps: snap.level_stats.wraps,
            resets: snap.level_stats.resets,
            taps: snap.tap_stats.accepted,
        }
    }
}
