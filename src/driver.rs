//! Driver: owns the reactor and the output capabilities.
//!
//! One `step()` per frame:
//! 1. Drain queued input events
//! 2. Unlock outputs on the first gesture
//! 3. Kernel step
//! 4. Hand side effects to the capabilities

use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::GameConfig;
use crate::kernel::event::{Event, InputEvent};
use crate::kernel::reactor::Reactor;
use crate::kernel::scheduler::SideEffect;
use crate::kernel::state::GameView;
use crate::kernel::telemetry::event::TelemetryEvent;
use crate::outputs::Capabilities;

const EVENT_CHANNEL_CAPACITY: usize = 256;

pub struct Driver {
    pub reactor: Reactor,
    tx: mpsc::Sender<Event>,
    caps: Capabilities,
}

impl Driver {
    pub fn new(config: &GameConfig, caps: Capabilities) -> Self {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            reactor: Reactor::new(rx, config),
            tx,
            caps,
        }
    }

    /// Telemetry and the session summary carry `session_id`, so they line up
    /// with the caller's log span.
    pub fn with_session(config: &GameConfig, caps: Capabilities, session_id: Uuid) -> Self {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            reactor: Reactor::with_session(rx, config, session_id),
            tx,
            caps,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.reactor.telemetry().session_id()
    }

    pub fn submit(&self, input: InputEvent) {
        if let Err(e) = self.tx.try_send(input.into()) {
            warn!("Input dropped: {e}");
        }
    }

    pub fn view(&self) -> GameView {
        self.reactor.view()
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.caps
    }

    pub fn step(&mut self) -> Vec<SideEffect> {
        let events = self.reactor.drain_events();

        if events.iter().any(|e| matches!(e, Event::Input(_))) {
            self.caps.unlock();
        }

        let effects = self.reactor.tick_step(events);
        self.caps.dispatch_all(&effects);
        effects
    }

    /// Tear down outputs and emit the session summary.
    pub fn shutdown(&mut self) -> TelemetryEvent {
        self.caps.shutdown();
        let summary = self
            .reactor
            .telemetry()
            .aggregate_session(self.reactor.tick.frame);
        match serde_json::to_string(&summary) {
            Ok(json) => info!(summary = %json, "Session ended"),
            Err(e) => warn!("Failed to serialize session summary: {e}"),
        }
        summary
    }
}
