use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

use super::event::{Event, InputContent};
use super::phase::Phase;
use super::scheduler::SideEffect;
use super::sequencer::Sequencer;
use super::state::{GameState, GameView, StateDelta};
use super::telemetry::recorder::TelemetryRecorder;
use super::time::Tick;
use crate::config::GameConfig;

/// Drives the sequencer on logical ticks and collects the effects to perform.
pub struct Reactor {
    pub receiver: mpsc::Receiver<Event>,
    pub sequencer: Sequencer,
    pub tick: Tick,
}

impl Reactor {
    pub fn new(receiver: mpsc::Receiver<Event>, config: &GameConfig) -> Self {
        Self {
            receiver,
            sequencer: Sequencer::from_config(config),
            tick: Tick::new(),
        }
    }

    pub fn with_session(
        receiver: mpsc::Receiver<Event>,
        config: &GameConfig,
        session_id: Uuid,
    ) -> Self {
        Self {
            receiver,
            sequencer: Sequencer::from_config_with_session(config, session_id),
            tick: Tick::new(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.sequencer.state
    }

    pub fn telemetry(&self) -> &TelemetryRecorder {
        &self.sequencer.telemetry
    }

    pub fn view(&self) -> GameView {
        self.sequencer.state.view()
    }

    /// Pure Tick Step: Advances State. Returns SideEffects to be executed by the driver.
    /// MUST NOT await I/O or timers.
    ///
    /// The tick advances first. Timers due on the new tick fire before this
    /// tick's inputs are applied.
    pub fn tick_step(&mut self, events: Vec<Event>) -> Vec<SideEffect> {
        self.tick = self.tick.next();
        self.sequencer.state.reduce(StateDelta::Tick(self.tick));

        // First step activates the sequencer (and schedules the startup cue).
        if self.sequencer.state.phase() == Phase::Idle {
            self.sequencer.activate(self.tick);
        }

        let mut effects = self.sequencer.poll(self.tick);

        for event in events {
            match event {
                Event::Input(input) => {
                    debug!(source = %input.source, content = ?input.content, "Input");
                    let produced = match input.content {
                        InputContent::Tap(index) => self.sequencer.tap(index, self.tick),
                        InputContent::Reset => self.sequencer.reset(self.tick),
                    };
                    effects.extend(produced);
                }
            }
        }

        effects
    }

    /// Drain everything queued on the channel without waiting.
    pub fn drain_events(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        while let Ok(event) = self.receiver.try_recv() {
            events.push(event);
        }
        events
    }

    /// Advance `ticks` steps with no input, collecting every effect.
    pub fn run_idle(&mut self, ticks: u64) -> Vec<SideEffect> {
        let mut effects = Vec::new();
        for _ in 0..ticks {
            effects.extend(self.tick_step(Vec::new()));
        }
        effects
    }
}
