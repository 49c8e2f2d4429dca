use tracing::{debug, info, warn};
use uuid::Uuid;

use super::phase::{PhaseGraph, PhaseRequest};
use super::scheduler::{BurstSpec, Scheduler, SideEffect, TimerKind};
use super::state::{GameState, StateDelta};
use super::telemetry::event::{IgnoredTapReason, TelemetryEvent};
use super::telemetry::recorder::TelemetryRecorder;
use super::theme;
use super::time::Tick;
use crate::config::{GameConfig, Timings, Variant};

const TAP_BASE_HZ: f32 = 400.0;
const TAP_STEP_HZ: f32 = 150.0;

/// The level sequencer: owns game state and every timer it schedules.
///
/// All entry points take the current tick and return the effects to perform
/// now; anything delayed goes through the scheduler, stamped with the
/// current generation.
pub struct Sequencer {
    pub state: GameState,
    pub scheduler: Scheduler,
    pub telemetry: TelemetryRecorder,
    variant: Variant,
    timings: Timings,
}

impl Sequencer {
    pub fn new(variant: Variant, timings: Timings) -> Self {
        Self::with_telemetry(variant, timings, TelemetryRecorder::new())
    }

    fn with_telemetry(variant: Variant, timings: Timings, telemetry: TelemetryRecorder) -> Self {
        Self {
            state: GameState::new(variant.max_level()),
            scheduler: Scheduler::new(),
            telemetry,
            variant,
            timings,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.variant, config.timings.clone())
    }

    /// Telemetry is tagged with `session_id` instead of a fresh one.
    pub fn from_config_with_session(config: &GameConfig, session_id: Uuid) -> Self {
        Self::with_telemetry(
            config.variant,
            config.timings.clone(),
            TelemetryRecorder::with_session(session_id),
        )
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn timings(&self) -> &Timings {
        &self.timings
    }

    /// Run the phase graph; only valid transitions touch state.
    fn request(&mut self, request: PhaseRequest) -> bool {
        let current = self.state.phase();
        match PhaseGraph::transition(current, request) {
            Some(next) => {
                if next != current {
                    self.state.reduce(StateDelta::PhaseChanged(next));
                }
                true
            }
            None => {
                debug!(?current, ?request, "Phase request rejected");
                false
            }
        }
    }

    fn schedule(&mut self, now: Tick, delay_ms: u64, kind: TimerKind) {
        let generation = self.state.generation();
        self.scheduler.schedule(now.after_ms(delay_ms), generation, kind);
    }

    /// First activation: go live and queue the instructional cue.
    pub fn activate(&mut self, now: Tick) {
        if !self.request(PhaseRequest::Activate) {
            return;
        }
        self.state.level_started_at = now;
        let first = theme::entry_for(1);
        let cue = format!("Let's count! Tap one {}!", first.name);
        self.schedule(
            now,
            self.timings.startup_cue_delay_ms,
            TimerKind::Effect(SideEffect::Announce(cue)),
        );
        info!(max_level = self.state.max_level(), "Sequencer activated");
    }

    pub fn tap(&mut self, index: usize, now: Tick) -> Vec<SideEffect> {
        let level = self.state.level();

        if !self.state.phase().accepts_taps() {
            debug!(index, phase = ?self.state.phase(), "Tap ignored: input locked");
            self.telemetry.record(TelemetryEvent::TapIgnored {
                reason: IgnoredTapReason::Locked,
            });
            return Vec::new();
        }

        if index >= level {
            debug_assert!(index < level, "renderer forwarded out-of-range target {index}");
            warn!(index, level, "Tap ignored: target out of range");
            self.telemetry.record(TelemetryEvent::TapIgnored {
                reason: IgnoredTapReason::OutOfRange,
            });
            return Vec::new();
        }

        if self.state.tapped().contains(&index) {
            debug!(index, "Tap ignored: already counted");
            self.telemetry.record(TelemetryEvent::TapIgnored {
                reason: IgnoredTapReason::Duplicate,
            });
            return Vec::new();
        }

        self.state.reduce(StateDelta::TargetTapped(index));
        let tapped = self.state.tapped().len();
        self.telemetry.record(TelemetryEvent::TapAccepted { level, tapped });

        let effects = vec![SideEffect::PlayTone {
            frequency_hz: tap_frequency(tapped),
            duration_ms: self.timings.tap_tone_ms,
        }];

        if self.state.level_complete() {
            self.complete_level(now);
        }

        effects
    }

    fn complete_level(&mut self, now: Tick) {
        // Celebrating is visible synchronously, before any reward timer fires.
        self.request(PhaseRequest::LevelCompleted);

        let level = self.state.level();
        let duration_ticks = now.since(self.state.level_started_at);
        self.telemetry.record(TelemetryEvent::LevelCompleted { level, duration_ticks });
        info!(level, duration_ticks, "Level complete");

        let t = self.timings.clone();

        for burst in reward_bursts() {
            self.schedule(now, t.reward_delay_ms, TimerKind::Effect(SideEffect::Burst(burst)));
        }

        for (i, &frequency_hz) in self.variant.reward_chord().iter().enumerate() {
            let delay = t.reward_delay_ms + i as u64 * t.chord_step_ms;
            self.schedule(
                now,
                delay,
                TimerKind::Effect(SideEffect::PlayTone {
                    frequency_hz,
                    duration_ms: t.chord_tone_ms,
                }),
            );
        }

        let praise = format!(
            "Great job! You counted {}!",
            self.state.theme().counted(level)
        );
        self.schedule(
            now,
            t.reward_delay_ms + t.praise_delay_ms,
            TimerKind::Effect(SideEffect::Announce(praise)),
        );

        self.schedule(now, t.celebration_ms, TimerKind::EndCelebration);
    }

    pub fn reset(&mut self, _now: Tick) -> Vec<SideEffect> {
        let from_level = self.state.level();
        // Reset is valid from every phase.
        self.request(PhaseRequest::Reset);
        self.state.reduce(StateDelta::Reset);
        self.telemetry.record(TelemetryEvent::Reset { from_level });
        info!(
            from_level,
            generation = self.state.generation(),
            "Game reset"
        );

        vec![SideEffect::Announce(format!(
            "Let's start again! One {}!",
            theme::entry_for(1).name
        ))]
    }

    /// Fire every timer due by `now`. Stale timers are dropped without touching state.
    pub fn poll(&mut self, now: Tick) -> Vec<SideEffect> {
        let mut effects = Vec::new();

        for timer in self.scheduler.drain_due(now) {
            if timer.generation != self.state.generation() {
                debug!(
                    kind = timer.kind.label(),
                    timer_generation = timer.generation,
                    current = self.state.generation(),
                    "Discarded stale timer"
                );
                self.telemetry.record(TelemetryEvent::StaleTimerDiscarded {
                    kind: timer.kind.label().to_string(),
                    generation: timer.generation,
                });
                continue;
            }

            match timer.kind {
                TimerKind::Effect(effect) => effects.push(effect),
                TimerKind::EndCelebration => effects.extend(self.end_celebration(now)),
                TimerKind::Wrap => effects.extend(self.wrap()),
            }
        }

        effects
    }

    fn end_celebration(&mut self, now: Tick) -> Vec<SideEffect> {
        if !self.request(PhaseRequest::CelebrationElapsed) {
            return Vec::new();
        }

        if !self.state.is_final_level() {
            self.state.reduce(StateDelta::LevelAdvanced);
            self.request(PhaseRequest::NextLevelReady);
            let level = self.state.level();
            info!(level, "Advanced to next level");
            return vec![SideEffect::Announce(self.state.theme().counted(level))];
        }

        let t = self.timings.clone();
        self.schedule(
            now,
            t.finale_burst_delay_ms,
            TimerKind::Effect(SideEffect::Burst(finale_burst())),
        );
        self.schedule(now, t.finale_burst_delay_ms + t.wrap_delay_ms, TimerKind::Wrap);
        info!("Final level complete, finale scheduled");

        vec![SideEffect::Announce(
            "You finished all levels! You're a counting superstar!".to_string(),
        )]
    }

    fn wrap(&mut self) -> Vec<SideEffect> {
        self.state.reduce(StateDelta::LevelsWrapped);
        self.request(PhaseRequest::NextLevelReady);
        self.telemetry.record(TelemetryEvent::LevelsWrapped);
        info!("Wrapped back to level 1");

        vec![SideEffect::Announce(format!(
            "Let's count again! One {}!",
            theme::entry_for(1).name
        ))]
    }
}

/// Pitch rises with every counted target.
pub fn tap_frequency(tapped: usize) -> f32 {
    TAP_BASE_HZ + TAP_STEP_HZ * tapped.saturating_sub(1) as f32
}

pub fn reward_bursts() -> [BurstSpec; 3] {
    [
        BurstSpec::new(150, 70.0).origin(0.5, 0.6),
        BurstSpec::new(60, 55.0).angle(60.0).origin(0.0, 0.5),
        BurstSpec::new(60, 55.0).angle(120.0).origin(1.0, 0.5),
    ]
}

pub fn finale_burst() -> BurstSpec {
    BurstSpec::new(300, 200.0)
}
