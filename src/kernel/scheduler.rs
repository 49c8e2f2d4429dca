use std::collections::BTreeMap;

use serde::Serialize;

use super::time::Tick;

/// Effects the kernel asks the driver to perform. Fire-and-forget.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SideEffect {
    PlayTone { frequency_hz: f32, duration_ms: u64 },
    Burst(BurstSpec),
    Announce(String),
}

/// Particle burst parameters. Origin is normalized to the screen (0,0 top-left).
/// Angle is in degrees, 90 points straight up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BurstSpec {
    pub particle_count: u32,
    pub angle_deg: f32,
    pub spread_deg: f32,
    pub origin_x: f32,
    pub origin_y: f32,
}

impl BurstSpec {
    pub fn new(particle_count: u32, spread_deg: f32) -> Self {
        Self {
            particle_count,
            angle_deg: 90.0,
            spread_deg,
            origin_x: 0.5,
            origin_y: 0.5,
        }
    }

    pub fn angle(mut self, angle_deg: f32) -> Self {
        self.angle_deg = angle_deg;
        self
    }

    pub fn origin(mut self, x: f32, y: f32) -> Self {
        self.origin_x = x;
        self.origin_y = y;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TimerKind {
    /// A delayed fire-and-forget effect (reward chord, praise, finale burst, cues).
    Effect(SideEffect),
    /// Celebration window is over.
    EndCelebration,
    /// Final-level finale is over; go back to level 1.
    Wrap,
}

impl TimerKind {
    pub fn label(&self) -> &'static str {
        match self {
            TimerKind::Effect(_) => "effect",
            TimerKind::EndCelebration => "end_celebration",
            TimerKind::Wrap => "wrap",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Timer {
    pub due: Tick,
    pub generation: u64,
    pub kind: TimerKind,
}

/// Deadline queue. Timers with equal deadlines fire in the order they were scheduled.
#[derive(Debug, Default)]
pub struct Scheduler {
    queue: BTreeMap<(Tick, u64), Timer>,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due: Tick, generation: u64, kind: TimerKind) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.insert((due, seq), Timer { due, generation, kind });
    }

    /// Removes and returns every timer due at or before `now`, in firing order.
    pub fn drain_due(&mut self, now: Tick) -> Vec<Timer> {
        let later = self.queue.split_off(&(now.next(), 0));
        let due = std::mem::replace(&mut self.queue, later);
        due.into_values().collect()
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn next_due(&self) -> Option<Tick> {
        self.queue.keys().next().map(|(due, _)| *due)
    }
}
