use std::collections::BTreeSet;

use serde::Serialize;

use super::phase::Phase;
use super::theme::{self, ThemeEntry};
use super::time::Tick;

/// Strict state delta. This is the ONLY way game state mutates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateDelta {
    Tick(Tick),
    TargetTapped(usize),
    PhaseChanged(Phase),
    /// level += 1, tapped cleared.
    LevelAdvanced,
    /// level = 1, tapped cleared. Pending timers stay valid.
    LevelsWrapped,
    /// level = 1, tapped cleared, generation bumped so every pending timer goes stale.
    Reset,
}

#[derive(Debug, Clone)]
pub struct GameState {
    level: usize,
    max_level: usize,
    tapped: BTreeSet<usize>,
    phase: Phase,
    /// Bumped on every reset. Timers stamped with an older generation are stale.
    generation: u64,
    /// Monotonic version, bumped on every reduction.
    pub version: u64,
    pub last_tick: Tick,
    pub level_started_at: Tick,
}

impl GameState {
    pub fn new(max_level: usize) -> Self {
        debug_assert!((1..=theme::CATALOG.len()).contains(&max_level));
        Self {
            level: 1,
            max_level,
            tapped: BTreeSet::new(),
            phase: Phase::Idle,
            generation: 0,
            version: 0,
            last_tick: Tick::new(),
            level_started_at: Tick::new(),
        }
    }

    /// Pure reduction: State + Delta -> Mutated State
    pub fn reduce(&mut self, delta: StateDelta) {
        self.version += 1;

        match delta {
            StateDelta::Tick(t) => {
                self.last_tick = t;
            }
            StateDelta::TargetTapped(index) => {
                self.tapped.insert(index);
            }
            StateDelta::PhaseChanged(phase) => {
                self.phase = phase;
            }
            StateDelta::LevelAdvanced => {
                self.level = (self.level + 1).min(self.max_level);
                self.tapped.clear();
                self.level_started_at = self.last_tick;
            }
            StateDelta::LevelsWrapped => {
                self.level = 1;
                self.tapped.clear();
                self.level_started_at = self.last_tick;
            }
            StateDelta::Reset => {
                self.level = 1;
                self.tapped.clear();
                self.phase = Phase::AwaitingTaps;
                self.generation += 1;
                self.level_started_at = self.last_tick;
            }
        }
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn max_level(&self) -> usize {
        self.max_level
    }

    pub fn tapped(&self) -> &BTreeSet<usize> {
        &self.tapped
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn celebrating(&self) -> bool {
        self.phase.is_celebrating()
    }

    pub fn is_final_level(&self) -> bool {
        self.level >= self.max_level
    }

    pub fn level_complete(&self) -> bool {
        self.tapped.len() == self.level
    }

    pub fn theme(&self) -> &'static ThemeEntry {
        theme::entry_for(self.level)
    }

    /// Read-only projection handed to the renderer.
    pub fn view(&self) -> GameView {
        GameView {
            level: self.level,
            max_level: self.max_level,
            theme: *self.theme(),
            tapped: self.tapped.clone(),
            celebrating: self.celebrating(),
            phase: self.phase,
            version: self.version,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameView {
    pub level: usize,
    pub max_level: usize,
    pub theme: ThemeEntry,
    pub tapped: BTreeSet<usize>,
    pub celebrating: bool,
    pub phase: Phase,
    pub version: u64,
}

impl GameView {
    pub fn is_tapped(&self, index: usize) -> bool {
        self.tapped.contains(&index)
    }

    /// First target not yet tapped, if any.
    pub fn next_untapped(&self) -> Option<usize> {
        (0..self.level).find(|i| !self.tapped.contains(i))
    }
}
