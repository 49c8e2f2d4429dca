use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Tick {
    pub frame: u64,
}

/// Logical length of one kernel step.
pub const TICK_MS: u64 = 20;

impl Tick {
    pub fn new() -> Self {
        Tick { frame: 0 }
    }

    pub fn next(&self) -> Self {
        Tick { frame: self.frame + 1 }
    }

    /// Deadline `ms` milliseconds after this tick, rounded up to a whole tick.
    pub fn after_ms(&self, ms: u64) -> Self {
        Tick { frame: self.frame + ticks_for(ms) }
    }

    pub fn since(&self, earlier: Tick) -> u64 {
        self.frame.saturating_sub(earlier.frame)
    }
}

/// Number of ticks needed to cover `ms` milliseconds (ceiling).
pub fn ticks_for(ms: u64) -> u64 {
    ms.div_ceil(TICK_MS)
}
