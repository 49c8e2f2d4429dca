use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Allowed: levels, counts, tick durations, enums.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TelemetryEvent {
    TapAccepted {
        level: usize,
        tapped: usize,
    },

    TapIgnored {
        reason: IgnoredTapReason,
    },

    LevelCompleted {
        level: usize,
        duration_ticks: u64,
    },

    LevelsWrapped,

    Reset {
        from_level: usize,
    },

    StaleTimerDiscarded {
        kind: String,
        generation: u64,
    },

    SessionSummary {
        session_id: Uuid,
        duration_ticks: u64,
        levels_completed: u64,
        wraps: u64,
        resets: u64,
        taps: u64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IgnoredTapReason {
    Duplicate,
    Locked,
    OutOfRange,
}
