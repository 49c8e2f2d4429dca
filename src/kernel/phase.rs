use serde::{Deserialize, Serialize};

/// The explicit lifecycle of one round of counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Phase {
    /// Mounted, not yet activated. No startup cue has been scheduled.
    #[default]
    Idle,
    /// Targets are live; taps are accepted.
    AwaitingTaps,
    /// Level complete, reward playing. Input is locked.
    Celebrating,
    /// Celebration over, the next level is being prepared.
    /// Only lingers after the final level, while the finale plays before the wrap.
    Advancing,
}

/// Requests that drive a phase transition.
/// These are REQUESTS. The graph decides whether they apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseRequest {
    Activate,
    LevelCompleted,
    CelebrationElapsed,
    NextLevelReady,
    Reset,
}

pub struct PhaseGraph;

impl PhaseGraph {
    /// Pure function: (Current Phase, Request) -> New Phase
    /// Returns None if the transition is invalid/ignored.
    pub fn transition(current: Phase, request: PhaseRequest) -> Option<Phase> {
        use Phase::*;
        use PhaseRequest::*;

        match (current, request) {
            (Idle, Activate) => Some(AwaitingTaps),
            (AwaitingTaps, LevelCompleted) => Some(Celebrating),
            (Celebrating, CelebrationElapsed) => Some(Advancing),
            (Advancing, NextLevelReady) => Some(AwaitingTaps),

            // Start Over is always honored, even before activation.
            (_, Reset) => Some(AwaitingTaps),

            _ => None,
        }
    }
}

impl Phase {
    pub fn accepts_taps(self) -> bool {
        matches!(self, Phase::AwaitingTaps)
    }

    pub fn is_celebrating(self) -> bool {
        matches!(self, Phase::Celebrating)
    }
}
