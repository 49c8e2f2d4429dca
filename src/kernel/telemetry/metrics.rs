use std::collections::VecDeque;

use super::event::{IgnoredTapReason, TelemetryEvent};

#[derive(Debug, Clone, Default)]
pub struct TelemetrySnapshot {
    pub tap_stats: TapStats,
    pub level_stats: LevelStats,
    pub stale_timers_discarded: u64,
}

#[derive(Debug, Clone, Default)]
pub struct TapStats {
    pub accepted: u64,
    pub duplicates: u64,
    pub locked: u64,
    pub out_of_range: u64,
}

#[derive(Debug, Clone, Default)]
pub struct LevelStats {
    pub completed: u64,
    pub wraps: u64,
    pub resets: u64,
    pub total_completion_ticks: u64,
    pub avg_completion_ticks: f64,
    pub fastest_completion_ticks: Option<u64>,
    pub highest_level: usize,
}

pub fn compute_snapshot(events: &VecDeque<TelemetryEvent>) -> TelemetrySnapshot {
    let mut snap = TelemetrySnapshot::default();

    for event in events {
        match event {
            TelemetryEvent::TapAccepted { .. } => snap.tap_stats.accepted += 1,
            TelemetryEvent::TapIgnored { reason } => match reason {
                IgnoredTapReason::Duplicate => snap.tap_stats.duplicates += 1,
                IgnoredTapReason::Locked => snap.tap_stats.locked += 1,
                IgnoredTapReason::OutOfRange => snap.tap_stats.out_of_range += 1,
            },
            TelemetryEvent::LevelCompleted { level, duration_ticks } => {
                let stats = &mut snap.level_stats;
                stats.completed += 1;
                stats.total_completion_ticks += duration_ticks;
                stats.highest_level = stats.highest_level.max(*level);
                stats.fastest_completion_ticks = Some(match stats.fastest_completion_ticks {
                    Some(best) => best.min(*duration_ticks),
                    None => *duration_ticks,
                });
            }
            TelemetryEvent::LevelsWrapped => snap.level_stats.wraps += 1,
            TelemetryEvent::Reset { .. } => snap.level_stats.resets += 1,
            TelemetryEvent::StaleTimerDiscarded { .. } => snap.stale_timers_discarded += 1,
            TelemetryEvent::SessionSummary { .. } => {}
        }
    }

    if snap.level_stats.completed > 0 {
        snap.level_stats.avg_completion_ticks =
            snap.level_stats.total_completion_ticks as f64 / snap.level_stats.completed as f64;
    }

    snap
}
