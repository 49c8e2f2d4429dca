//! Recording stand-ins for the output capabilities.
//!
//! Clones share one log, so a test can hand one clone to `Capabilities`
//! and inspect another.

use std::sync::{Arc, Mutex, MutexGuard};

use super::{ParticleEmitter, SpeechAnnouncer, ToneEmitter};
use crate::kernel::scheduler::BurstSpec;

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayedTone {
    pub frequency_hz: f32,
    pub duration_ms: u64,
}

#[derive(Debug, Default)]
struct ToneLog {
    unlocked: bool,
    shut_down: bool,
    played: Vec<PlayedTone>,
    dropped: usize,
}

/// Behaves like the real tone output: nothing plays before `unlock`.
#[derive(Debug, Clone, Default)]
pub struct RecordingTones {
    log: Arc<Mutex<ToneLog>>,
}

impl RecordingTones {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn played(&self) -> Vec<PlayedTone> {
        lock(&self.log).played.clone()
    }

    pub fn frequencies(&self) -> Vec<f32> {
        lock(&self.log).played.iter().map(|t| t.frequency_hz).collect()
    }

    pub fn dropped(&self) -> usize {
        lock(&self.log).dropped
    }

    pub fn is_unlocked(&self) -> bool {
        lock(&self.log).unlocked
    }

    pub fn is_shut_down(&self) -> bool {
        lock(&self.log).shut_down
    }
}

impl ToneEmitter for RecordingTones {
    fn unlock(&mut self) {
        lock(&self.log).unlocked = true;
    }

    fn play_tone(&mut self, frequency_hz: f32, duration_ms: u64) {
        let mut log = lock(&self.log);
        if !log.unlocked || log.shut_down {
            log.dropped += 1;
            return;
        }
        log.played.push(PlayedTone {
            frequency_hz,
            duration_ms,
        });
    }

    fn shutdown(&mut self) {
        lock(&self.log).shut_down = true;
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecordingParticles {
    bursts: Arc<Mutex<Vec<BurstSpec>>>,
}

impl RecordingParticles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bursts(&self) -> Vec<BurstSpec> {
        lock(&self.bursts).clone()
    }
}

impl ParticleEmitter for RecordingParticles {
    fn burst(&mut self, spec: &BurstSpec) {
        lock(&self.bursts).push(*spec);
    }
}

#[derive(Debug, Default)]
struct SpeechLog {
    spoken: Vec<String>,
    /// Utterances cut off by a newer one (or by shutdown).
    interrupted: usize,
    speaking: bool,
}

#[derive(Debug, Clone, Default)]
pub struct RecordingSpeech {
    log: Arc<Mutex<SpeechLog>>,
}

impl RecordingSpeech {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spoken(&self) -> Vec<String> {
        lock(&self.log).spoken.clone()
    }

    pub fn last(&self) -> Option<String> {
        lock(&self.log).spoken.last().cloned()
    }

    pub fn interrupted(&self) -> usize {
        lock(&self.log).interrupted
    }
}

impl SpeechAnnouncer for RecordingSpeech {
    fn announce(&mut self, text: &str) {
        let mut log = lock(&self.log);
        if log.speaking {
            log.interrupted += 1;
        }
        log.speaking = true;
        log.spoken.push(text.to_string());
    }

    fn shutdown(&mut self) {
        let mut log = lock(&self.log);
        if log.speaking {
            log.interrupted += 1;
        }
        log.speaking = false;
    }
}
