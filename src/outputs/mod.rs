//! Best-effort output capabilities: tones, particle bursts, speech.
//!
//! Each capability is resolved once at startup. An absent capability is
//! `None` and every effect aimed at it is a silent no-op.

pub mod confetti;
pub mod mock_audio;
pub mod speech;
pub mod tone;

use tracing::trace;

use crate::config::GameConfig;
use crate::kernel::scheduler::{BurstSpec, SideEffect};
use confetti::Confetti;
use speech::SpeechOutput;
use tone::ToneOutput;

pub trait ToneEmitter {
    /// First user gesture. Audio backends may only come up after this.
    fn unlock(&mut self);
    fn play_tone(&mut self, frequency_hz: f32, duration_ms: u64);
    fn shutdown(&mut self) {}
}

pub trait ParticleEmitter {
    fn burst(&mut self, spec: &BurstSpec);
}

pub trait SpeechAnnouncer {
    /// Interrupts whatever is being said and speaks `text`.
    fn announce(&mut self, text: &str);
    fn shutdown(&mut self) {}
}

#[derive(Default)]
pub struct Capabilities {
    tones: Option<Box<dyn ToneEmitter>>,
    particles: Option<Box<dyn ParticleEmitter>>,
    speech: Option<Box<dyn SpeechAnnouncer>>,
    unlocked: bool,
}

impl Capabilities {
    pub fn none() -> Self {
        Self::default()
    }

    /// Resolve every capability the config asks for. Anything unavailable stays `None`.
    pub fn from_config(config: &GameConfig, confetti: Option<Confetti>) -> Self {
        let mut caps = Self::none();
        if let Some(confetti) = confetti {
            caps = caps.with_particles(confetti);
        }
        if config.audio.enabled {
            caps = caps.with_tones(ToneOutput::new(config.audio.volume));
        }
        if config.speech_enabled() {
            if let Some(speech) = SpeechOutput::detect(&config.speech) {
                caps = caps.with_speech(speech);
            }
        }
        caps
    }

    pub fn with_tones(mut self, tones: impl ToneEmitter + 'static) -> Self {
        self.tones = Some(Box::new(tones));
        self
    }

    pub fn with_particles(mut self, particles: impl ParticleEmitter + 'static) -> Self {
        self.particles = Some(Box::new(particles));
        self
    }

    pub fn with_speech(mut self, speech: impl SpeechAnnouncer + 'static) -> Self {
        self.speech = Some(Box::new(speech));
        self
    }

    pub fn has_tones(&self) -> bool {
        self.tones.is_some()
    }

    pub fn has_speech(&self) -> bool {
        self.speech.is_some()
    }

    /// Forwarded once, on the first tap or reset.
    pub fn unlock(&mut self) {
        if self.unlocked {
            return;
        }
        self.unlocked = true;
        if let Some(tones) = self.tones.as_mut() {
            tones.unlock();
        }
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    pub fn dispatch(&mut self, effect: &SideEffect) {
        match effect {
            SideEffect::PlayTone {
                frequency_hz,
                duration_ms,
            } => match self.tones.as_mut() {
                Some(tones) => tones.play_tone(*frequency_hz, *duration_ms),
                None => trace!(frequency_hz, "No tone capability"),
            },
            SideEffect::Burst(spec) => match self.particles.as_mut() {
                Some(particles) => particles.burst(spec),
                None => trace!(count = spec.particle_count, "No particle capability"),
            },
            SideEffect::Announce(text) => match self.speech.as_mut() {
                Some(speech) => speech.announce(text),
                None => trace!(%text, "No speech capability"),
            },
        }
    }

    pub fn dispatch_all(&mut self, effects: &[SideEffect]) {
        for effect in effects {
            self.dispatch(effect);
        }
    }

    /// Teardown on application exit.
    pub fn shutdown(&mut self) {
        if let Some(tones) = self.tones.as_mut() {
            tones.shutdown();
        }
        if let Some(speech) = self.speech.as_mut() {
            speech.shutdown();
        }
    }
}
