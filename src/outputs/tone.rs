use std::f32::consts::TAU;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use ringbuf::traits::{Consumer, Producer, Split};
use ringbuf::{HeapProd, HeapRb};
use tracing::{debug, error, info, trace, warn};

use super::ToneEmitter;
use crate::error::AudioError;

const VOICE_QUEUE: usize = 64;
const MAX_VOICES: usize = 16;
/// Gain every tone decays to by its end.
const FLOOR_GAIN: f32 = 0.01;

/// One decaying sine tone.
#[derive(Debug, Clone, Copy)]
pub struct Voice {
    phase: f32,
    step: f32,
    gain: f32,
    decay: f32,
    remaining: u32,
}

impl Voice {
    pub fn new(frequency_hz: f32, duration_ms: u64, peak_gain: f32, sample_rate: u32) -> Self {
        let samples = (u64::from(sample_rate) * duration_ms / 1000).max(1) as u32;
        // Exponential ramp from peak to the floor across the whole tone.
        let decay = if peak_gain > FLOOR_GAIN {
            (FLOOR_GAIN / peak_gain).powf(1.0 / samples as f32)
        } else {
            1.0
        };
        Self {
            phase: 0.0,
            step: frequency_hz / sample_rate as f32,
            gain: peak_gain,
            decay,
            remaining: samples,
        }
    }

    fn next_sample(&mut self) -> f32 {
        let sample = (self.phase * TAU).sin() * self.gain;
        self.phase = (self.phase + self.step).fract();
        self.gain *= self.decay;
        self.remaining = self.remaining.saturating_sub(1);
        sample
    }

    pub fn is_done(&self) -> bool {
        self.remaining == 0
    }

    pub fn gain(&self) -> f32 {
        self.gain
    }
}

/// Sums active voices into interleaved output frames. Lives on the audio thread.
#[derive(Debug, Default)]
pub struct Mixer {
    voices: Vec<Voice>,
}

impl Mixer {
    pub fn new() -> Self {
        Self {
            voices: Vec::with_capacity(MAX_VOICES),
        }
    }

    pub fn add(&mut self, voice: Voice) {
        if self.voices.len() >= MAX_VOICES {
            self.voices.remove(0);
        }
        self.voices.push(voice);
    }

    pub fn active(&self) -> usize {
        self.voices.len()
    }

    pub fn render(&mut self, out: &mut [f32], channels: usize) {
        let channels = channels.max(1);
        for frame in out.chunks_mut(channels) {
            let mut mixed = 0.0;
            for voice in self.voices.iter_mut().filter(|v| !v.is_done()) {
                mixed += voice.next_sample();
            }
            let mixed = mixed.clamp(-1.0, 1.0);
            for sample in frame.iter_mut() {
                *sample = mixed;
            }
        }
        self.voices.retain(|v| !v.is_done());
    }
}

struct ReadyOutput {
    _stream: cpal::Stream,
    producer: HeapProd<Voice>,
    sample_rate: u32,
}

enum Backend {
    /// Waiting for the first gesture.
    Locked,
    Ready(ReadyOutput),
    /// Failed to open or shut down. Everything is a no-op from here on.
    Unavailable,
}

/// Tone output on the default audio device, opened lazily on unlock.
pub struct ToneOutput {
    backend: Backend,
    volume: f32,
}

impl ToneOutput {
    pub fn new(volume: f32) -> Self {
        Self {
            backend: Backend::Locked,
            volume,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.backend, Backend::Ready(_))
    }

    fn open() -> Result<ReadyOutput, AudioError> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(AudioError::NoDevice)?;

        info!("Audio Output Device: {}", device.name().unwrap_or_default());

        let supported = device.default_output_config()?;
        let sample_rate = supported.sample_rate().0;
        let channels = supported.channels() as usize;
        let format = supported.sample_format();
        let config: cpal::StreamConfig = supported.into();

        info!("Tone Config Selected: Rate={}Hz, Channels={}", sample_rate, channels);

        let (producer, mut consumer) = HeapRb::<Voice>::new(VOICE_QUEUE).split();
        let mut mixer = Mixer::new();
        let err_fn = |err| error!("an error occurred on tone stream: {}", err);

        let stream = match format {
            cpal::SampleFormat::F32 => device.build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    while let Some(voice) = consumer.try_pop() {
                        mixer.add(voice);
                    }
                    mixer.render(data, channels);
                },
                err_fn,
                None,
            )?,
            cpal::SampleFormat::I16 => {
                let mut scratch: Vec<f32> = Vec::new();
                device.build_output_stream(
                    &config,
                    move |data: &mut [i16], _: &cpal::OutputCallbackInfo| {
                        while let Some(voice) = consumer.try_pop() {
                            mixer.add(voice);
                        }
                        scratch.resize(data.len(), 0.0);
                        mixer.render(&mut scratch, channels);
                        for (out, &sample) in data.iter_mut().zip(scratch.iter()) {
                            *out = (sample * i16::MAX as f32) as i16;
                        }
                    },
                    err_fn,
                    None,
                )?
            }
            other => return Err(AudioError::UnsupportedFormat(format!("{other:?}"))),
        };

        stream.play()?;

        Ok(ReadyOutput {
            _stream: stream,
            producer,
            sample_rate,
        })
    }
}

impl ToneEmitter for ToneOutput {
    fn unlock(&mut self) {
        if !matches!(self.backend, Backend::Locked) {
            return;
        }
        self.backend = match Self::open() {
            Ok(ready) => {
                info!(sample_rate = ready.sample_rate, "Tone output unlocked");
                Backend::Ready(ready)
            }
            Err(e) => {
                warn!("Tone output unavailable, continuing silently: {}", e);
                Backend::Unavailable
            }
        };
    }

    fn play_tone(&mut self, frequency_hz: f32, duration_ms: u64) {
        match &mut self.backend {
            Backend::Ready(ready) => {
                let voice = Voice::new(frequency_hz, duration_ms, self.volume, ready.sample_rate);
                if ready.producer.try_push(voice).is_err() {
                    debug!(frequency_hz, "Tone queue full, dropping tone");
                }
            }
            Backend::Locked => trace!(frequency_hz, "Tone before unlock, dropped"),
            Backend::Unavailable => {}
        }
    }

    fn shutdown(&mut self) {
        if matches!(self.backend, Backend::Ready(_)) {
            info!("Tone output shut down");
        }
        self.backend = Backend::Unavailable;
    }
}
