use std::path::{Path, PathBuf};

use tokio::sync::oneshot;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::SpeechAnnouncer;
use crate::config::SpeechConfig;

/// Words per minute both engines use at rate 1.0.
const BASE_WPM: f32 = 175.0;
/// espeak's pitch scale is 0-99 with 50 as the default.
const ESPEAK_BASE_PITCH: f32 = 50.0;
/// Lighter espeak variant used when no preferred voice is configured for it.
const ESPEAK_VOICE: &str = "en-us+f3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechEngine {
    /// macOS `say`.
    Say(PathBuf),
    /// `espeak-ng` or `espeak`.
    Espeak(PathBuf),
}

impl SpeechEngine {
    /// Find an engine on PATH.
    pub fn detect() -> Option<Self> {
        let path = std::env::var_os("PATH")?;
        let dirs: Vec<PathBuf> = std::env::split_paths(&path).collect();
        find_in(&dirs, "say")
            .map(SpeechEngine::Say)
            .or_else(|| find_in(&dirs, "espeak-ng").map(SpeechEngine::Espeak))
            .or_else(|| find_in(&dirs, "espeak").map(SpeechEngine::Espeak))
    }

    pub fn program(&self) -> &Path {
        match self {
            SpeechEngine::Say(p) | SpeechEngine::Espeak(p) => p,
        }
    }
}

fn find_in(dirs: &[PathBuf], name: &str) -> Option<PathBuf> {
    dirs.iter().map(|d| d.join(name)).find(|p| p.is_file())
}

/// First preferred voice the platform exposes, compared case-insensitively.
pub fn pick_voice(available: &[String], preferred: &[String]) -> Option<String> {
    preferred.iter().find_map(|want| {
        available
            .iter()
            .find(|have| have.eq_ignore_ascii_case(want))
            .cloned()
    })
}

/// Parse `say -v '?'` output: the voice name is everything before the locale column.
pub fn parse_say_voices(listing: &str) -> Vec<String> {
    listing
        .lines()
        .filter_map(|line| {
            let name_part = line.split('#').next()?;
            let mut words: Vec<&str> = name_part.split_whitespace().collect();
            // Drop the trailing locale token (e.g. en_US).
            if words.len() > 1 {
                words.pop();
            }
            let name = words.join(" ");
            (!name.is_empty()).then_some(name)
        })
        .collect()
}

/// Command-line arguments for speaking `text`.
pub fn command_args(engine: &SpeechEngine, voice: Option<&str>, rate: f32, pitch: f32, text: &str) -> Vec<String> {
    let wpm = (BASE_WPM * rate).round() as u32;
    match engine {
        SpeechEngine::Say(_) => {
            let mut args = Vec::new();
            if let Some(voice) = voice {
                args.push("-v".to_string());
                args.push(voice.to_string());
            }
            args.push("-r".to_string());
            args.push(wpm.to_string());
            args.push(text.to_string());
            args
        }
        SpeechEngine::Espeak(_) => {
            let espeak_pitch = (ESPEAK_BASE_PITCH * pitch).round().clamp(0.0, 99.0) as u32;
            vec![
                "-v".to_string(),
                voice.unwrap_or(ESPEAK_VOICE).to_string(),
                "-s".to_string(),
                wpm.to_string(),
                "-p".to_string(),
                espeak_pitch.to_string(),
                text.to_string(),
            ]
        }
    }
}

/// Speaks through an external TTS process; at most one utterance at a time.
pub struct SpeechOutput {
    engine: SpeechEngine,
    voice: Option<String>,
    rate: f32,
    pitch: f32,
    current: Option<oneshot::Sender<()>>,
}

impl SpeechOutput {
    pub fn new(engine: SpeechEngine, voice: Option<String>, config: &SpeechConfig) -> Self {
        Self {
            engine,
            voice,
            rate: config.rate,
            pitch: config.pitch,
            current: None,
        }
    }

    /// Resolve an engine and voice. `None` when the platform has no TTS.
    pub fn detect(config: &SpeechConfig) -> Option<Self> {
        let Some(engine) = SpeechEngine::detect() else {
            warn!("No speech engine found on PATH, continuing without speech");
            return None;
        };

        let voice = match &engine {
            SpeechEngine::Say(program) => std::process::Command::new(program)
                .args(["-v", "?"])
                .output()
                .ok()
                .map(|out| parse_say_voices(&String::from_utf8_lossy(&out.stdout)))
                .and_then(|available| pick_voice(&available, &config.voices)),
            // espeak voices are variants, not names; use the lighter default.
            SpeechEngine::Espeak(_) => None,
        };

        info!(program = %engine.program().display(), ?voice, "Speech engine ready");
        Some(Self::new(engine, voice, config))
    }

    pub fn args_for(&self, text: &str) -> Vec<String> {
        command_args(&self.engine, self.voice.as_deref(), self.rate, self.pitch, text)
    }

    fn interrupt(&mut self) {
        if let Some(stop_tx) = self.current.take() {
            let _ = stop_tx.send(());
        }
    }
}

impl SpeechAnnouncer for SpeechOutput {
    fn announce(&mut self, text: &str) {
        self.interrupt();

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            debug!("No runtime for speech, skipping");
            return;
        };

        let utterance_id = Uuid::new_v4();
        let mut command = tokio::process::Command::new(self.engine.program());
        command
            .args(self.args_for(text))
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .kill_on_drop(true);

        match command.spawn() {
            Ok(mut child) => {
                debug!(%utterance_id, %text, "Speaking");
                let (stop_tx, mut stop_rx) = oneshot::channel();
                self.current = Some(stop_tx);
                handle.spawn(async move {
                    tokio::select! {
                        _ = child.wait() => {}
                        _ = &mut stop_rx => {
                            let _ = child.kill().await;
                            debug!(%utterance_id, "Utterance interrupted");
                        }
                    }
                });
            }
            Err(e) => warn!("Failed to spawn speech engine: {}", e),
        }
    }

    fn shutdown(&mut self) {
        self.interrupt();
    }
}
