//! countup binary.
//!
//! main() -> GameConfig::load() -> Capabilities -> Driver -> TUI or headless loop
//!
//! One frame per kernel tick:
//! 1. Drain terminal input and map it to taps/resets
//! 2. Driver step (kernel tick + side effects)
//! 3. Step confetti
//! 4. Draw

use std::{
    fs::{self, OpenOptions},
    io::{stdout, Stdout},
    path::{Path, PathBuf},
    sync::Mutex,
    time::Duration,
};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::Instrument;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use uuid::Uuid;

use countup::kernel::time::TICK_MS;
use countup::outputs::confetti::Confetti;
use countup::outputs::Capabilities;
use countup::ui::input::{map_event, InputPump, UiAction};
use countup::ui::layout::ScreenLayout;
use countup::ui::theme::palette;
use countup::{headless, ui, Driver, GameConfig, Variant};

const LOG_FILE: &str = "countup.log";

#[derive(Parser)]
#[command(name = "countup", version, about = "A counting game for small children")]
struct Cli {
    /// Path to a TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, value_enum)]
    variant: Option<Variant>,

    /// Disable tones
    #[arg(long)]
    mute: bool,

    #[arg(long)]
    no_speech: bool,

    #[arg(long)]
    high_contrast: bool,

    /// Read commands from stdin instead of drawing a screen
    #[arg(long)]
    headless: bool,
}

impl Cli {
    fn apply(&self, config: &mut GameConfig) {
        if let Some(variant) = self.variant {
            config.variant = variant;
        }
        if self.mute {
            config.audio.enabled = false;
        }
        if self.no_speech {
            config.speech.enabled = Some(false);
        }
        if self.high_contrast {
            config.high_contrast = true;
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

fn init_tracing(headless: bool, log_dir: Option<&Path>) {
    if headless {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(env_filter())
            .init();
        return;
    }

    match open_log_file(log_dir) {
        Ok((path, file)) => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .with(env_filter())
                .init();
            tracing::info!(path = %path.display(), "Logging initialized");
        }
        // No logs beats writing over the screen.
        Err(_) => tracing_subscriber::registry().with(env_filter()).init(),
    }
}

fn open_log_file(log_dir: Option<&Path>) -> Result<(PathBuf, fs::File)> {
    let dir = log_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(".countup").join("logs"));
    fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
    let path = dir.join(LOG_FILE);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening {}", path.display()))?;
    Ok((path, file))
}

/// Raw mode, alternate screen and mouse capture for the lifetime of the value.
/// Restored on drop, including on early return.
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self> {
        enable_raw_mode()?;

        let mut out = stdout();
        if let Err(err) = execute!(out, EnterAlternateScreen, EnableMouseCapture) {
            let _ = disable_raw_mode();
            let _ = execute!(out, DisableMouseCapture, LeaveAlternateScreen);
            return Err(err.into());
        }

        match Terminal::new(CrosstermBackend::new(out)) {
            Ok(terminal) => Ok(Self { terminal }),
            Err(err) => {
                let _ = disable_raw_mode();
                let _ = execute!(stdout(), DisableMouseCapture, LeaveAlternateScreen);
                Err(err.into())
            }
        }
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(
            self.terminal.backend_mut(),
            DisableMouseCapture,
            LeaveAlternateScreen
        );
        let _ = self.terminal.show_cursor();
    }
}

async fn run_tui(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    driver: &mut Driver,
    confetti: &Confetti,
    high_contrast: bool,
) -> Result<()> {
    let palette = palette(high_contrast);
    let mut input = InputPump::new();
    let mut layout = ScreenLayout::default();

    let mut cadence = tokio::time::interval(Duration::from_millis(TICK_MS));
    cadence.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let result = loop {
        cadence.tick().await;

        let events = match input.drain() {
            Ok(events) => events,
            Err(e) => break Err(e),
        };

        let view = driver.view();
        let mut quit = false;
        for event in &events {
            match map_event(event, &view, &layout) {
                Some(UiAction::Input(gesture)) => driver.submit(gesture),
                Some(UiAction::Quit) => quit = true,
                None => {}
            }
        }
        if quit {
            break Ok(());
        }

        driver.step();
        confetti.step();

        let view = driver.view();
        let particles = confetti.snapshot();
        if let Err(e) = terminal.draw(|frame| {
            layout = ui::draw(frame, &view, &particles, &palette);
        }) {
            break Err(e.into());
        }
    };

    input.shutdown().await;
    result
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = GameConfig::load(cli.config.as_deref()).context("loading config")?;
    cli.apply(&mut config);

    init_tracing(cli.headless, config.log_dir.as_deref());

    let session_id = Uuid::new_v4();
    let session = tracing::info_span!("session", id = %session_id);
    async move {
        tracing::info!(variant = ?config.variant, headless = cli.headless, "countup starting");

        let confetti = (!cli.headless).then(Confetti::new);
        let caps = Capabilities::from_config(&config, confetti.clone());
        let mut driver = Driver::with_session(&config, caps, session_id);

        let result = match confetti {
            Some(confetti) => {
                let mut screen = TerminalSession::new()?;
                run_tui(
                    &mut screen.terminal,
                    &mut driver,
                    &confetti,
                    config.high_contrast,
                )
                .await
            }
            None => headless::run(&mut driver).await,
        };

        driver.shutdown();
        if let Err(e) = &result {
            tracing::error!("Exited with error: {e:#}");
        }
        result
    }
    .instrument(session)
    .await
}
