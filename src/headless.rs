//! Line-driven frontend without a terminal UI.
//!
//! Reads `tap <i>`, `reset` and `quit` from stdin, one per line, and logs
//! the visible state whenever it changes.

use std::io::BufRead;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc::{self, error::TryRecvError};
use tracing::{debug, info, warn};

use crate::driver::Driver;
use crate::kernel::event::{InputContent, InputEvent};
use crate::kernel::state::GameView;
use crate::kernel::time::TICK_MS;
use crate::ui::prompt_text;

const SOURCE_STDIN: &str = "stdin";
const COMMAND_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Input(InputEvent),
    Quit,
}

/// `None` for blank lines and anything unrecognised.
pub fn parse_line(line: &str) -> Option<Command> {
    let mut words = line.split_whitespace();
    match words.next()?.to_ascii_lowercase().as_str() {
        "tap" => {
            let index = words.next()?.parse().ok()?;
            Some(Command::Input(InputEvent::tap(SOURCE_STDIN, index)))
        }
        "reset" => Some(Command::Input(InputEvent::reset(SOURCE_STDIN))),
        "quit" | "exit" => Some(Command::Quit),
        _ => None,
    }
}

/// Stdin counterpart of the key map: only taps on targets that are on
/// screen and open for input reach the kernel.
#[derive(Debug, Clone, Copy)]
pub struct TapGate {
    level: usize,
    open: bool,
}

impl TapGate {
    pub fn new(view: &GameView) -> Self {
        Self {
            level: view.level,
            open: view.phase.accepts_taps(),
        }
    }

    pub fn admit(&mut self, input: InputEvent) -> Option<InputEvent> {
        match input.content {
            InputContent::Tap(index) if !self.open => {
                debug!(index, "Tap dropped: input locked");
                None
            }
            InputContent::Tap(index) if index >= self.level => {
                warn!(index, level = self.level, "Tap dropped: no such target");
                None
            }
            InputContent::Tap(_) => Some(input),
            InputContent::Reset => {
                // Later taps in the same batch land on the fresh first level.
                self.level = 1;
                self.open = true;
                Some(input)
            }
        }
    }
}

/// Blocking line reader. Returns on EOF, read error, `quit`, or once the
/// receiving side is gone.
pub fn pump_lines<R: BufRead>(reader: R, tx: mpsc::Sender<Command>) {
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!("stdin read failed: {e}");
                break;
            }
        };
        match parse_line(&line) {
            Some(command) => {
                let quit = command == Command::Quit;
                if tx.blocking_send(command).is_err() || quit {
                    break;
                }
            }
            None if line.trim().is_empty() => {}
            None => warn!(%line, "Unrecognised command"),
        }
    }
    debug!("Command reader stopped");
}

/// Submit everything queued since the last frame. Returns `false` once the
/// reader asked to quit or hung up.
pub fn forward_commands(driver: &Driver, commands: &mut mpsc::Receiver<Command>) -> bool {
    let mut gate = TapGate::new(&driver.view());
    loop {
        match commands.try_recv() {
            Ok(Command::Input(input)) => {
                if let Some(input) = gate.admit(input) {
                    driver.submit(input);
                }
            }
            Ok(Command::Quit) | Err(TryRecvError::Disconnected) => return false,
            Err(TryRecvError::Empty) => return true,
        }
    }
}

pub async fn run(driver: &mut Driver) -> Result<()> {
    let (tx, mut commands) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
    // Detached: a blocked stdin read must not hold up runtime shutdown.
    std::thread::Builder::new()
        .name("stdin-commands".into())
        .spawn(move || pump_lines(std::io::stdin().lock(), tx))?;

    let mut cadence = tokio::time::interval(Duration::from_millis(TICK_MS));
    cadence.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    info!("Headless session started. Commands: tap <i>, reset, quit");
    let mut last_visible = None;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = cadence.tick() => {}
        }

        let running = forward_commands(driver, &mut commands);

        for effect in driver.step() {
            debug!(?effect, "Effect");
        }

        let view = driver.view();
        let visible = (view.level, view.tapped.len(), view.phase);
        if last_visible != Some(visible) {
            last_visible = Some(visible);
            info!(
                level = view.level,
                tapped = view.tapped.len(),
                phase = ?view.phase,
                prompt = %prompt_text(&view),
                "State"
            );
        }

        if !running {
            break;
        }
    }

    Ok(())
}
