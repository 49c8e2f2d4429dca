//! Terminal input: a blocking reader pumping crossterm events into a
//! channel, and the mapping from raw events to game actions.

use anyhow::{anyhow, Result};
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::layout::{Hit, ScreenLayout};
use crate::kernel::event::InputEvent;
use crate::kernel::state::GameView;

const INPUT_POLL_TIMEOUT: Duration = Duration::from_millis(25); // shutdown responsiveness
const INPUT_CHANNEL_CAPACITY: usize = 256;
const MAX_EVENTS_PER_FRAME: usize = 32; // never starve rendering

const SOURCE_KEYBOARD: &str = "keyboard";
const SOURCE_MOUSE: &str = "mouse";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    Input(InputEvent),
    Quit,
}

/// Map one terminal event to a game action. Only targets currently on screen
/// produce taps.
pub fn map_event(event: &Event, view: &GameView, layout: &ScreenLayout) -> Option<UiAction> {
    match event {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) => map_key(*code, *modifiers, view),
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            ..
        }) => match layout.hit_test(view.level, *column, *row)? {
            Hit::Tile(index) => Some(UiAction::Input(InputEvent::tap(SOURCE_MOUSE, index))),
            Hit::StartOver => Some(UiAction::Input(InputEvent::reset(SOURCE_MOUSE))),
        },
        _ => None,
    }
}

fn map_key(code: KeyCode, modifiers: KeyModifiers, view: &GameView) -> Option<UiAction> {
    match code {
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Some(UiAction::Quit),
        KeyCode::Char('q') | KeyCode::Esc => Some(UiAction::Quit),
        KeyCode::Char('r') | KeyCode::Char('R') => {
            Some(UiAction::Input(InputEvent::reset(SOURCE_KEYBOARD)))
        }
        KeyCode::Char(c) if c.is_ascii_digit() => {
            let index = digit_index(c)?;
            (index < view.level).then(|| UiAction::Input(InputEvent::tap(SOURCE_KEYBOARD, index)))
        }
        KeyCode::Char(' ') | KeyCode::Enter => view
            .next_untapped()
            .map(|index| UiAction::Input(InputEvent::tap(SOURCE_KEYBOARD, index))),
        _ => None,
    }
}

/// '1'..'9' -> 0..8, '0' -> 9.
fn digit_index(c: char) -> Option<usize> {
    match c.to_digit(10)? {
        0 => Some(9),
        d => Some(d as usize - 1),
    }
}

enum InputMsg {
    Event(Event),
    Error(String),
}

pub struct InputPump {
    rx: mpsc::Receiver<InputMsg>,
    cancel: CancellationToken,
    join: Option<tokio::task::JoinHandle<()>>,
}

impl InputPump {
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel(INPUT_CHANNEL_CAPACITY);
        let cancel = CancellationToken::new();
        let stop = cancel.clone();

        let join = tokio::task::spawn_blocking(move || input_loop(stop, tx));
        Self {
            rx,
            cancel,
            join: Some(join),
        }
    }

    /// Non-blocking: whatever arrived since the last frame.
    pub fn drain(&mut self) -> Result<Vec<Event>> {
        let mut events = Vec::new();
        while events.len() < MAX_EVENTS_PER_FRAME {
            match self.rx.try_recv() {
                Ok(InputMsg::Event(ev)) => events.push(ev),
                Ok(InputMsg::Error(e)) => return Err(anyhow!("terminal input failed: {e}")),
                Err(_) => break,
            }
        }
        Ok(events)
    }

    pub async fn shutdown(&mut self) {
        self.rx.close();
        self.cancel.cancel();
        if let Some(join) = self.join.take() {
            let _ = tokio::time::timeout(Duration::from_secs(2), join).await;
        }
    }
}

impl Default for InputPump {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for InputPump {
    fn drop(&mut self) {
        // Best-effort stop if caller exits early; do not block in Drop.
        self.rx.close();
        self.cancel.cancel();
    }
}

fn input_loop(stop: CancellationToken, tx: mpsc::Sender<InputMsg>) {
    while !stop.is_cancelled() {
        match event::poll(INPUT_POLL_TIMEOUT) {
            Ok(true) => match event::read() {
                Ok(ev) => {
                    if tx.blocking_send(InputMsg::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                    break;
                }
            },
            Ok(false) => {}
            Err(e) => {
                let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                break;
            }
        }
    }
    debug!("Input loop stopped");
}
