#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Player gestures forwarded by the renderer.
    Input(InputEvent),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputEvent {
    pub source: String,
    pub content: InputContent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputContent {
    /// Index of one of the currently displayed targets.
    Tap(usize),
    /// The "Start Over" control.
    Reset,
}

impl InputEvent {
    pub fn tap(source: &str, index: usize) -> Self {
        Self {
            source: source.to_string(),
            content: InputContent::Tap(index),
        }
    }

    pub fn reset(source: &str) -> Self {
        Self {
            source: source.to_string(),
            content: InputContent::Reset,
        }
    }
}

impl From<InputEvent> for Event {
    fn from(input: InputEvent) -> Self {
        Event::Input(input)
    }
}
