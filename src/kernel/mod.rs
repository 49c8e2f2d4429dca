pub mod event;
pub mod phase;
pub mod reactor;
pub mod scheduler;
pub mod sequencer;
pub mod state;
pub mod telemetry;
pub mod theme;
pub mod time;
