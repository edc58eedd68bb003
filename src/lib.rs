pub mod cli;
pub mod clock;
pub mod config;
pub mod event_loop;
pub mod logging;
pub mod midi;
pub mod sequencer;
pub mod ui;

pub use cli::{handle_device_list, validate_device, Args};
pub use clock::{ClockControl, InternalClock, RecordingClock};
pub use event_loop::{EngineMessage, EventLoop, SharedSequencer};
pub use sequencer::Sequencer;
