// event_loop.rs

use crate::clock::ClockControl;
use crate::midi::MidiSink;
use crate::sequencer::{EditCursor, ParameterKey, Sequencer};
use crossbeam::channel::Receiver;
use log::{debug, error, info};
use std::sync::{Arc, Mutex};

/// Sequencer shared between the event loop and the UI threads.
pub type SharedSequencer<O, C> = Arc<Mutex<Sequencer<O, C>>>;

/// Everything that can happen to the sequencer.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineMessage {
    /// Pulse from the internal clock thread.
    InternalTick,
    /// Bytes of one message from the MIDI input.
    Midi(Vec<u8>),
    SetParameter(ParameterKey, u8),
    SetPageValue { page: u8, value: u8 },
    SetEditCursor(EditCursor),
}

/// Applies one message to the sequencer.
pub fn dispatch<O: MidiSink, C: ClockControl>(
    sequencer: &mut Sequencer<O, C>,
    message: EngineMessage,
) {
    match message {
        EngineMessage::InternalTick => sequencer.on_internal_tick(),
        EngineMessage::Midi(bytes) => sequencer.on_midi(&bytes),
        EngineMessage::SetParameter(key, value) => sequencer.set_parameter(key, value),
        EngineMessage::SetPageValue { page, value } => sequencer.set_page_value(page, value),
        EngineMessage::SetEditCursor(cursor) => {
            debug!("Edit cursor: {:?}", cursor);
            sequencer.set_edit_cursor(cursor)
        }
    }
}

/// Single consumer of [`EngineMessage`]s. Every mutation of the sequencer
/// happens here, one message at a time.
pub struct EventLoop<O, C> {
    sequencer: SharedSequencer<O, C>,
    rx: Receiver<EngineMessage>,
}

impl<O: MidiSink, C: ClockControl> EventLoop<O, C> {
    pub fn new(sequencer: SharedSequencer<O, C>, rx: Receiver<EngineMessage>) -> Self {
        EventLoop { sequencer, rx }
    }

    /// Runs until every sender has been dropped.
    pub fn run(&self) {
        info!("Event loop started");
        for message in self.rx.iter() {
            match self.sequencer.lock() {
                Ok(mut sequencer) => dispatch(&mut sequencer, message),
                Err(e) => {
                    error!("Sequencer lock poisoned: {}", e);
                    break;
                }
            }
        }
        info!("Event loop stopped, all senders dropped");
    }
}
