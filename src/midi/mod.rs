//! MIDI functionality for the step sequencer
//!
//! This module provides MIDI communication capabilities, including:
//! - Core MIDI message types, byte encoding and error handling
//! - The output stage with deferred note-off scheduling
//! - Real MIDI device communication via midir
//! - Mock implementations for testing
//!
//! The main components are:
//! - [`MidiEngine`] trait for talking to a device
//! - [`MidiSink`] trait, the output contract the sequencer drives
//! - [`OutputQueue`] which implements [`MidiSink`] on top of any engine
//! - [`MidirEngine`] for real MIDI device communication
//! - [`MockMidiEngine`] for testing
//!
mod engine;
pub mod midir_engine;
pub mod mock_engine;
mod output;

pub use engine::{MidiEngine, MidiError, MidiMessage, MidiSink, Result, ALL_NOTES_OFF};
pub use midir_engine::MidirEngine;
pub use mock_engine::MockMidiEngine;
pub use output::{OutputQueue, QUEUE_CAPACITY};

// Set default engine type
#[cfg(not(feature = "test-mock"))]
pub type DefaultMidiEngine = MidirEngine;
#[cfg(feature = "test-mock")]
pub type DefaultMidiEngine = MockMidiEngine;
