use std::error::Error;
use std::fmt;

/// Controller number of the "all notes off" channel mode message.
pub const ALL_NOTES_OFF: u8 = 123;

/// Custom error type for MIDI operations
#[derive(Debug)]
pub enum MidiError {
    /// Error when sending a MIDI message
    SendError(String),
    /// Error when connecting to a MIDI device
    ConnectionError(String),
    /// No port matched the requested device name
    DeviceNotFound(String),
}

impl fmt::Display for MidiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MidiError::SendError(msg) => write!(f, "MIDI send error: {}", msg),
            MidiError::ConnectionError(msg) => write!(f, "MIDI connection error: {}", msg),
            MidiError::DeviceNotFound(name) => write!(f, "MIDI device '{}' not found", name),
        }
    }
}

impl Error for MidiError {}

impl From<midir::InitError> for MidiError {
    fn from(e: midir::InitError) -> Self {
        MidiError::ConnectionError(e.to_string())
    }
}

impl From<midir::PortInfoError> for MidiError {
    fn from(e: midir::PortInfoError) -> Self {
        MidiError::ConnectionError(e.to_string())
    }
}

impl<T> From<midir::ConnectError<T>> for MidiError {
    fn from(e: midir::ConnectError<T>) -> Self {
        MidiError::ConnectionError(e.kind().to_string())
    }
}

impl From<midir::SendError> for MidiError {
    fn from(e: midir::SendError) -> Self {
        MidiError::SendError(e.to_string())
    }
}

/// Represents a MIDI message that can be sent or received
#[derive(Debug, Clone, PartialEq)]
pub enum MidiMessage {
    /// Note On message with note number and velocity
    NoteOn { channel: u8, note: u8, velocity: u8 },
    /// Note Off message with note number and velocity
    NoteOff { channel: u8, note: u8, velocity: u8 },
    /// Control Change message with controller number and value
    ControlChange {
        channel: u8,
        controller: u8,
        value: u8,
    },
    /// MIDI Clock timing message
    Clock,
    /// MIDI Start message
    Start,
    /// MIDI Stop message
    Stop,
    /// MIDI Continue message
    Continue,
    /// Anything else, kept as the original bytes for pass-through
    Raw(Vec<u8>),
}

impl MidiMessage {
    /// Decodes one complete message. A note-on with velocity 0 decodes as a
    /// note-off.
    pub fn from_bytes(data: &[u8]) -> Option<MidiMessage> {
        let status = *data.first()?;

        let msg = match status & 0xF0 {
            0x90 if data.len() >= 3 && data[2] == 0 => MidiMessage::NoteOff {
                channel: status & 0x0F,
                note: data[1],
                velocity: 0,
            },
            0x90 if data.len() >= 3 => MidiMessage::NoteOn {
                channel: status & 0x0F,
                note: data[1],
                velocity: data[2],
            },
            0x80 if data.len() >= 3 => MidiMessage::NoteOff {
                channel: status & 0x0F,
                note: data[1],
                velocity: data[2],
            },
            0xB0 if data.len() >= 3 => MidiMessage::ControlChange {
                channel: status & 0x0F,
                controller: data[1],
                value: data[2],
            },
            _ => match status {
                0xF8 => MidiMessage::Clock,
                0xFA => MidiMessage::Start,
                0xFC => MidiMessage::Stop,
                0xFB => MidiMessage::Continue,
                _ => MidiMessage::Raw(data.to_vec()),
            },
        };
        Some(msg)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            MidiMessage::NoteOn {
                channel,
                note,
                velocity,
            } => vec![0x90 | (channel & 0x0F), note & 0x7F, velocity & 0x7F],
            MidiMessage::NoteOff {
                channel,
                note,
                velocity,
            } => vec![0x80 | (channel & 0x0F), note & 0x7F, velocity & 0x7F],
            MidiMessage::ControlChange {
                channel,
                controller,
                value,
            } => vec![0xB0 | (channel & 0x0F), controller & 0x7F, value & 0x7F],
            MidiMessage::Clock => vec![0xF8],
            MidiMessage::Start => vec![0xFA],
            MidiMessage::Stop => vec![0xFC],
            MidiMessage::Continue => vec![0xFB],
            MidiMessage::Raw(bytes) => bytes.clone(),
        }
    }

    /// Channel of a channel voice message.
    pub fn channel(&self) -> Option<u8> {
        match self {
            MidiMessage::NoteOn { channel, .. }
            | MidiMessage::NoteOff { channel, .. }
            | MidiMessage::ControlChange { channel, .. } => Some(*channel),
            MidiMessage::Raw(bytes) => match bytes.first() {
                Some(status) if (0x80..0xF0).contains(status) => Some(status & 0x0F),
                _ => None,
            },
            _ => None,
        }
    }
}

/// Result type for MIDI operations
pub type Result<T> = std::result::Result<T, MidiError>;

/// Trait defining the interface for MIDI engine implementations
pub trait MidiEngine: Send {
    /// Sends a MIDI message to the device
    fn send(&mut self, msg: &MidiMessage) -> Result<()>;

    /// Names of the MIDI ports this engine can bind to
    fn list_devices() -> Vec<String>
    where
        Self: Sized;
}

/// Output side as seen by the sequencer. Calls never fail; implementations
/// deal with device errors themselves.
pub trait MidiSink {
    /// Queues a message for output.
    fn send(&mut self, msg: MidiMessage);

    /// Sends a real-time message ahead of anything queued.
    fn send_now(&mut self, msg: MidiMessage);

    /// Schedules a note-off on `channel` after `delay` further calls to
    /// [`MidiSink::send_scheduled_notes`].
    fn send_later(&mut self, channel: u8, note: u8, velocity: u8, delay: u8);

    /// Advances the countdown of every pending note for `channel` by one tick
    /// and delivers the ones that are due.
    fn send_scheduled_notes(&mut self, channel: u8);

    /// Delivers every pending note for `channel` immediately.
    fn flush_queue(&mut self, channel: u8);
}
