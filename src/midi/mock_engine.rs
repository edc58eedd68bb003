use crate::event_loop::EngineMessage;
use crate::midi::{MidiEngine, MidiMessage, Result};
use crossbeam::channel::Sender;

/// Engine that keeps every outgoing message in memory.
#[derive(Debug, Default)]
pub struct MockMidiEngine {
    sent: Vec<MidiMessage>,
}

impl MockMidiEngine {
    /// Mirrors [`crate::midi::MidirEngine::connect`] without touching any
    /// hardware. Nothing is ever received.
    pub fn connect(
        _input: Option<&str>,
        _output: Option<&str>,
        _events: Sender<EngineMessage>,
    ) -> Result<Self> {
        Ok(Self::default())
    }

    pub fn sent(&self) -> &[MidiMessage] {
        &self.sent
    }

    pub fn take_sent(&mut self) -> Vec<MidiMessage> {
        std::mem::take(&mut self.sent)
    }
}

impl MidiEngine for MockMidiEngine {
    fn send(&mut self, msg: &MidiMessage) -> Result<()> {
        self.sent.push(msg.clone());
        Ok(())
    }

    fn list_devices() -> Vec<String> {
        vec!["Mock Device 1".to_string(), "Mock Device 2".to_string()]
    }
}
