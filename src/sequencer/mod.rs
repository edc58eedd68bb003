//! Step sequencer core
//!
//! [`Sequencer`] owns every piece of sequencer state and is driven by
//! discrete events: timing pulses, transport messages, live notes, parameter
//! writes and UI edits. Each call runs to completion. The operations are
//! grouped by concern:
//! - `transport`: start/stop/continue and live note handling
//! - `scheduler`: the per-tick step advance
//! - `recorder`: writing live notes into steps while editing
//! - `pages`: which UI pages are meaningful
//!
//! MIDI output and tick generation are collaborators reached through the
//! [`MidiSink`] and [`ClockControl`] traits.

pub mod division;
mod pages;
mod params;
mod recorder;
mod scheduler;
mod step;
mod transport;

pub use pages::{
    EditCursor, PageDescriptor, PageKind, PageStatus, FIELDS_PER_STEP, NUM_PARAMETER_PAGES,
    NUM_PAGES,
};
pub use params::{ClockMode, GrooveParameters, GrooveTemplate, ParameterKey, Parameters};
pub use scheduler::transpose;
pub use step::{Step, StepField, StepStore, TrackFlags, MAX_STEPS};

use crate::clock::ClockControl;
use crate::midi::{MidiMessage, MidiSink};
use log::debug;

/// Running flag and the notes used for live transposition. Both notes read 0
/// while stopped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransportState {
    pub running: bool,
    pub root_note: u8,
    pub last_note: u8,
}

/// Playback position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceState {
    pub step_index: u8,
    pub tick_counter: u8,
    pub tick_prescaler: u8,
    pub num_steps: u8,
}

impl Default for SequenceState {
    fn default() -> Self {
        Self {
            step_index: 0,
            tick_counter: 0,
            tick_prescaler: division::ticks_per_step(division::DEFAULT_DIVISION),
            num_steps: 16,
        }
    }
}

pub struct Sequencer<O, C> {
    params: Parameters,
    transport: TransportState,
    sequence: SequenceState,
    steps: StepStore,
    cursor: EditCursor,
    output: O,
    clock: C,
}

impl<O: MidiSink, C: ClockControl> Sequencer<O, C> {
    pub fn new(output: O, clock: C) -> Self {
        Self::with_parameters(Parameters::default(), StepStore::default(), output, clock)
    }

    /// Activates the sequencer: pushes the groove to the clock, derives the
    /// prescaler and starts the clock. The transport starts stopped.
    pub fn with_parameters(params: Parameters, steps: StepStore, output: O, clock: C) -> Self {
        let mut sequencer = Sequencer {
            params,
            transport: TransportState::default(),
            sequence: SequenceState::default(),
            steps,
            cursor: EditCursor::default(),
            output,
            clock,
        };
        for key in ParameterKey::ALL.iter().skip(1) {
            let value = sequencer.params.value(*key);
            sequencer.params.store(*key, value);
        }
        sequencer.recompute();
        sequencer.clock.start();
        sequencer
    }

    /// Writes one parameter. Key [`ParameterKey::Running`] starts the
    /// sequencer on 1 and stops it on anything else. Every write refreshes
    /// the clock groove and the prescaler.
    pub fn set_parameter(&mut self, key: ParameterKey, value: u8) {
        debug!("Parameter {:?} <- {}", key, value);
        if key == ParameterKey::Running {
            if value == 1 {
                self.start();
            } else {
                self.stop();
            }
        } else {
            self.params.store(key, value);
        }
        self.recompute();
    }

    pub fn parameter(&self, key: ParameterKey) -> u8 {
        match key {
            ParameterKey::Running => u8::from(self.transport.running),
            _ => self.params.value(key),
        }
    }

    fn recompute(&mut self) {
        self.clock.update(self.params.groove);
        self.sequence.tick_prescaler = division::ticks_per_step(self.params.clock_division);
        self.sequence.num_steps = self.params.num_steps;
        if self.sequence.step_index >= self.sequence.num_steps {
            self.sequence.step_index = 0;
        }
    }

    /// Entry point for every incoming MIDI message, as received on the wire.
    /// Everything except note on/off on the sequencer channel is forwarded
    /// byte for byte, then the decoded message is routed to the matching
    /// transport operation.
    pub fn on_midi(&mut self, bytes: &[u8]) {
        let Some(msg) = MidiMessage::from_bytes(bytes) else {
            return;
        };
        let is_note = matches!(
            msg,
            MidiMessage::NoteOn { .. } | MidiMessage::NoteOff { .. }
        );
        if !is_note || msg.channel() != Some(self.params.channel) {
            self.output.send(MidiMessage::Raw(bytes.to_vec()));
        }

        match msg {
            MidiMessage::NoteOn {
                channel,
                note,
                velocity,
            } => self.on_note_on(channel, note, velocity),
            MidiMessage::NoteOff {
                channel,
                note,
                velocity,
            } => self.on_note_off(channel, note, velocity),
            MidiMessage::Clock => self.on_clock_event(),
            MidiMessage::Start => self.on_start_event(),
            MidiMessage::Stop => self.on_stop_event(),
            MidiMessage::Continue => self.on_continue_event(),
            MidiMessage::ControlChange { .. } | MidiMessage::Raw(_) => {}
        }
    }

    pub fn parameters(&self) -> &Parameters {
        &self.params
    }

    pub fn transport(&self) -> TransportState {
        self.transport
    }

    pub fn sequence(&self) -> SequenceState {
        self.sequence
    }

    pub fn is_running(&self) -> bool {
        self.transport.running
    }

    pub fn steps(&self) -> &StepStore {
        &self.steps
    }

    pub fn steps_mut(&mut self) -> &mut StepStore {
        &mut self.steps
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::RecordingClock;
    use crate::midi::{MockMidiEngine, OutputQueue};

    type TestSequencer = Sequencer<OutputQueue<MockMidiEngine>, RecordingClock>;

    fn sequencer() -> TestSequencer {
        Sequencer::new(
            OutputQueue::new(MockMidiEngine::default()),
            RecordingClock::new(),
        )
    }

    #[test]
    fn test_activation_defaults() {
        let seq = sequencer();
        assert!(!seq.is_running());
        assert!(seq.clock().is_started());
        assert_eq!(seq.clock().updates().len(), 1);
        assert_eq!(seq.sequence().tick_prescaler, 6);
        assert_eq!(seq.sequence().step_index, 0);
    }

    #[test]
    fn test_every_write_recomputes() {
        let mut seq = sequencer();
        seq.set_parameter(ParameterKey::CcNumber, 20);
        seq.set_parameter(ParameterKey::Bpm, 90);
        assert_eq!(seq.clock().updates().len(), 3);
        assert_eq!(seq.clock().last_update().map(|g| g.bpm), Some(90));

        seq.set_parameter(ParameterKey::ClockDivision, 8);
        assert_eq!(seq.sequence().tick_prescaler, 24);
    }

    #[test]
    fn test_running_key_drives_transport() {
        let mut seq = sequencer();
        seq.set_parameter(ParameterKey::Running, 1);
        assert!(seq.is_running());
        assert_eq!(seq.parameter(ParameterKey::Running), 1);
        seq.set_parameter(ParameterKey::Running, 0);
        assert!(!seq.is_running());
    }

    #[test]
    fn test_shrinking_sequence_keeps_index_in_range() {
        let mut seq = sequencer();
        seq.start();
        for _ in 0..(10 * 6) {
            seq.tick();
        }
        assert_eq!(seq.sequence().step_index, 10);
        seq.set_parameter(ParameterKey::NumSteps, 4);
        assert_eq!(seq.sequence().step_index, 0);
    }

    fn forwarded(seq: &TestSequencer) -> Vec<Vec<u8>> {
        seq.output()
            .engine()
            .sent()
            .iter()
            .map(|msg| msg.to_bytes())
            .collect()
    }

    #[test]
    fn test_forwards_foreign_messages() {
        let mut seq = sequencer();
        let foreign: [&[u8]; 4] = [
            &[0x95, 40, 90],
            &[0xB0, 1, 64],
            &[0xE0, 0x00, 0x40],
            &[0xF0, 0x7E, 0x7F, 0xF7],
        ];
        for bytes in foreign {
            seq.on_midi(bytes);
        }
        assert_eq!(forwarded(&seq), foreign.map(<[u8]>::to_vec));
        assert!(!seq.is_running());
    }

    #[test]
    fn test_foreign_zero_velocity_note_on_forwarded_unchanged() {
        let mut seq = sequencer();
        seq.on_midi(&[0x95, 40, 0]);
        assert_eq!(forwarded(&seq), vec![vec![0x95, 40, 0]]);
    }

    #[test]
    fn test_own_notes_are_not_forwarded() {
        let mut seq = sequencer();
        seq.on_midi(&[0x90, 62, 100]);
        assert!(seq.is_running());
        assert_eq!(seq.transport().root_note, 62);
        assert_eq!(forwarded(&seq), vec![vec![0xFA]]);

        // A zero-velocity note-on is a note-off for the transport.
        seq.on_midi(&[0x90, 62, 0]);
        assert!(seq.is_running());
        assert_eq!(forwarded(&seq), vec![vec![0xFA]]);
    }

    #[test]
    fn test_incomplete_message_ignored() {
        let mut seq = sequencer();
        seq.on_midi(&[]);
        assert!(forwarded(&seq).is_empty());
    }
}
