use super::{Sequencer, StepField};
use crate::clock::ClockControl;
use crate::midi::MidiSink;
use log::debug;

impl<O: MidiSink, C: ClockControl> Sequencer<O, C> {
    /// True while the UI is editing one of the step pages.
    pub fn is_recording(&self) -> bool {
        self.cursor.editing && self.cursor.on_step_page()
    }

    /// Stores a live note into the step under the edit cursor. Velocity is
    /// only kept when the velocity track is on.
    pub fn record(&mut self, note: u8, velocity: u8) {
        let step = usize::from(self.cursor.page_index());
        self.steps.set_field(step, StepField::Note, note);
        if self.params.tracks.velocity {
            self.steps.set_field(step, StepField::Velocity, velocity >> 3);
        }
        debug!("Recorded note {} velocity {} into step {}", note, velocity, step);
    }
}

#[cfg(test)]
mod tests {
    use crate::clock::RecordingClock;
    use crate::midi::{MidiMessage, MockMidiEngine, OutputQueue};
    use crate::sequencer::{EditCursor, ParameterKey, Sequencer};

    type TestSequencer = Sequencer<OutputQueue<MockMidiEngine>, RecordingClock>;

    fn sequencer() -> TestSequencer {
        Sequencer::new(
            OutputQueue::new(MockMidiEngine::default()),
            RecordingClock::new(),
        )
    }

    #[test]
    fn test_not_recording_on_parameter_pages() {
        let mut seq = sequencer();
        seq.set_edit_cursor(EditCursor::new(true, 5));
        assert!(!seq.is_recording());
        seq.set_edit_cursor(EditCursor::new(false, 20));
        assert!(!seq.is_recording());
    }

    #[test]
    fn test_records_note_into_cursor_step() {
        let mut seq = sequencer();
        seq.set_edit_cursor(EditCursor::new(true, 13 + 4 * 3 + 1));
        seq.on_note_on(0, 71, 127);

        let step = seq.steps().get(3);
        assert_eq!(step.note, 71);
        assert_eq!(step.velocity, 12, "velocity untouched without velocity track");
        assert!(!seq.is_running(), "recording must not start playback");
        assert_eq!(
            seq.output().engine().sent(),
            &[MidiMessage::NoteOn {
                channel: 0,
                note: 71,
                velocity: 127
            }]
        );
    }

    #[test]
    fn test_records_scaled_velocity() {
        let mut seq = sequencer();
        seq.set_parameter(ParameterKey::VelocityTrack, 1);
        seq.set_edit_cursor(EditCursor::new(true, 13));
        seq.record(48, 100);
        assert_eq!(seq.steps().get(0).note, 48);
        assert_eq!(seq.steps().get(0).velocity, 12);
    }

    #[test]
    fn test_no_echo_while_running() {
        let mut seq = sequencer();
        seq.start();
        seq.output_mut().engine_mut().take_sent();
        seq.set_edit_cursor(EditCursor::new(true, 13));
        seq.on_note_on(0, 50, 90);
        assert!(seq.output().engine().sent().is_empty());
        assert_eq!(seq.steps().get(0).note, 50);
        assert!(seq.is_running());
    }
}
