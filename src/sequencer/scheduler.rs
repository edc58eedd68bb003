use super::{division, Sequencer};
use crate::clock::ClockControl;
use crate::midi::{MidiMessage, MidiSink};
use log::trace;

/// Velocity used when the velocity track is off.
const DEFAULT_VELOCITY: u8 = 0x64;

/// Applies live transposition: the step pitch is an offset from `root`,
/// moved to `last`. Always lands in [0, 127].
pub fn transpose(note: u8, root: u8, last: u8) -> u8 {
    let pitch = i16::from(note) + i16::from(last) - i16::from(root);
    pitch.clamp(0, 127) as u8
}

impl<O: MidiSink, C: ClockControl> Sequencer<O, C> {
    /// Advances time by one pulse. Due note-offs go out first, then, once
    /// every `tick_prescaler` pulses, the current step plays and the
    /// position moves on.
    pub fn tick(&mut self) {
        let channel = self.params.channel;
        self.sequence.tick_counter = self.sequence.tick_counter.saturating_add(1);

        self.output.send_scheduled_notes(channel);

        if self.sequence.tick_counter < self.sequence.tick_prescaler {
            return;
        }
        self.sequence.tick_counter = 0;

        let step = self.steps.get(usize::from(self.sequence.step_index));
        let tracks = self.params.tracks;

        let duration = if tracks.duration {
            division::ticks_per_step(step.duration)
        } else {
            self.sequence.tick_prescaler
        };
        let velocity = if tracks.velocity {
            step.velocity * 8
        } else {
            DEFAULT_VELOCITY
        };

        if tracks.cc {
            self.output.send(MidiMessage::ControlChange {
                channel,
                controller: self.params.cc_number & 0x7F,
                value: step.cc & 0x7F,
            });
        }

        if tracks.note && velocity != 0 {
            let note = transpose(
                step.note,
                self.transport.root_note,
                self.transport.last_note,
            );
            trace!(
                "Step {}: note {} velocity {} for {} ticks",
                self.sequence.step_index,
                note,
                velocity,
                duration
            );
            self.output.send(MidiMessage::NoteOn {
                channel,
                note,
                velocity,
            });
            self.output
                .send_later(channel, note, 0, duration.saturating_sub(1));
        }

        self.sequence.step_index += 1;
        if self.sequence.step_index >= self.sequence.num_steps {
            self.sequence.step_index = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transpose_identity() {
        assert_eq!(transpose(60, 60, 60), 60);
        assert_eq!(transpose(72, 60, 60), 72);
    }

    #[test]
    fn test_transpose_follows_last_note() {
        assert_eq!(transpose(60, 60, 67), 67);
        assert_eq!(transpose(64, 60, 55), 59);
    }

    #[test]
    fn test_transpose_clamps() {
        assert_eq!(transpose(120, 10, 127), 127);
        assert_eq!(transpose(0, 127, 0), 0);
    }

    #[test]
    fn test_transpose_stays_in_midi_range() {
        for note in (0..=127).step_by(7) {
            for root in (0..=127).step_by(11) {
                for last in (0..=127).step_by(13) {
                    assert!(transpose(note, root, last) <= 127);
                }
            }
        }
    }
}
