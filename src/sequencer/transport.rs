use super::{ClockMode, Sequencer};
use crate::clock::ClockControl;
use crate::midi::{MidiMessage, MidiSink, ALL_NOTES_OFF};
use log::info;

/// Root and last note used when playback starts without a triggering note.
const DEFAULT_ROOT_NOTE: u8 = 60;

impl<O: MidiSink, C: ClockControl> Sequencer<O, C> {
    pub fn start(&mut self) {
        if self.transport.running {
            return;
        }
        if self.params.clock_mode == ClockMode::Internal {
            self.output.send_now(MidiMessage::Start);
        }
        if self.transport.root_note == 0 || self.transport.last_note == 0 {
            self.transport.root_note = DEFAULT_ROOT_NOTE;
            self.transport.last_note = DEFAULT_ROOT_NOTE;
        }
        self.sequence.tick_counter = self.sequence.tick_prescaler.saturating_sub(1);
        self.sequence.step_index = 0;
        self.transport.running = true;
        info!("Sequencer started ({:?} clock)", self.params.clock_mode);
    }

    pub fn stop(&mut self) {
        if !self.transport.running {
            return;
        }
        let channel = self.params.channel;
        self.output.flush_queue(channel);
        self.output.send(MidiMessage::ControlChange {
            channel,
            controller: ALL_NOTES_OFF,
            value: 0,
        });
        if self.params.clock_mode == ClockMode::Internal {
            self.output.send_now(MidiMessage::Stop);
        }
        self.transport.running = false;
        self.transport.root_note = 0;
        self.transport.last_note = 0;
        info!("Sequencer stopped");
    }

    pub fn on_note_on(&mut self, channel: u8, note: u8, velocity: u8) {
        if channel != self.params.channel {
            return;
        }

        let mut echoed = false;
        if !self.params.tracks.note {
            self.output.send(MidiMessage::NoteOn {
                channel,
                note,
                velocity,
            });
            echoed = true;
        }

        if self.is_recording() {
            if !self.transport.running && !echoed {
                self.output.send(MidiMessage::NoteOn {
                    channel,
                    note,
                    velocity,
                });
            }
            self.record(note, velocity);
            return;
        }

        let internal = self.params.clock_mode == ClockMode::Internal;
        if self.transport.running {
            if internal && self.params.tracks.note && note == self.transport.last_note {
                self.stop();
                return;
            }
        } else if internal {
            self.start();
            self.transport.root_note = note;
        }
        if self.transport.running {
            self.transport.last_note = note;
        }
    }

    pub fn on_note_off(&mut self, channel: u8, note: u8, velocity: u8) {
        if channel != self.params.channel {
            return;
        }
        if !self.params.tracks.note || !self.transport.running {
            self.output.send(MidiMessage::NoteOff {
                channel,
                note,
                velocity,
            });
        }
    }

    /// External clock pulse (0xF8).
    pub fn on_clock_event(&mut self) {
        if self.params.clock_mode == ClockMode::External && self.transport.running {
            self.tick();
        }
    }

    /// Pulse from the internal clock. This device is the clock master in
    /// Internal mode, so each pulse is echoed as a real-time clock byte.
    pub fn on_internal_tick(&mut self) {
        if self.params.clock_mode == ClockMode::Internal && self.transport.running {
            self.output.send_now(MidiMessage::Clock);
            self.tick();
        }
    }

    pub fn on_start_event(&mut self) {
        if self.params.clock_mode == ClockMode::External {
            self.start();
        }
    }

    pub fn on_stop_event(&mut self) {
        if self.params.clock_mode == ClockMode::External {
            self.stop();
        }
    }

    /// Resumes playback where it left off, without resetting notes.
    pub fn on_continue_event(&mut self) {
        if self.params.clock_mode == ClockMode::External {
            self.transport.running = true;
            info!("Sequencer continued");
        }
    }
}
