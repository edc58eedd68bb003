use super::engine::{MidiEngine, MidiMessage, MidiSink};
use log::{error, trace, warn};

/// Number of note-offs that can be pending at once.
pub const QUEUE_CAPACITY: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ScheduledNote {
    channel: u8,
    note: u8,
    velocity: u8,
    remaining: u8,
}

impl ScheduledNote {
    fn message(&self) -> MidiMessage {
        MidiMessage::NoteOff {
            channel: self.channel,
            note: self.note,
            velocity: self.velocity,
        }
    }
}

/// Output stage in front of a [`MidiEngine`], holding deferred note-offs.
pub struct OutputQueue<E: MidiEngine> {
    engine: E,
    pending: Vec<ScheduledNote>,
}

impl<E: MidiEngine> OutputQueue<E> {
    pub fn new(engine: E) -> Self {
        OutputQueue {
            engine,
            pending: Vec::with_capacity(QUEUE_CAPACITY),
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Number of note-offs waiting for `channel`.
    pub fn pending(&self, channel: u8) -> usize {
        self.pending.iter().filter(|n| n.channel == channel).count()
    }

    fn deliver(&mut self, msg: MidiMessage) {
        if let Err(e) = self.engine.send(&msg) {
            error!("Failed to send MIDI message {:?}: {}", msg, e);
        }
    }
}

impl<E: MidiEngine> MidiSink for OutputQueue<E> {
    fn send(&mut self, msg: MidiMessage) {
        trace!("Sending {:?}", msg);
        self.deliver(msg);
    }

    fn send_now(&mut self, msg: MidiMessage) {
        self.deliver(msg);
    }

    fn send_later(&mut self, channel: u8, note: u8, velocity: u8, delay: u8) {
        if self.pending.len() >= QUEUE_CAPACITY {
            let oldest = self.pending.remove(0);
            warn!(
                "Note-off queue full, releasing note {} on channel {} early",
                oldest.note, oldest.channel
            );
            self.deliver(oldest.message());
        }
        self.pending.push(ScheduledNote {
            channel,
            note,
            velocity,
            remaining: delay,
        });
    }

    fn send_scheduled_notes(&mut self, channel: u8) {
        let mut due = Vec::new();
        self.pending.retain_mut(|scheduled| {
            if scheduled.channel != channel {
                return true;
            }
            scheduled.remaining = scheduled.remaining.saturating_sub(1);
            if scheduled.remaining == 0 {
                due.push(*scheduled);
                false
            } else {
                true
            }
        });
        for scheduled in due {
            self.deliver(scheduled.message());
        }
    }

    fn flush_queue(&mut self, channel: u8) {
        let (flushed, kept): (Vec<_>, Vec<_>) = self
            .pending
            .drain(..)
            .partition(|scheduled| scheduled.channel == channel);
        self.pending = kept;
        for scheduled in flushed {
            self.deliver(scheduled.message());
        }
    }
}
