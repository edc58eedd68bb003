use super::progress::{create_step_progress, create_transport_spinner};
use crate::clock::ClockControl;
use crate::event_loop::SharedSequencer;
use crate::midi::MidiSink;
use crate::sequencer::Sequencer;
use indicatif::{MultiProgress, ProgressDrawTarget};
use log::error;
use std::thread;
use std::time::Duration;

/// One-line summary of the transport.
pub fn status_line<O: MidiSink, C: ClockControl>(sequencer: &Sequencer<O, C>) -> String {
    let params = sequencer.parameters();
    let transport = sequencer.transport();
    let state = if transport.running {
        "running"
    } else {
        "stopped"
    };
    format!(
        "{} | {:?} clock | {} BPM {} {} | ch {} | root {} last {}",
        state,
        params.clock_mode,
        params.groove.bpm,
        params.groove.template.name(),
        params.groove.amount,
        params.channel + 1,
        transport.root_note,
        transport.last_note,
    )
}

/// Redraws the status display until the sequencer lock is poisoned.
pub fn run_state_inspector<O: MidiSink, C: ClockControl>(sequencer: SharedSequencer<O, C>) {
    let multi_progress = MultiProgress::with_draw_target(ProgressDrawTarget::stderr());
    let step_pb = multi_progress.add(create_step_progress(16));
    let transport_pb = multi_progress.add(create_transport_spinner());

    loop {
        thread::sleep(Duration::from_millis(100));
        let (position, length, message) = match sequencer.lock() {
            Ok(seq) => {
                let sequence = seq.sequence();
                (
                    u64::from(sequence.step_index),
                    u64::from(sequence.num_steps),
                    status_line(&seq),
                )
            }
            Err(e) => {
                error!("Sequencer lock poisoned, inspector exiting: {}", e);
                return;
            }
        };

        step_pb.set_length(length);
        step_pb.set_position(position);
        transport_pb.set_message(message);
        transport_pb.tick();
    }
}
