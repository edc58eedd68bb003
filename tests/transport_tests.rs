use stepseqrs::midi::{MidiMessage, MockMidiEngine, OutputQueue, ALL_NOTES_OFF};
use stepseqrs::sequencer::{transpose, ClockMode, ParameterKey};
use stepseqrs::{RecordingClock, Sequencer};

type TestSequencer = Sequencer<OutputQueue<MockMidiEngine>, RecordingClock>;

fn sequencer() -> TestSequencer {
    Sequencer::new(
        OutputQueue::new(MockMidiEngine::default()),
        RecordingClock::new(),
    )
}

fn all_notes_off_count(seq: &TestSequencer) -> usize {
    seq.output()
        .engine()
        .sent()
        .iter()
        .filter(|msg| {
            matches!(
                msg,
                MidiMessage::ControlChange {
                    controller: ALL_NOTES_OFF,
                    value: 0,
                    ..
                }
            )
        })
        .count()
}

#[test]
fn test_transposition_stays_in_midi_range() {
    for note in (0..=127).step_by(7) {
        for root in (0..=127).step_by(11) {
            for last in (0..=127).step_by(13) {
                assert!(transpose(note, root, last) <= 127);
            }
        }
    }
    assert_eq!(transpose(0, 127, 0), 0);
    assert_eq!(transpose(127, 0, 127), 127);
    assert_eq!(transpose(64, 60, 62), 66);
}

#[test]
fn test_stop_is_idempotent() {
    let mut seq = sequencer();
    seq.start();
    seq.stop();
    seq.stop();
    assert_eq!(all_notes_off_count(&seq), 1);
}

#[test]
fn test_stop_while_stopped_sends_nothing() {
    let mut seq = sequencer();
    seq.stop();
    assert!(seq.output().engine().sent().is_empty());
}

#[test]
fn test_start_without_notes_uses_middle_c() {
    let mut seq = sequencer();
    seq.start();
    let transport = seq.transport();
    assert_eq!(transport.root_note, 60);
    assert_eq!(transport.last_note, 60);
}

#[test]
fn test_note_on_while_stopped_starts_from_that_note() {
    let mut seq = sequencer();
    assert_eq!(seq.parameters().clock_mode, ClockMode::Internal);
    seq.on_midi(&[0x90, 50, 80]);
    let transport = seq.transport();
    assert!(transport.running);
    assert_eq!(transport.root_note, 50);
    assert_eq!(transport.last_note, 50);
}

#[test]
fn test_external_clock_drives_steps() {
    let mut seq = sequencer();
    seq.set_parameter(ParameterKey::ClockMode, 1);
    seq.on_midi(&[0xFA]);
    for _ in 0..6 {
        seq.on_midi(&[0xF8]);
    }
    assert_eq!(seq.sequence().step_index, 1);

    let sent = seq.output().engine().sent();
    // Real-time bytes pass through once, the sequencer never adds its own.
    assert_eq!(sent.iter().filter(|m| m.to_bytes() == [0xF8]).count(), 6);
    assert_eq!(sent.iter().filter(|m| m.to_bytes() == [0xFA]).count(), 1);
    assert!(sent.contains(&MidiMessage::NoteOn {
        channel: 0,
        note: 60,
        velocity: 100
    }));
}

#[test]
fn test_internal_ticks_ignored_in_external_mode() {
    let mut seq = sequencer();
    seq.set_parameter(ParameterKey::ClockMode, 1);
    seq.on_start_event();
    seq.on_internal_tick();
    assert_eq!(seq.sequence().tick_counter, 5);
}

#[test]
fn test_groove_changes_reach_the_clock() {
    let mut seq = sequencer();
    assert!(seq.clock().is_started());
    seq.set_parameter(ParameterKey::Bpm, 90);
    seq.set_parameter(ParameterKey::GrooveAmount, 64);
    let groove = seq.clock().last_update().unwrap();
    assert_eq!(groove.bpm, 90);
    assert_eq!(groove.amount, 64);
}
