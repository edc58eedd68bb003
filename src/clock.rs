// clock.rs

use crate::event_loop::EngineMessage;
use crate::sequencer::GrooveParameters;
use crossbeam::channel::Sender;
use log::{error, info, trace};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// MIDI standard PPQ (Pulses Per Quarter Note)
pub const TICKS_PER_BEAT: u32 = 24;

/// Ticks per sixteenth note, the granularity of groove patterns.
const TICKS_PER_SIXTEENTH: u64 = TICKS_PER_BEAT as u64 / 4;

/// Groove offsets can stretch or shrink a tick by at most this fraction.
const MAX_GROOVE_DEVIATION: f64 = 0.5;

/// What the sequencer needs from whatever generates its timing pulses.
pub trait ClockControl {
    /// Called on every parameter write with the current tempo and groove.
    fn update(&mut self, groove: GrooveParameters);

    /// Begins generating ticks. Calling it again has no effect.
    fn start(&mut self);
}

/// Interval between tick `tick_index` and the one after it, with the groove
/// pattern applied per sixteenth note.
pub fn tick_interval(groove: &GrooveParameters, tick_index: u64) -> Duration {
    let bpm = f64::from(groove.bpm.max(1));
    let base = 60.0 / (bpm * f64::from(TICKS_PER_BEAT));

    let position = ((tick_index / TICKS_PER_SIXTEENTH) % 16) as usize;
    let offset = f64::from(groove.template.pattern()[position]) / 127.0;
    let amount = f64::from(groove.amount.min(127)) / 127.0;

    Duration::from_secs_f64(base * (1.0 + offset * amount * MAX_GROOVE_DEVIATION))
}

/// Clock master driven by a background thread. Ticks are delivered to the
/// event loop as [`EngineMessage::InternalTick`].
pub struct InternalClock {
    groove: Arc<Mutex<GrooveParameters>>,
    running: Arc<AtomicBool>,
    tick_tx: Sender<EngineMessage>,
    thread_handle: Option<JoinHandle<()>>,
}

impl InternalClock {
    pub fn new(tick_tx: Sender<EngineMessage>) -> Self {
        info!("Creating new InternalClock");
        InternalClock {
            groove: Arc::new(Mutex::new(GrooveParameters::default())),
            running: Arc::new(AtomicBool::new(false)),
            tick_tx,
            thread_handle: None,
        }
    }

    /// Stops the tick thread and waits for it to exit.
    pub fn shutdown(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}

impl ClockControl for InternalClock {
    fn update(&mut self, groove: GrooveParameters) {
        if let Ok(mut current) = self.groove.lock() {
            if *current != groove {
                info!(
                    "Clock updated: {} BPM, {} groove, amount {}",
                    groove.bpm,
                    groove.template.name(),
                    groove.amount
                );
            }
            *current = groove;
        }
    }

    fn start(&mut self) {
        if self.thread_handle.is_some() {
            return;
        }
        self.running.store(true, Ordering::SeqCst);

        let groove = Arc::clone(&self.groove);
        let running = Arc::clone(&self.running);
        let tick_tx = self.tick_tx.clone();

        self.thread_handle = Some(thread::spawn(move || {
            info!("Internal clock thread started");
            let mut tick_index: u64 = 0;
            let mut deadline = Instant::now();

            while running.load(Ordering::SeqCst) {
                let params = groove.lock().map(|g| *g).unwrap_or_default();
                deadline += tick_interval(&params, tick_index);

                let now = Instant::now();
                if deadline > now {
                    thread::sleep(deadline - now);
                } else {
                    trace!("Clock running late by {:?}", now - deadline);
                }

                if tick_tx.send(EngineMessage::InternalTick).is_err() {
                    error!("Event loop gone, stopping internal clock");
                    break;
                }
                tick_index = tick_index.wrapping_add(1);
            }
            info!("Internal clock thread stopped");
        }));
    }
}

impl Drop for InternalClock {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Clock that only remembers what it was told. Useful when ticks are fed
/// by hand.
#[derive(Debug, Default)]
pub struct RecordingClock {
    updates: Vec<GrooveParameters>,
    started: bool,
}

impl RecordingClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn updates(&self) -> &[GrooveParameters] {
        &self.updates
    }

    pub fn last_update(&self) -> Option<GrooveParameters> {
        self.updates.last().copied()
    }

    pub fn is_started(&self) -> bool {
        self.started
    }
}

impl ClockControl for RecordingClock {
    fn update(&mut self, groove: GrooveParameters) {
        self.updates.push(groove);
    }

    fn start(&mut self) {
        self.started = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequencer::GrooveTemplate;

    fn groove(bpm: u8, template: GrooveTemplate, amount: u8) -> GrooveParameters {
        GrooveParameters {
            bpm,
            template,
            amount,
        }
    }

    #[test]
    fn test_straight_time_at_120_bpm() {
        let params = groove(120, GrooveTemplate::Swing, 0);
        let interval = tick_interval(&params, 0);
        // 500ms per beat / 24
        assert_eq!(interval.as_micros(), 20_833);
        assert_eq!(tick_interval(&params, 7), interval);
    }

    #[test]
    fn test_swing_alternates_sixteenths() {
        let params = groove(120, GrooveTemplate::Swing, 127);
        let straight = tick_interval(&groove(120, GrooveTemplate::Swing, 0), 0);
        let first = tick_interval(&params, 0);
        let second = tick_interval(&params, 6);
        assert!(first > straight);
        assert!(second < straight);
    }

    #[test]
    fn test_groove_preserves_bar_length() {
        for template in GrooveTemplate::ALL {
            let params = groove(100, template, 90);
            let bar: Duration = (0..96).map(|t| tick_interval(&params, t)).sum();
            let straight: Duration = (0..96)
                .map(|t| tick_interval(&groove(100, template, 0), t))
                .sum();
            let diff = bar.as_secs_f64() - straight.as_secs_f64();
            assert!(diff.abs() < 1e-6, "{} changes bar length", template.name());
        }
    }

    #[test]
    fn test_recording_clock() {
        let mut clock = RecordingClock::new();
        clock.update(groove(90, GrooveTemplate::Lag, 10));
        clock.start();
        assert!(clock.is_started());
        assert_eq!(clock.last_update().map(|g| g.bpm), Some(90));
    }
}
