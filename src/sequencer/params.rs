//! Sequencer parameters and the keyed parameter interface.

use super::division::{DEFAULT_DIVISION, MAX_DIVISION};
use super::step::{TrackFlags, MAX_STEPS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClockMode {
    /// This device is the clock master and emits transport bytes.
    #[default]
    Internal,
    /// Ticks and transport come from incoming MIDI.
    External,
}

impl ClockMode {
    pub fn from_value(value: u8) -> Self {
        match value {
            1 => ClockMode::External,
            _ => ClockMode::Internal,
        }
    }

    pub fn value(self) -> u8 {
        match self {
            ClockMode::Internal => 0,
            ClockMode::External => 1,
        }
    }
}

/// Swing pattern applied by the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GrooveTemplate {
    #[default]
    Swing,
    Shuffle,
    Push,
    Lag,
    Human,
    Monkey,
}

impl GrooveTemplate {
    pub const ALL: [GrooveTemplate; 6] = [
        GrooveTemplate::Swing,
        GrooveTemplate::Shuffle,
        GrooveTemplate::Push,
        GrooveTemplate::Lag,
        GrooveTemplate::Human,
        GrooveTemplate::Monkey,
    ];

    /// Out-of-range values clamp to the last template.
    pub fn from_value(value: u8) -> Self {
        Self::ALL[usize::from(value).min(Self::ALL.len() - 1)]
    }

    pub fn value(self) -> u8 {
        match self {
            GrooveTemplate::Swing => 0,
            GrooveTemplate::Shuffle => 1,
            GrooveTemplate::Push => 2,
            GrooveTemplate::Lag => 3,
            GrooveTemplate::Human => 4,
            GrooveTemplate::Monkey => 5,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            GrooveTemplate::Swing => "swing",
            GrooveTemplate::Shuffle => "shuffle",
            GrooveTemplate::Push => "push",
            GrooveTemplate::Lag => "lag",
            GrooveTemplate::Human => "human",
            GrooveTemplate::Monkey => "monkey",
        }
    }

    /// Per-sixteenth timing offsets in [-127, 127]. Each pattern sums to zero
    /// so that a full bar keeps its nominal length.
    pub fn pattern(self) -> &'static [i8; 16] {
        match self {
            GrooveTemplate::Swing => &[
                64, -64, 64, -64, 64, -64, 64, -64, 64, -64, 64, -64, 64, -64, 64, -64,
            ],
            GrooveTemplate::Shuffle => &[
                127, -127, 127, -127, 127, -127, 127, -127, 127, -127, 127, -127, 127, -127, 127,
                -127,
            ],
            GrooveTemplate::Push => &[
                -64, -64, 64, 64, -64, -64, 64, 64, -64, -64, 64, 64, -64, -64, 64, 64,
            ],
            GrooveTemplate::Lag => &[
                64, 64, -64, -64, 64, 64, -64, -64, 64, 64, -64, -64, 64, 64, -64, -64,
            ],
            GrooveTemplate::Human => &[
                12, -30, 25, -7, 18, -22, 5, -1, -15, 27, -9, 3, -20, 14, -4, 4,
            ],
            GrooveTemplate::Monkey => &[
                60, -90, 40, -10, 85, -70, -20, 5, -55, 100, -35, 15, -80, 45, 25, -15,
            ],
        }
    }
}

/// Tempo and swing settings forwarded to the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrooveParameters {
    pub bpm: u8,
    pub template: GrooveTemplate,
    pub amount: u8,
}

impl Default for GrooveParameters {
    fn default() -> Self {
        Self {
            bpm: 120,
            template: GrooveTemplate::Swing,
            amount: 0,
        }
    }
}

/// Keys of the parameter interface, in page order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterKey {
    Running,
    ClockMode,
    Bpm,
    GrooveTemplate,
    GrooveAmount,
    ClockDivision,
    Channel,
    CcNumber,
    NoteTrack,
    DurationTrack,
    VelocityTrack,
    CcTrack,
    NumSteps,
}

impl ParameterKey {
    pub const ALL: [ParameterKey; 13] = [
        ParameterKey::Running,
        ParameterKey::ClockMode,
        ParameterKey::Bpm,
        ParameterKey::GrooveTemplate,
        ParameterKey::GrooveAmount,
        ParameterKey::ClockDivision,
        ParameterKey::Channel,
        ParameterKey::CcNumber,
        ParameterKey::NoteTrack,
        ParameterKey::DurationTrack,
        ParameterKey::VelocityTrack,
        ParameterKey::CcTrack,
        ParameterKey::NumSteps,
    ];

    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(usize::from(index)).copied()
    }

    pub fn index(self) -> u8 {
        Self::ALL
            .iter()
            .position(|key| *key == self)
            .unwrap_or_default() as u8
    }

    /// Short label shown on the front panel.
    pub fn label(self) -> &'static str {
        match self {
            ParameterKey::Running => "run",
            ParameterKey::ClockMode => "clk",
            ParameterKey::Bpm => "bpm",
            ParameterKey::GrooveTemplate => "grv",
            ParameterKey::GrooveAmount => "amt",
            ParameterKey::ClockDivision => "div",
            ParameterKey::Channel => "chn",
            ParameterKey::CcNumber => "cc#",
            ParameterKey::NoteTrack => "not",
            ParameterKey::DurationTrack => "dur",
            ParameterKey::VelocityTrack => "vel",
            ParameterKey::CcTrack => "cc",
            ParameterKey::NumSteps => "stp",
        }
    }

    /// Inclusive value range accepted by the page for this key.
    pub fn range(self) -> (u8, u8) {
        match self {
            ParameterKey::Bpm => (40, 240),
            ParameterKey::GrooveTemplate => (0, GrooveTemplate::ALL.len() as u8 - 1),
            ParameterKey::GrooveAmount | ParameterKey::CcNumber => (0, 127),
            ParameterKey::ClockDivision => (0, MAX_DIVISION),
            ParameterKey::Channel => (0, 15),
            ParameterKey::NumSteps => (1, MAX_STEPS as u8),
            ParameterKey::Running
            | ParameterKey::ClockMode
            | ParameterKey::NoteTrack
            | ParameterKey::DurationTrack
            | ParameterKey::VelocityTrack
            | ParameterKey::CcTrack => (0, 1),
        }
    }

    pub fn clamp(self, value: u8) -> u8 {
        let (min, max) = self.range();
        value.clamp(min, max)
    }
}

/// Every configurable field except the running flag, which belongs to the
/// transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parameters {
    pub clock_mode: ClockMode,
    pub groove: GrooveParameters,
    pub clock_division: u8,
    /// Output channel, 0-based.
    pub channel: u8,
    pub cc_number: u8,
    pub tracks: TrackFlags,
    pub num_steps: u8,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            clock_mode: ClockMode::Internal,
            groove: GrooveParameters::default(),
            clock_division: DEFAULT_DIVISION,
            channel: 0,
            cc_number: 74,
            tracks: TrackFlags::default(),
            num_steps: 16,
        }
    }
}

impl Parameters {
    /// Current value behind `key`. The running flag is not stored here and
    /// reads as 0.
    pub fn value(&self, key: ParameterKey) -> u8 {
        match key {
            ParameterKey::Running => 0,
            ParameterKey::ClockMode => self.clock_mode.value(),
            ParameterKey::Bpm => self.groove.bpm,
            ParameterKey::GrooveTemplate => self.groove.template.value(),
            ParameterKey::GrooveAmount => self.groove.amount,
            ParameterKey::ClockDivision => self.clock_division,
            ParameterKey::Channel => self.channel,
            ParameterKey::CcNumber => self.cc_number,
            ParameterKey::NoteTrack => u8::from(self.tracks.note),
            ParameterKey::DurationTrack => u8::from(self.tracks.duration),
            ParameterKey::VelocityTrack => u8::from(self.tracks.velocity),
            ParameterKey::CcTrack => u8::from(self.tracks.cc),
            ParameterKey::NumSteps => self.num_steps,
        }
    }

    /// Stores `value` under `key`, clamped to the key's range. Writing the
    /// running flag is a no-op here.
    pub fn store(&mut self, key: ParameterKey, value: u8) {
        let value = key.clamp(value);
        match key {
            ParameterKey::Running => {}
            ParameterKey::ClockMode => self.clock_mode = ClockMode::from_value(value),
            ParameterKey::Bpm => self.groove.bpm = value,
            ParameterKey::GrooveTemplate => {
                self.groove.template = GrooveTemplate::from_value(value)
            }
            ParameterKey::GrooveAmount => self.groove.amount = value,
            ParameterKey::ClockDivision => self.clock_division = value,
            ParameterKey::Channel => self.channel = value,
            ParameterKey::CcNumber => self.cc_number = value,
            ParameterKey::NoteTrack => self.tracks.note = value != 0,
            ParameterKey::DurationTrack => self.tracks.duration = value != 0,
            ParameterKey::VelocityTrack => self.tracks.velocity = value != 0,
            ParameterKey::CcTrack => self.tracks.cc = value != 0,
            ParameterKey::NumSteps => self.num_steps = value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_follow_page_order() {
        for (index, key) in ParameterKey::ALL.iter().enumerate() {
            assert_eq!(key.index() as usize, index);
            assert_eq!(ParameterKey::from_index(index as u8), Some(*key));
        }
        assert_eq!(ParameterKey::from_index(13), None);
    }

    #[test]
    fn test_store_clamps_to_range() {
        let mut params = Parameters::default();
        params.store(ParameterKey::Bpm, 10);
        assert_eq!(params.groove.bpm, 40);
        params.store(ParameterKey::NumSteps, 0);
        assert_eq!(params.num_steps, 1);
        params.store(ParameterKey::NumSteps, 64);
        assert_eq!(params.num_steps, 32);
        params.store(ParameterKey::Channel, 200);
        assert_eq!(params.channel, 15);
    }

    #[test]
    fn test_store_and_read_back() {
        let mut params = Parameters::default();
        params.store(ParameterKey::ClockMode, 1);
        params.store(ParameterKey::GrooveTemplate, 3);
        params.store(ParameterKey::VelocityTrack, 1);
        assert_eq!(params.clock_mode, ClockMode::External);
        assert_eq!(params.groove.template, GrooveTemplate::Lag);
        assert!(params.tracks.velocity);
        assert_eq!(params.value(ParameterKey::GrooveTemplate), 3);
        assert_eq!(params.value(ParameterKey::VelocityTrack), 1);
    }

    #[test]
    fn test_groove_patterns_are_balanced() {
        for template in GrooveTemplate::ALL {
            let sum: i32 = template.pattern().iter().map(|&o| i32::from(o)).sum();
            assert_eq!(sum, 0, "{} pattern drifts", template.name());
        }
    }
}
