//! Step data and track enables.

use super::division::MAX_DIVISION;

/// Fixed number of step slots, independent of the configured sequence length.
pub const MAX_STEPS: usize = 32;

/// One slot of the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// Pitch, interpreted relative to the root note at playback.
    pub note: u8,
    /// Index into the clock-division table.
    pub duration: u8,
    /// Velocity code, scaled by 8 at playback.
    pub velocity: u8,
    /// Raw control-change value.
    pub cc: u8,
}

impl Default for Step {
    fn default() -> Self {
        Self {
            note: 60,
            duration: 12, // 1/16
            velocity: 12,
            cc: 0,
        }
    }
}

/// Which fields of a step are honored at playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackFlags {
    pub note: bool,
    pub duration: bool,
    pub velocity: bool,
    pub cc: bool,
}

impl Default for TrackFlags {
    fn default() -> Self {
        Self {
            note: true,
            duration: false,
            velocity: false,
            cc: false,
        }
    }
}

/// Field selector within a step, in page order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepField {
    Note,
    Duration,
    Velocity,
    Cc,
}

impl StepField {
    pub const ALL: [StepField; 4] = [
        StepField::Note,
        StepField::Duration,
        StepField::Velocity,
        StepField::Cc,
    ];

    /// Returns the field at `index` within a step block.
    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(usize::from(index)).copied()
    }

    /// Largest value the field can hold.
    pub fn max(self) -> u8 {
        match self {
            StepField::Note | StepField::Cc => 127,
            StepField::Duration => MAX_DIVISION,
            StepField::Velocity => 15,
        }
    }

    /// Whether the track owning this field is enabled.
    pub fn is_enabled(self, tracks: &TrackFlags) -> bool {
        match self {
            StepField::Note => tracks.note,
            StepField::Duration => tracks.duration,
            StepField::Velocity => tracks.velocity,
            StepField::Cc => tracks.cc,
        }
    }
}

/// Fixed-capacity step storage. Always holds [`MAX_STEPS`] slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepStore {
    steps: [Step; MAX_STEPS],
}

impl Default for StepStore {
    fn default() -> Self {
        Self {
            steps: [Step::default(); MAX_STEPS],
        }
    }
}

impl StepStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the step at `index`, wrapping indexes past the capacity.
    pub fn get(&self, index: usize) -> Step {
        self.steps[index % MAX_STEPS]
    }

    fn get_mut(&mut self, index: usize) -> &mut Step {
        &mut self.steps[index % MAX_STEPS]
    }

    pub fn field(&self, index: usize, field: StepField) -> u8 {
        let step = self.get(index);
        match field {
            StepField::Note => step.note,
            StepField::Duration => step.duration,
            StepField::Velocity => step.velocity,
            StepField::Cc => step.cc,
        }
    }

    /// Writes one field, clamped to [`StepField::max`].
    pub fn set_field(&mut self, index: usize, field: StepField, value: u8) {
        let value = value.min(field.max());
        let step = self.get_mut(index);
        match field {
            StepField::Note => step.note = value,
            StepField::Duration => step.duration = value,
            StepField::Velocity => step.velocity = value,
            StepField::Cc => step.cc = value,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Step> {
        self.steps.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_is_presized() {
        let store = StepStore::new();
        assert_eq!(store.iter().count(), MAX_STEPS);
    }

    #[test]
    fn test_field_access() {
        let mut store = StepStore::new();
        store.set_field(3, StepField::Cc, 99);
        store.set_field(3, StepField::Velocity, 7);
        assert_eq!(store.field(3, StepField::Cc), 99);
        assert_eq!(store.get(3).velocity, 7);
        assert_eq!(store.get(2).cc, 0);
    }

    #[test]
    fn test_field_writes_are_clamped() {
        let mut store = StepStore::new();
        store.set_field(0, StepField::Velocity, 200);
        store.set_field(0, StepField::Duration, 40);
        store.set_field(0, StepField::Cc, 255);
        assert_eq!(store.get(0).velocity, 15);
        assert_eq!(store.get(0).duration, 16);
        assert_eq!(store.get(0).cc, 127);
    }

    #[test]
    fn test_field_gating() {
        let tracks = TrackFlags::default();
        assert!(StepField::Note.is_enabled(&tracks));
        assert!(!StepField::Duration.is_enabled(&tracks));
        assert!(!StepField::Velocity.is_enabled(&tracks));
        assert!(!StepField::Cc.is_enabled(&tracks));
        assert_eq!(StepField::from_index(4), None);
    }
}
