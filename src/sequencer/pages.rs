//! Page registry and page validity.
//!
//! Pages are numbered the way the front panel walks them: the global
//! parameters first, then one block of [`FIELDS_PER_STEP`] pages per step.

use super::step::{StepField, MAX_STEPS};
use super::{ParameterKey, Sequencer};
use crate::clock::ClockControl;
use crate::midi::MidiSink;

pub const NUM_PARAMETER_PAGES: u8 = 13;
pub const FIELDS_PER_STEP: u8 = 4;
pub const NUM_PAGES: u8 = NUM_PARAMETER_PAGES + FIELDS_PER_STEP * MAX_STEPS as u8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageStatus {
    Visible,
    /// The owning track is disabled.
    Hidden,
    /// The page belongs to a step past the sequence length; no later page is
    /// meaningful either.
    LastPage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Parameter(ParameterKey),
    Step { step: u8, field: StepField },
}

impl PageKind {
    /// Resolves a page number. Pages past the registry yield `None`.
    pub fn from_page(page: u8) -> Option<Self> {
        if page < NUM_PARAMETER_PAGES {
            return ParameterKey::from_index(page).map(PageKind::Parameter);
        }
        if page >= NUM_PAGES {
            return None;
        }
        let offset = page - NUM_PARAMETER_PAGES;
        let field = StepField::from_index(offset % FIELDS_PER_STEP)?;
        Some(PageKind::Step {
            step: offset / FIELDS_PER_STEP,
            field,
        })
    }
}

/// What the UI needs to draw and clamp a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageDescriptor {
    pub kind: PageKind,
    pub label: &'static str,
    pub min: u8,
    pub max: u8,
}

impl PageDescriptor {
    pub fn for_page(page: u8) -> Option<Self> {
        let kind = PageKind::from_page(page)?;
        let (label, (min, max)) = match kind {
            PageKind::Parameter(key) => (key.label(), key.range()),
            PageKind::Step { field, .. } => {
                let label = match field {
                    StepField::Note => "note",
                    StepField::Duration => "dur",
                    StepField::Velocity => "vel",
                    StepField::Cc => "cc",
                };
                (label, (0, field.max()))
            }
        };
        Some(PageDescriptor {
            kind,
            label,
            min,
            max,
        })
    }

    pub fn clamp(&self, value: u8) -> u8 {
        value.clamp(self.min, self.max)
    }
}

/// Edit state reported by the UI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EditCursor {
    pub editing: bool,
    pub page: u8,
}

impl EditCursor {
    pub fn new(editing: bool, page: u8) -> Self {
        Self { editing, page }
    }

    pub fn on_step_page(&self) -> bool {
        self.page >= NUM_PARAMETER_PAGES
    }

    /// Step edited by the current page, 0 on parameter pages.
    pub fn page_index(&self) -> u8 {
        match PageKind::from_page(self.page) {
            Some(PageKind::Step { step, .. }) => step,
            _ => self.page.saturating_sub(NUM_PARAMETER_PAGES) / FIELDS_PER_STEP,
        }
    }
}

impl<O: MidiSink, C: ClockControl> Sequencer<O, C> {
    pub fn page_status(&self, page: u8) -> PageStatus {
        if page < NUM_PARAMETER_PAGES {
            return PageStatus::Visible;
        }
        let offset = page - NUM_PARAMETER_PAGES;
        let block = offset / FIELDS_PER_STEP;
        if block >= self.sequence.num_steps {
            return PageStatus::LastPage;
        }
        match StepField::from_index(offset % FIELDS_PER_STEP) {
            Some(field) if !field.is_enabled(&self.params.tracks) => PageStatus::Hidden,
            _ => PageStatus::Visible,
        }
    }

    /// Value shown on `page`, `None` past the registry.
    pub fn page_value(&self, page: u8) -> Option<u8> {
        match PageKind::from_page(page)? {
            PageKind::Parameter(key) => Some(self.parameter(key)),
            PageKind::Step { step, field } => Some(self.steps.field(usize::from(step), field)),
        }
    }

    /// Writes the value behind `page`, clamped to the page range. Parameter
    /// pages go through [`Sequencer::set_parameter`].
    pub fn set_page_value(&mut self, page: u8, value: u8) {
        let Some(descriptor) = PageDescriptor::for_page(page) else {
            return;
        };
        let value = descriptor.clamp(value);
        match descriptor.kind {
            PageKind::Parameter(key) => self.set_parameter(key, value),
            PageKind::Step { step, field } => {
                self.steps.set_field(usize::from(step), field, value)
            }
        }
    }

    pub fn set_edit_cursor(&mut self, cursor: EditCursor) {
        self.cursor = cursor;
    }
}
