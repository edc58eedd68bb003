use crate::clock::ClockControl;
use crate::event_loop::{EngineMessage, SharedSequencer};
use crate::midi::MidiSink;
use crate::sequencer::{
    division, ClockMode, EditCursor, GrooveTemplate, PageDescriptor, PageKind, PageStatus,
    ParameterKey, Sequencer, StepField, FIELDS_PER_STEP, NUM_PAGES, NUM_PARAMETER_PAGES,
};
use crossbeam::channel::Sender;
use dialoguer::{Confirm, Input, Select};
use log::{error, info};
use std::error::Error;

/// Pages the front panel should offer, in order. Hidden pages are skipped
/// and the walk ends at the first page past the sequence length.
pub fn visible_pages<O: MidiSink, C: ClockControl>(sequencer: &Sequencer<O, C>) -> Vec<u8> {
    let mut pages = Vec::new();
    for page in 0..NUM_PAGES {
        match sequencer.page_status(page) {
            PageStatus::Visible => pages.push(page),
            PageStatus::Hidden => continue,
            PageStatus::LastPage => break,
        }
    }
    pages
}

fn on_off(value: u8) -> &'static str {
    if value == 0 {
        "off"
    } else {
        "on"
    }
}

/// Human-readable page name and value.
pub fn page_label(page: u8, value: u8) -> String {
    let Some(descriptor) = PageDescriptor::for_page(page) else {
        return format!("page {}", page);
    };
    match descriptor.kind {
        PageKind::Parameter(key) => {
            let shown = match key {
                ParameterKey::Running
                | ParameterKey::NoteTrack
                | ParameterKey::DurationTrack
                | ParameterKey::VelocityTrack
                | ParameterKey::CcTrack => on_off(value).to_string(),
                ParameterKey::ClockMode => match ClockMode::from_value(value) {
                    ClockMode::Internal => "int".to_string(),
                    ClockMode::External => "ext".to_string(),
                },
                ParameterKey::GrooveTemplate => GrooveTemplate::from_value(value).name().to_string(),
                ParameterKey::ClockDivision => division::label(value).to_string(),
                ParameterKey::Channel => value.saturating_add(1).to_string(),
                _ => value.to_string(),
            };
            format!("{}: {}", descriptor.label, shown)
        }
        PageKind::Step { step, field } => {
            let shown = match field {
                StepField::Duration => division::label(value).to_string(),
                _ => value.to_string(),
            };
            format!("step {:>2} {}: {}", step + 1, descriptor.label, shown)
        }
    }
}

enum MenuEntry {
    Page(u8),
    Record,
    Quit,
}

fn snapshot<O: MidiSink, C: ClockControl>(
    sequencer: &SharedSequencer<O, C>,
) -> Result<(Vec<(MenuEntry, String)>, u8), Box<dyn Error>> {
    let seq = sequencer.lock().map_err(|e| e.to_string())?;
    let mut entries: Vec<(MenuEntry, String)> = visible_pages(&seq)
        .into_iter()
        .map(|page| {
            let value = seq.page_value(page).unwrap_or_default();
            (MenuEntry::Page(page), page_label(page, value))
        })
        .collect();
    entries.push((MenuEntry::Record, "record steps from MIDI input".to_string()));
    entries.push((MenuEntry::Quit, "quit".to_string()));
    Ok((entries, seq.sequence().num_steps))
}

fn edit_page(page: u8, tx: &Sender<EngineMessage>) -> Result<(), Box<dyn Error>> {
    let Some(descriptor) = PageDescriptor::for_page(page) else {
        return Ok(());
    };
    let value: u8 = Input::new()
        .with_prompt(format!(
            "{} ({}-{})",
            descriptor.label, descriptor.min, descriptor.max
        ))
        .validate_with(|v: &u8| -> Result<(), String> {
            if (descriptor.min..=descriptor.max).contains(v) {
                Ok(())
            } else {
                Err(format!(
                    "value must be between {} and {}",
                    descriptor.min, descriptor.max
                ))
            }
        })
        .interact_text()?;
    tx.send(EngineMessage::SetPageValue { page, value })?;
    Ok(())
}

fn record_steps(num_steps: u8, tx: &Sender<EngineMessage>) -> Result<(), Box<dyn Error>> {
    let first: u8 = Input::new()
        .with_prompt(format!("first step (1-{})", num_steps))
        .default(1)
        .validate_with(|v: &u8| -> Result<(), String> {
            if (1..=num_steps).contains(v) {
                Ok(())
            } else {
                Err(format!("step must be between 1 and {}", num_steps))
            }
        })
        .interact_text()?;

    for step in (first - 1)..num_steps {
        let page = NUM_PARAMETER_PAGES + step * FIELDS_PER_STEP;
        tx.send(EngineMessage::SetEditCursor(EditCursor::new(true, page)))?;
        let next = Confirm::new()
            .with_prompt(format!(
                "Recording into step {}. Play a note, then continue?",
                step + 1
            ))
            .default(true)
            .interact()?;
        if !next {
            break;
        }
    }
    tx.send(EngineMessage::SetEditCursor(EditCursor::default()))?;
    Ok(())
}

/// Interactive page editor. Returns when the user quits.
pub fn run_front_panel<O: MidiSink, C: ClockControl>(
    sequencer: SharedSequencer<O, C>,
    tx: Sender<EngineMessage>,
) -> Result<(), Box<dyn Error>> {
    info!("Front panel started");
    let mut selection = 0;
    loop {
        let (entries, num_steps) = snapshot(&sequencer)?;
        let labels: Vec<&str> = entries.iter().map(|(_, label)| label.as_str()).collect();
        selection = selection.min(labels.len() - 1);

        selection = Select::new()
            .with_prompt("Page")
            .items(&labels)
            .default(selection)
            .interact()?;

        let result = match entries[selection].0 {
            MenuEntry::Page(page) => edit_page(page, &tx),
            MenuEntry::Record => record_steps(num_steps, &tx),
            MenuEntry::Quit => {
                info!("Front panel closed");
                return Ok(());
            }
        };
        if let Err(e) = result {
            error!("Front panel edit failed: {}", e);
            eprintln!("{}", e);
        }
    }
}
