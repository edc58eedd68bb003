// config.rs

use crate::cli::{Args, ClockSourceArg};
use crate::logging::parse_level;
use crate::sequencer::{ClockMode, ParameterKey, Parameters, StepField, StepStore, MAX_STEPS};
use config::{ConfigError, Environment, File};
use simplelog::LevelFilter;

/// Settings file keys, one per parameter page after `running`.
const PARAMETER_KEYS: [(&str, ParameterKey); 12] = [
    ("clock_mode", ParameterKey::ClockMode),
    ("bpm", ParameterKey::Bpm),
    ("groove_template", ParameterKey::GrooveTemplate),
    ("groove_amount", ParameterKey::GrooveAmount),
    ("clock_division", ParameterKey::ClockDivision),
    ("channel", ParameterKey::Channel),
    ("cc_number", ParameterKey::CcNumber),
    ("note_track", ParameterKey::NoteTrack),
    ("duration_track", ParameterKey::DurationTrack),
    ("velocity_track", ParameterKey::VelocityTrack),
    ("cc_track", ParameterKey::CcTrack),
    ("num_steps", ParameterKey::NumSteps),
];

/// Everything needed to bring the device up.
#[derive(Debug, Clone)]
pub struct Settings {
    pub input_device: Option<String>,
    pub output_device: Option<String>,
    pub log_level: LevelFilter,
    pub panel: bool,
    pub parameters: Parameters,
    pub steps: StepStore,
    /// Problems found while reading settings. They are logged once the
    /// logger is up, which needs the settings first.
    pub warnings: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            input_device: None,
            output_device: None,
            log_level: LevelFilter::Debug,
            panel: false,
            parameters: Parameters::default(),
            steps: StepStore::default(),
            warnings: Vec::new(),
        }
    }
}

fn to_u8(value: i64) -> u8 {
    value.clamp(0, i64::from(u8::MAX)) as u8
}

fn optional<T>(result: Result<T, ConfigError>) -> Result<Option<T>, ConfigError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Reads a parameter as an integer, accepting "true"/"false" strings for the
/// track keys.
fn read_value(source: &config::Config, key: &str) -> Result<Option<u8>, ConfigError> {
    match optional(source.get_int(key)) {
        Ok(value) => Ok(value.map(to_u8)),
        Err(_) => Ok(optional(source.get_bool(key))?.map(u8::from)),
    }
}

impl Settings {
    /// Builds settings from the file named in `args`, `STEPSEQ_*` environment
    /// variables and finally the command line flags.
    pub fn load(args: &Args) -> Result<Self, ConfigError> {
        let source = config::Config::builder()
            .add_source(File::with_name(&args.config).required(false))
            .add_source(Environment::with_prefix("STEPSEQ"))
            .build()?;

        let mut settings = Self::from_source(&source)?;
        settings.apply_args(args);
        Ok(settings)
    }

    pub fn from_source(source: &config::Config) -> Result<Self, ConfigError> {
        let mut settings = Settings::default();

        for (name, key) in PARAMETER_KEYS {
            let Some(value) = read_value(source, name)? else {
                continue;
            };
            // Channels are numbered 1-16 for humans.
            let value = if key == ParameterKey::Channel {
                value.saturating_sub(1)
            } else {
                value
            };
            settings.parameters.store(key, value);
        }

        if let Some(notes) = optional(source.get_array("notes"))? {
            if notes.len() > MAX_STEPS {
                settings
                    .warnings
                    .push(format!("Only the first {} notes are used", MAX_STEPS));
            }
            for (index, note) in notes.into_iter().take(MAX_STEPS).enumerate() {
                let note = to_u8(note.into_int()?);
                settings.steps.set_field(index, StepField::Note, note);
            }
        }

        settings.input_device = optional(source.get_string("input_device"))?;
        settings.output_device = optional(source.get_string("output_device"))?;

        if let Some(level) = optional(source.get_string("log_level"))? {
            match parse_level(&level) {
                Some(level) => settings.log_level = level,
                None => settings.warnings.push(format!(
                    "Unknown log level '{}', keeping {}",
                    level, settings.log_level
                )),
            }
        }

        Ok(settings)
    }

    pub fn apply_args(&mut self, args: &Args) {
        if let Some(device) = &args.bind_to_device {
            self.input_device = Some(device.clone());
        }
        if let Some(device) = &args.midi_output {
            self.output_device = Some(device.clone());
        }
        if let Some(bpm) = args.bpm {
            self.parameters.store(ParameterKey::Bpm, bpm);
        }
        if let Some(channel) = args.channel {
            self.parameters
                .store(ParameterKey::Channel, channel.saturating_sub(1));
        }
        if let Some(steps) = args.steps {
            self.parameters.store(ParameterKey::NumSteps, steps);
        }
        if let Some(level) = args.log_level.as_deref().and_then(parse_level) {
            self.log_level = level;
        }
        self.panel = args.panel;

        match args.clock_source {
            Some(ClockSourceArg::External) => self.parameters.clock_mode = ClockMode::External,
            Some(ClockSourceArg::Internal) => self.parameters.clock_mode = ClockMode::Internal,
            None => {}
        }
    }
}
