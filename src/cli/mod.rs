use crate::midi::{DefaultMidiEngine, MidiEngine};
use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ClockSourceArg {
    Internal,
    External,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// List available MIDI devices
    #[arg(long)]
    pub device_list: bool,

    /// Bind to a specific MIDI input device
    #[arg(long)]
    pub bind_to_device: Option<String>,

    /// MIDI output device (first available port if omitted)
    #[arg(long)]
    pub midi_output: Option<String>,

    /// Settings file
    #[arg(long, default_value = "stepseqrs.toml")]
    pub config: String,

    /// Clock source
    #[arg(short, long, value_enum)]
    pub clock_source: Option<ClockSourceArg>,

    /// Tempo in beats per minute
    #[arg(short, long)]
    pub bpm: Option<u8>,

    /// Output channel, 1-16
    #[arg(long)]
    pub channel: Option<u8>,

    /// Sequence length in steps
    #[arg(long)]
    pub steps: Option<u8>,

    /// Run the interactive front panel instead of the status display
    #[arg(long)]
    pub panel: bool,

    /// Log file level (error, warn, info, debug, trace)
    #[arg(long)]
    pub log_level: Option<String>,
}

pub fn handle_device_list() -> Vec<String> {
    DefaultMidiEngine::list_devices()
}

pub fn validate_device(device_name: &str, devices: &[String]) -> Result<(), String> {
    if !devices.iter().any(|d| d.contains(device_name)) {
        let mut error_msg = format!(
            "Error: Device '{}' not found in available devices:\n",
            device_name
        );
        for device in devices {
            error_msg.push_str(&format!("  - {}\n", device));
        }
        return Err(error_msg);
    }
    Ok(())
}
