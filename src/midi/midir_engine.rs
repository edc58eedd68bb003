use crate::event_loop::EngineMessage;
use crate::midi::{MidiEngine, MidiError, MidiMessage, Result};
use crossbeam::channel::Sender;
use log::{debug, error, info};
use midir::{Ignore, MidiInput, MidiInputConnection, MidiOutput, MidiOutputConnection};

pub struct MidirEngine {
    #[allow(dead_code)]
    input: Option<MidiInputConnection<()>>,
    output: Option<MidiOutputConnection>,
}

impl MidirEngine {
    /// Opens the named ports. Incoming messages are decoded and pushed to
    /// `events`. Without an output name the first available output port is
    /// used; without an input name nothing is received.
    pub fn connect(
        input_name: Option<&str>,
        output_name: Option<&str>,
        events: Sender<EngineMessage>,
    ) -> Result<Self> {
        let input = match input_name {
            Some(name) => Some(Self::connect_input(name, events)?),
            None => None,
        };
        let output = Self::connect_output(output_name)?;

        Ok(MidirEngine { input, output })
    }

    fn connect_input(
        name: &str,
        events: Sender<EngineMessage>,
    ) -> Result<MidiInputConnection<()>> {
        let mut midi_in = MidiInput::new("stepseqrs-in")?;
        midi_in.ignore(Ignore::None);

        let in_ports = midi_in.ports();
        let in_port = in_ports
            .iter()
            .find(|p| midi_in.port_name(p).unwrap_or_default().contains(name))
            .ok_or_else(|| MidiError::DeviceNotFound(name.to_string()))?
            .clone();
        let port_name = midi_in.port_name(&in_port)?;
        info!("Connecting to MIDI input port: {}", port_name);

        let connection = midi_in.connect(
            &in_port,
            "stepseqrs-input",
            move |timestamp, message, _| {
                let Some(msg) = MidiMessage::from_bytes(message) else {
                    return;
                };
                if msg != MidiMessage::Clock {
                    debug!("Received {:?} at timestamp: {}", msg, timestamp);
                }
                if events.send(EngineMessage::Midi(message.to_vec())).is_err() {
                    error!("Event loop gone, dropping incoming MIDI");
                }
            },
            (),
        )?;
        Ok(connection)
    }

    fn connect_output(name: Option<&str>) -> Result<Option<MidiOutputConnection>> {
        let midi_out = MidiOutput::new("stepseqrs-out")?;

        let out_ports = midi_out.ports();
        let available: Vec<String> = out_ports
            .iter()
            .filter_map(|p| midi_out.port_name(p).ok())
            .collect();
        info!("Available MIDI output ports: {:?}", available);

        let port = match name {
            Some(name) => out_ports
                .iter()
                .find(|p| midi_out.port_name(p).unwrap_or_default().contains(name))
                .ok_or_else(|| MidiError::DeviceNotFound(name.to_string()))?,
            None => match out_ports.first() {
                Some(port) => port,
                None => {
                    info!("No MIDI output ports available, output disabled");
                    return Ok(None);
                }
            },
        };

        let port_name = midi_out.port_name(port)?;
        info!("Connecting to MIDI output port: {}", port_name);
        Ok(Some(midi_out.connect(port, "stepseqrs-output")?))
    }
}

impl MidiEngine for MidirEngine {
    fn send(&mut self, msg: &MidiMessage) -> Result<()> {
        if let Some(output) = &mut self.output {
            output.send(&msg.to_bytes())?;
        }
        Ok(())
    }

    fn list_devices() -> Vec<String> {
        let mut devices = Vec::new();

        if let Ok(midi_in) = MidiInput::new("stepseqrs-list") {
            for port in midi_in.ports() {
                if let Ok(name) = midi_in.port_name(&port) {
                    devices.push(name);
                }
            }
        }

        devices
    }
}
