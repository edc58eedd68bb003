use clap::Parser;
use crossbeam::channel::unbounded;
use stepseqrs::{
    cli::{handle_device_list, validate_device, Args},
    clock::InternalClock,
    config::Settings,
    event_loop::{EngineMessage, EventLoop},
    logging,
    midi::{DefaultMidiEngine, OutputQueue},
    ui::{run_front_panel, run_state_inspector},
    Sequencer,
};
use std::sync::{Arc, Mutex};
use std::thread;

fn main() {
    let args = Args::parse();

    if args.device_list {
        list_available_devices(&handle_device_list());
        return;
    }

    let settings = match Settings::load(&args) {
        Ok(settings) => settings,
        Err(e) => exit_with_error(format!("Error reading configuration: {}", e)),
    };
    initialize_logging(&settings);
    for warning in &settings.warnings {
        log::warn!("{}", warning);
    }
    log::info!("Using {:?} clock mode", settings.parameters.clock_mode);
    log::debug!("Parameters: {:?}", settings.parameters);

    if let Some(device_name) = &settings.input_device {
        if let Err(error_msg) = validate_device(device_name, &handle_device_list()) {
            exit_with_error(error_msg);
        }
    }

    let (tx, rx) = unbounded::<EngineMessage>();

    let engine = match DefaultMidiEngine::connect(
        settings.input_device.as_deref(),
        settings.output_device.as_deref(),
        tx.clone(),
    ) {
        Ok(engine) => engine,
        Err(e) => exit_with_error(format!("Error connecting to MIDI device: {}", e)),
    };

    let clock = InternalClock::new(tx.clone());
    let sequencer = Arc::new(Mutex::new(Sequencer::with_parameters(
        settings.parameters,
        settings.steps.clone(),
        OutputQueue::new(engine),
        clock,
    )));

    let loop_state = Arc::clone(&sequencer);
    let event_thread = thread::Builder::new()
        .name("event-loop".into())
        .spawn(move || EventLoop::new(loop_state, rx).run());
    if let Err(e) = event_thread {
        exit_with_error(format!("Failed to start event loop: {}", e));
    }

    if settings.panel {
        if let Err(e) = run_front_panel(Arc::clone(&sequencer), tx) {
            log::error!("Front panel error: {}", e);
            eprintln!("Front panel error: {}", e);
        }
        if let Ok(mut seq) = sequencer.lock() {
            seq.stop();
        }
        log::info!("Application exiting");
        std::process::exit(0);
    }

    log::info!("Application running. Press Ctrl+C to exit...");
    println!("\nPress Ctrl+C to exit...");
    drop(tx);
    run_state_inspector(sequencer);
}

fn initialize_logging(settings: &Settings) {
    if let Err(e) = logging::init_logger(settings.log_level) {
        eprintln!("Logger initialization failed: {}", e);
    }
    log::info!("Application starting");
}

fn list_available_devices(devices: &[String]) {
    println!("Available MIDI devices:");
    for device in devices {
        println!("  - {}", device);
    }
}

fn exit_with_error(error_msg: String) -> ! {
    log::error!("{}", error_msg);
    eprintln!("{}", error_msg);
    std::process::exit(1);
}
