#[cfg(test)]
mod tests {
    use clap::Parser;
    use stepseqrs::cli::ClockSourceArg;
    use stepseqrs::*;

    #[cfg(feature = "test-mock")]
    #[test]
    fn test_device_list() {
        let devices = handle_device_list();
        assert_eq!(devices.len(), 2);
        assert_eq!(devices[0], "Mock Device 1");
        assert_eq!(devices[1], "Mock Device 2");
    }

    #[test]
    fn test_args_with_device_binding() {
        let args = Args::parse_from(["test", "--bind-to-device", "Mock Device 1"]);
        assert_eq!(args.bind_to_device, Some("Mock Device 1".to_string()));
        assert!(!args.device_list);
    }

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["test"]);
        assert_eq!(args.bind_to_device, None);
        assert_eq!(args.midi_output, None);
        assert_eq!(args.config, "stepseqrs.toml");
        assert_eq!(args.clock_source, None);
        assert!(!args.device_list);
        assert!(!args.panel);
    }

    #[test]
    fn test_args_sequencer_flags() {
        let args = Args::parse_from([
            "test", "-c", "external", "-b", "132", "--channel", "10", "--steps", "8", "--panel",
        ]);
        assert_eq!(args.clock_source, Some(ClockSourceArg::External));
        assert_eq!(args.bpm, Some(132));
        assert_eq!(args.channel, Some(10));
        assert_eq!(args.steps, Some(8));
        assert!(args.panel);
    }

    #[test]
    fn test_args_reject_unknown_clock_source() {
        assert!(Args::try_parse_from(["test", "--clock-source", "tape"]).is_err());
    }

    #[test]
    fn test_valid_device_binding() {
        let devices = vec!["Mock Device 1".to_string(), "Mock Device 2".to_string()];
        assert!(validate_device("Mock Device 1", &devices).is_ok());
        assert!(validate_device("Device 2", &devices).is_ok());
    }

    #[test]
    fn test_invalid_device_binding() {
        let devices = vec!["Mock Device 1".to_string()];
        let error = validate_device("Nonexistent Device", &devices).unwrap_err();
        assert!(error.contains("'Nonexistent Device' not found"));
        assert!(error.contains("  - Mock Device 1"));
    }
}
