use std::error::Error;

use clap::Parser;

use crate::{cli::Args, config::PollConfig};

#[test]
fn test_defaults() -> Result<(), Box<dyn Error>> {
    let args = Args::try_parse_from(["xone-poll"])?;
    assert_eq!(args.apply(PollConfig::default()), PollConfig::default());

    Ok(())
}

#[test]
fn test_flags() -> Result<(), Box<dyn Error>> {
    let args = Args::try_parse_from([
        "xone-poll",
        "--freq",
        "125",
        "--readonly",
        "--debug",
        "4",
        "--read-timeout",
        "50",
    ])?;
    assert_eq!(
        args.apply(PollConfig::default()),
        PollConfig {
            poll_frequency: 125,
            readonly: true,
            debug: 4,
            read_timeout_ms: 50,
        }
    );

    Ok(())
}

#[test]
fn test_negative_frequency() -> Result<(), Box<dyn Error>> {
    let args = Args::try_parse_from(["xone-poll", "--freq", "-1"])?;
    assert_eq!(args.freq, Some(-1));

    Ok(())
}

#[test]
fn test_flags_override_config() {
    let base = PollConfig {
        poll_frequency: 100,
        readonly: true,
        debug: 2,
        read_timeout_ms: 10,
    };
    let args = Args {
        freq: Some(1000),
        ..Default::default()
    };
    assert_eq!(
        args.apply(base.clone()),
        PollConfig {
            poll_frequency: 1000,
            ..base
        }
    );
}
