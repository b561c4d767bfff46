use std::{error::Error, time::Duration};

use crate::config::{LoadError, PollConfig};

#[test]
fn test_defaults() {
    let config = PollConfig::default();
    assert_eq!(config.poll_frequency, 500);
    assert!(!config.readonly);
    assert_eq!(config.debug, 0);
    assert_eq!(config.poll_interval(), Duration::from_millis(2));
    assert_eq!(config.read_timeout(), Duration::ZERO);
}

#[test]
fn test_from_yaml() -> Result<(), Box<dyn Error>> {
    let content = r#"
poll_frequency: 250
readonly: true
debug: 3
read_timeout_ms: 500
"#;
    let config = PollConfig::from_yaml(content.to_string())?;
    assert_eq!(
        config,
        PollConfig {
            poll_frequency: 250,
            readonly: true,
            debug: 3,
            read_timeout_ms: 500,
        }
    );
    assert_eq!(config.poll_interval(), Duration::from_millis(4));
    assert_eq!(config.read_timeout(), Duration::from_millis(500));

    Ok(())
}

#[test]
fn test_partial_yaml() -> Result<(), Box<dyn Error>> {
    let config = PollConfig::from_yaml("readonly: true".to_string())?;
    assert_eq!(
        config,
        PollConfig {
            readonly: true,
            ..Default::default()
        }
    );

    Ok(())
}

#[test]
fn test_invalid_yaml() {
    let result = PollConfig::from_yaml("poll_frequency: fast".to_string());
    assert!(matches!(result, Err(LoadError::DeserializeError(_))));
}

#[test]
fn test_missing_file() {
    let result = PollConfig::from_yaml_file("/nonexistent/xone-poll/config.yaml");
    assert!(matches!(result, Err(LoadError::IoError(_))));
}
