//! Logging setup tests

use rewire_domain::Error;
use rewire_infrastructure::logging::{init_logging, parse_log_level};
use rewire_infrastructure::LoggingConfig;
use tracing::Level;

#[test]
fn test_parse_log_level() {
    assert_eq!(parse_log_level("trace").unwrap(), Level::TRACE);
    assert_eq!(parse_log_level("DEBUG").unwrap(), Level::DEBUG);
    assert_eq!(parse_log_level("info").unwrap(), Level::INFO);
    assert_eq!(parse_log_level("warning").unwrap(), Level::WARN);
    assert_eq!(parse_log_level("error").unwrap(), Level::ERROR);
}

#[test]
fn test_parse_invalid_log_level() {
    let err = parse_log_level("chatty").unwrap_err();
    assert!(matches!(err, Error::Config { .. }));
    assert!(err.to_string().contains("chatty"));
}

#[test]
fn test_init_logging_rejects_invalid_level_before_installing() {
    let config = LoggingConfig {
        level: "nope".to_string(),
        ..LoggingConfig::default()
    };
    assert!(init_logging(&config).is_err());
}

#[test]
fn test_second_initialization_is_an_error() {
    let config = LoggingConfig::default();
    // Another test may already have installed a subscriber; either way the
    // next attempt must fail instead of panicking
    let _ = init_logging(&config);
    assert!(init_logging(&config).is_err());
}
