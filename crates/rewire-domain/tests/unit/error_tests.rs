//! Unit tests for domain error types

use rewire_domain::Error;

#[test]
fn test_linkage_error_names_injection_point() {
    let error = Error::linkage("clock", "now");
    assert!(error.is_linkage());
    let display_str = format!("{}", error);
    assert!(display_str.contains("'clock'"));
    assert!(display_str.contains("'now'"));
}

#[test]
fn test_provider_error() {
    let error = Error::provider("singleton", "backend unavailable");
    match error {
        Error::Provider { name, message } => {
            assert_eq!(name, "singleton");
            assert_eq!(message, "backend unavailable");
        }
        _ => panic!("Expected Provider error"),
    }
}

#[test]
fn test_format_error() {
    let error = Error::format("bad magic");
    match error {
        Error::Format { message } => assert_eq!(message, "bad magic"),
        _ => panic!("Expected Format error"),
    }
}

#[test]
fn test_configuration_error() {
    let error = Error::configuration("The provider method must be a no-args method.");
    match error {
        Error::Configuration { message, source } => {
            assert!(message.contains("no-args"));
            assert!(source.is_none());
        }
        _ => panic!("Expected Configuration error"),
    }
}

#[test]
fn test_io_error_from_std() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
    let error: Error = io.into();
    assert!(matches!(error, Error::IoSimple { .. }));
    assert!(!error.is_linkage());
}

#[test]
fn test_rewrite_error_with_source() {
    let io = std::io::Error::other("disk full");
    let error = Error::rewrite_with_source("Failed to persist Greeter.rwm", io);
    assert!(std::error::Error::source(&error).is_some());
    assert!(error.to_string().contains("Greeter.rwm"));
}
