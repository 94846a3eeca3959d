//! Integration tests for logging system

use core_runtime::logging::{
    init_logging, redact_if_sensitive, redact_url, LogFormat, LogLevel, LoggingConfig,
};

#[test]
fn test_logging_initializes_once() {
    // Only one subscriber per process, so this is the only test that installs one
    let config = LoggingConfig::default()
        .with_format(LogFormat::Compact)
        .with_level(LogLevel::Debug);

    init_logging(config.clone()).expect("first initialization succeeds");
    tracing::info!(provider = "itunes", "logging ready");

    let second = init_logging(config);
    assert!(second.is_err());
    assert!(second
        .unwrap_err()
        .to_string()
        .contains("Failed to initialize logging"));
}

#[test]
fn test_credential_redaction() {
    assert_eq!(redact_if_sensitive("api_key", "0123abcd"), "[REDACTED]");
    assert_eq!(redact_if_sensitive("client_secret", "s3cr3t"), "[REDACTED]");
    assert_eq!(redact_if_sensitive("bearer_token", "BQD..."), "[REDACTED]");

    assert_eq!(redact_if_sensitive("artist", "Ellie Goulding"), "Ellie Goulding");
    assert_eq!(redact_if_sensitive("track", "Burn"), "Burn");
}

#[test]
fn test_lastfm_url_redaction() {
    let url = "http://ws.audioscrobbler.com/2.0/?format=json&method=artist.getinfo&api_key=0123abcd&artist=Ellie+Goulding&autocorrect=1";
    let redacted = redact_url(url);

    assert!(!redacted.contains("0123abcd"));
    assert!(redacted.contains("artist=Ellie+Goulding"));
    assert!(redacted.contains("autocorrect=1"));
}

#[test]
fn test_config_chaining() {
    let config = LoggingConfig::default()
        .with_format(LogFormat::Compact)
        .with_level(LogLevel::Warn)
        .with_filter("core_auth=debug,core_artwork=trace")
        .with_spans(false)
        .with_target(false)
        .with_thread_info(true);

    assert_eq!(config.format, LogFormat::Compact);
    assert_eq!(config.level, LogLevel::Warn);
    assert_eq!(
        config.filter.as_deref(),
        Some("core_auth=debug,core_artwork=trace")
    );
    assert!(!config.enable_spans);
    assert!(!config.display_target);
    assert!(config.display_thread_info);
}
