//! Configuration loading tests.
//!
//! Run with: cargo test --test config_test

use std::collections::HashMap;

use autofarm_history::config::{Config, ConfigError, Deployment, LogFormat};

fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    Config::from_lookup(|key| vars.get(key).cloned())
}

#[test]
fn defaults_apply_when_nothing_is_set() {
    let config = load(&[]).unwrap();
    assert_eq!(config.base_url.as_str(), "http://127.0.0.1:5000/");
    assert_eq!(config.request_timeout_seconds, 30);
    assert_eq!(config.body_excerpt_chars, 500);
    assert_eq!(config.calendar_cache_ttl_seconds, 300);
    assert_eq!(config.calendar_cache_capacity, 24);
    assert_eq!(config.log_format, LogFormat::Pretty);
    assert_eq!(config.deployment, Deployment::Local);
}

#[test]
fn overrides_are_read() {
    let config = load(&[
        ("AUTOFARM_BASE_URL", "http://farm.local:8080"),
        ("AUTOFARM_REQUEST_TIMEOUT_SECONDS", "5"),
        ("AUTOFARM_BODY_EXCERPT_CHARS", "80"),
        ("AUTOFARM_LOG_FORMAT", "JSON"),
        ("DEPLOYMENT", "production"),
    ])
    .unwrap();
    assert_eq!(config.request_timeout_seconds, 5);
    assert_eq!(config.body_excerpt_chars, 80);
    assert_eq!(config.log_format, LogFormat::Json);
    assert_eq!(config.deployment, Deployment::Prod);
    assert_eq!(config.endpoint("/api/history"), "http://farm.local:8080/api/history");
}

#[test]
fn unparseable_numbers_fall_back_to_defaults() {
    let config = load(&[
        ("AUTOFARM_REQUEST_TIMEOUT_SECONDS", "soon"),
        ("AUTOFARM_CALENDAR_CACHE_CAPACITY", "-1"),
    ])
    .unwrap();
    assert_eq!(config.request_timeout_seconds, 30);
    assert_eq!(config.calendar_cache_capacity, 24);
}

#[test]
fn base_path_and_trailing_slash_are_handled() {
    let config = load(&[("AUTOFARM_BASE_URL", "https://example.org/farm/")]).unwrap();
    assert_eq!(
        config.endpoint("/api/available-dates"),
        "https://example.org/farm/api/available-dates"
    );
}

#[test]
fn invalid_base_url_is_rejected() {
    let err = load(&[("AUTOFARM_BASE_URL", "not a url")]).unwrap_err();
    let ConfigError::Invalid(key, _) = err;
    assert_eq!(key, "AUTOFARM_BASE_URL");
}
