use clover_companion::{CachePolicy, CompanionConfig, ConfigError, DEFAULT_POLL_INTERVAL};
use std::{collections::HashMap, time::Duration};

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(name, value)| ((*name).to_string(), (*value).to_string()))
        .collect();
    move |name| vars.get(name).cloned()
}

#[test]
fn unset_variables_keep_defaults() {
    let config = CompanionConfig::from_lookup(lookup(&[])).unwrap();

    assert_eq!(config, CompanionConfig::default());
    assert_eq!(config.ttl, Duration::from_secs(60));
    assert_eq!(config.error_ttl, Duration::from_secs(60));
    assert_eq!(config.poll_interval, DEFAULT_POLL_INTERVAL);
}

#[test]
fn error_ttl_follows_ttl_when_unset() {
    let config =
        CompanionConfig::from_lookup(lookup(&[("CLOVER_COMPANION_TTL_SECS", "120")])).unwrap();

    assert_eq!(config.ttl, Duration::from_secs(120));
    assert_eq!(config.error_ttl, Duration::from_secs(120));
    assert_eq!(
        config.cache_policy(),
        CachePolicy::new(Duration::from_secs(120))
    );
}

#[test]
fn every_variable_is_read() {
    let config = CompanionConfig::from_lookup(lookup(&[
        ("CLOVER_COMPANION_TTL_SECS", "30"),
        ("CLOVER_COMPANION_ERROR_TTL_SECS", " 5 "),
        ("CLOVER_COMPANION_POLL_SECS", "10"),
    ]))
    .unwrap();

    assert_eq!(
        config,
        CompanionConfig::default()
            .with_ttl(Duration::from_secs(30))
            .with_error_ttl(Duration::from_secs(5))
            .with_poll_interval(Duration::from_secs(10))
    );
}

#[test]
fn malformed_duration_is_rejected() {
    let error =
        CompanionConfig::from_lookup(lookup(&[("CLOVER_COMPANION_POLL_SECS", "15s")])).unwrap_err();

    assert!(matches!(
        error,
        ConfigError::InvalidDuration { name: "CLOVER_COMPANION_POLL_SECS", ref value } if value == "15s"
    ));
}

#[test]
fn zero_duration_is_rejected() {
    let error =
        CompanionConfig::from_lookup(lookup(&[("CLOVER_COMPANION_TTL_SECS", "0")])).unwrap_err();

    assert!(matches!(
        error,
        ConfigError::ZeroDuration {
            name: "CLOVER_COMPANION_TTL_SECS"
        }
    ));
}
