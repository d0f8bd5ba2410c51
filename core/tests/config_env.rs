//! `from_env` against the real process environment.
//!
//! Runs in its own test binary, and every test takes `ENV_LOCK`, so the
//! variables set here never leak into concurrently running tests.

use std::sync::Mutex;
use std::time::Duration;

use operadoras_core::config::{BASE_URL_VAR, TIMEOUT_VAR};
use operadoras_core::{ClientConfig, ConfigError, OperadorasApi};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Run `f` with the given variables set (or removed, for `None`), restoring
/// the previous values afterwards.
fn with_env<R>(vars: &[(&str, Option<&str>)], f: impl FnOnce() -> R) -> R {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let saved: Vec<(String, Option<String>)> = vars
        .iter()
        .map(|(key, _)| (key.to_string(), std::env::var(key).ok()))
        .collect();
    for (key, value) in vars {
        match value {
            Some(value) => std::env::set_var(key, value),
            None => std::env::remove_var(key),
        }
    }

    let result = f();

    for (key, value) in saved {
        match value {
            Some(value) => std::env::set_var(&key, value),
            None => std::env::remove_var(&key),
        }
    }
    result
}

#[test]
fn from_env_reads_process_variables() {
    let config = with_env(
        &[
            (BASE_URL_VAR, Some("http://api.operadoras.test")),
            (TIMEOUT_VAR, Some("1500")),
        ],
        ClientConfig::from_env,
    )
    .unwrap();

    assert_eq!(config.base_url, "http://api.operadoras.test");
    assert_eq!(config.timeout, Duration::from_millis(1500));
}

#[test]
fn from_env_defaults_when_unset() {
    let config = with_env(&[(BASE_URL_VAR, None), (TIMEOUT_VAR, None)], ClientConfig::from_env)
        .unwrap();

    assert_eq!(config, ClientConfig::default());
}

#[test]
fn from_env_rejects_invalid_timeout() {
    let err = with_env(
        &[(BASE_URL_VAR, None), (TIMEOUT_VAR, Some("soon"))],
        ClientConfig::from_env,
    )
    .unwrap_err();

    assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == TIMEOUT_VAR));
}

#[test]
fn api_from_env_uses_configured_base_url() {
    let api = with_env(
        &[(BASE_URL_VAR, Some("http://api.operadoras.test/")), (TIMEOUT_VAR, None)],
        OperadorasApi::from_env,
    )
    .unwrap();

    assert_eq!(api.client().base_url(), "http://api.operadoras.test");
}

#[test]
fn api_from_env_surfaces_config_errors() {
    let result = with_env(&[(TIMEOUT_VAR, Some("0"))], OperadorasApi::from_env);

    assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
}
