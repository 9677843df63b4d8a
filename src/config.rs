//! Runtime settings loaded from environment variables.

use std::time::Duration;

use thiserror::Error;

use crate::availability::AvailabilityProber;
use crate::checkout::CheckoutClient;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {key}: '{value}' is not a whole number")]
    InvalidNumber { key: &'static str, value: String },
    #[error("invalid {key}: a timeout must be greater than zero")]
    ZeroTimeout { key: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Endpoint that creates checkout sessions
    pub checkout_endpoint: String,
    /// Deadline for the whole checkout request
    pub checkout_timeout: Duration,
    /// Simulated latency of an availability probe
    pub probe_delay: Duration,
    /// Deadline after which a probe reports "unable to verify"
    pub probe_timeout: Duration,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup; unset keys fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Settings::default();
        Ok(Settings {
            checkout_endpoint: lookup("CHECKOUT_ENDPOINT").unwrap_or(defaults.checkout_endpoint),
            checkout_timeout: match lookup("CHECKOUT_TIMEOUT_SECS") {
                Some(value) => Duration::from_secs(parse_timeout("CHECKOUT_TIMEOUT_SECS", value)?),
                None => defaults.checkout_timeout,
            },
            probe_delay: match lookup("PROBE_DELAY_MS") {
                Some(value) => Duration::from_millis(parse_number("PROBE_DELAY_MS", value)?),
                None => defaults.probe_delay,
            },
            probe_timeout: match lookup("PROBE_TIMEOUT_MS") {
                Some(value) => Duration::from_millis(parse_timeout("PROBE_TIMEOUT_MS", value)?),
                None => defaults.probe_timeout,
            },
        })
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            checkout_endpoint: CheckoutClient::DEFAULT_ENDPOINT.to_string(),
            checkout_timeout: CheckoutClient::DEFAULT_TIMEOUT,
            probe_delay: AvailabilityProber::DEFAULT_DELAY,
            probe_timeout: AvailabilityProber::DEFAULT_TIMEOUT,
        }
    }
}

fn parse_number(key: &'static str, value: String) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidNumber { key, value })
}

fn parse_timeout(key: &'static str, value: String) -> Result<u64, ConfigError> {
    match parse_number(key, value)? {
        0 => Err(ConfigError::ZeroTimeout { key }),
        n => Ok(n),
    }
}
