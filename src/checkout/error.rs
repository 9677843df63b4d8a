//! Error types for starting a checkout session.

use thiserror::Error;

use crate::pricing::PricingError;

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("cannot price the trial: {0}")]
    Configuration(#[from] PricingError),

    #[error("server error: {status} - {body}")]
    Server { status: u16, body: String },

    #[error("invalid response format: {0}")]
    MalformedResponse(String),

    #[error("network failure: {0}")]
    NetworkFailure(reqwest::Error),

    #[error("checkout request timed out")]
    NetworkTimeout,
}

impl CheckoutError {
    /// Classify a transport-level failure from the HTTP client.
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CheckoutError::NetworkTimeout
        } else {
            CheckoutError::NetworkFailure(err)
        }
    }
}
