//! Checkout session client.
//!
//! Posts `{domain, location, total}` to the checkout endpoint and expects a
//! JSON object with a `url` field pointing at the hosted payment page.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::Amount;
use crate::model::{ServerLocation, TrialConfiguration};

mod error;
pub use error::CheckoutError;

/// Body of the checkout POST.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckoutRequest {
    pub domain: String,
    pub location: ServerLocation,
    pub total: Amount,
}

impl CheckoutRequest {
    pub fn new(config: &TrialConfiguration, total: Amount) -> Self {
        Self {
            domain: config.domain_name(),
            location: config.location(),
            total,
        }
    }
}

/// A started checkout: the page the visitor must be sent to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSession {
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct SessionResponse {
    url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CheckoutClient {
    http: Client,
    endpoint: String,
}

impl CheckoutClient {
    pub const DEFAULT_ENDPOINT: &'static str =
        "https://smallcorps.com/securepay/create-checkout-session.php";
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, CheckoutError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(CheckoutError::NetworkFailure)?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    /// Issue a single checkout POST and extract the redirect URL.
    pub async fn create_session(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession, CheckoutError> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(CheckoutError::from_transport)?;

        let status = response.status();
        let raw = response
            .text()
            .await
            .map_err(CheckoutError::from_transport)?;
        debug!(status = status.as_u16(), raw = %raw, "checkout response");

        if !status.is_success() {
            return Err(CheckoutError::Server {
                status: status.as_u16(),
                body: raw,
            });
        }

        parse_session(&raw)
    }
}

fn parse_session(raw: &str) -> Result<CheckoutSession, CheckoutError> {
    let response: SessionResponse = serde_json::from_str(raw)
        .map_err(|e| CheckoutError::MalformedResponse(format!("not a json object: {e}")))?;

    let url = response
        .url
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| CheckoutError::MalformedResponse("missing url field".to_string()))?;

    let parsed = Url::parse(&url)
        .map_err(|e| CheckoutError::MalformedResponse(format!("unusable url '{url}': {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(CheckoutError::MalformedResponse(format!(
            "unsupported redirect scheme '{}'",
            parsed.scheme()
        )));
    }

    Ok(CheckoutSession { url })
}
