//! Domain availability probing.
//!
//! There is no registry lookup behind this: a label longer than five
//! characters is reported available, anything shorter is reported taken. The
//! fixed delay stands in for the latency of a real check.

use std::fmt;
use std::time::Duration;

use thiserror::Error;
use tokio::time::{sleep, timeout};

/// Availability of the chosen domain, as shown next to the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AvailabilityStatus {
    #[default]
    Unknown,
    Checking,
    Available,
    Taken,
    /// The probe did not settle; shown as "unable to verify".
    Error,
}

impl AvailabilityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AvailabilityStatus::Unknown => "unknown",
            AvailabilityStatus::Checking => "checking",
            AvailabilityStatus::Available => "available",
            AvailabilityStatus::Taken => "taken",
            AvailabilityStatus::Error => "unable to verify",
        }
    }
}

impl fmt::Display for AvailabilityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProbeError {
    #[error("availability probe timed out after {0:?}")]
    TimedOut(Duration),
}

/// Placeholder availability rule: more than five characters is available.
pub fn placeholder_status(label: &str) -> AvailabilityStatus {
    if label.chars().count() > 5 {
        AvailabilityStatus::Available
    } else {
        AvailabilityStatus::Taken
    }
}

#[derive(Debug, Clone)]
pub struct AvailabilityProber {
    delay: Duration,
    timeout: Duration,
}

impl AvailabilityProber {
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(1000);
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

    pub fn new(delay: Duration, timeout: Duration) -> Self {
        Self { delay, timeout }
    }

    /// Resolve the status of `label` once the probe delay has elapsed.
    pub async fn probe(&self, label: &str) -> Result<AvailabilityStatus, ProbeError> {
        let lookup = async {
            sleep(self.delay).await;
            placeholder_status(label)
        };
        timeout(self.timeout, lookup)
            .await
            .map_err(|_| ProbeError::TimedOut(self.timeout))
    }
}

impl Default for AvailabilityProber {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DELAY, Self::DEFAULT_TIMEOUT)
    }
}
