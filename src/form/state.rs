use crate::availability::AvailabilityStatus;

/// Shown for every checkout failure; details only go to the logs.
pub const CHECKOUT_ERROR_MESSAGE: &str =
    "Something went wrong while starting your checkout. Please try again later.";

/// What the form displays besides the entered values.
///
/// Replaced wholesale on every change, never edited field by field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UiStatus {
    pub availability: AvailabilityStatus,
    /// A checkout request is in flight; the submit button is disabled.
    pub loading: bool,
    pub error_message: Option<String>,
}

impl UiStatus {
    /// Some background work has not reported back yet.
    pub fn is_busy(&self) -> bool {
        self.loading || self.availability == AvailabilityStatus::Checking
    }

    pub fn with_availability(&self, availability: AvailabilityStatus) -> Self {
        Self {
            availability,
            ..self.clone()
        }
    }

    pub fn checkout_started(&self) -> Self {
        Self {
            loading: true,
            error_message: None,
            ..self.clone()
        }
    }

    pub fn checkout_failed(&self) -> Self {
        Self {
            loading: false,
            error_message: Some(CHECKOUT_ERROR_MESSAGE.to_string()),
            ..self.clone()
        }
    }
}

/// Generation tag carried by an availability probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeToken(u64);

/// Hands out probe tokens and remembers which one is current.
#[derive(Debug, Default)]
pub struct ProbeTracker {
    latest: u64,
}

impl ProbeTracker {
    pub fn next(&mut self) -> ProbeToken {
        self.latest += 1;
        ProbeToken(self.latest)
    }

    /// Make every token handed out so far stale.
    pub fn invalidate(&mut self) {
        self.latest += 1;
    }

    pub fn is_current(&self, token: ProbeToken) -> bool {
        token.0 == self.latest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ui_status_default() {
        let ui = UiStatus::default();
        assert_eq!(ui.availability, AvailabilityStatus::Unknown);
        assert!(!ui.loading);
        assert!(ui.error_message.is_none());
        assert!(!ui.is_busy());
    }

    #[test]
    fn checkout_started_clears_previous_error() {
        let failed = UiStatus::default().checkout_failed();
        assert_eq!(failed.error_message.as_deref(), Some(CHECKOUT_ERROR_MESSAGE));

        let retry = failed.checkout_started();
        assert!(retry.loading);
        assert!(retry.error_message.is_none());
        assert!(retry.is_busy());
    }

    #[test]
    fn checking_counts_as_busy() {
        let ui = UiStatus::default().with_availability(AvailabilityStatus::Checking);
        assert!(ui.is_busy());
        assert!(!ui.with_availability(AvailabilityStatus::Taken).is_busy());
    }

    #[test]
    fn only_latest_token_is_current() {
        let mut tracker = ProbeTracker::default();
        let first = tracker.next();
        assert!(tracker.is_current(first));

        let second = tracker.next();
        assert!(!tracker.is_current(first));
        assert!(tracker.is_current(second));

        tracker.invalidate();
        assert!(!tracker.is_current(second));
    }
}
