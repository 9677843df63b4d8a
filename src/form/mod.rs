//! The signup form.
//!
//! The form owns the visitor's [`TrialConfiguration`] and a separate
//! [`UiStatus`]. Edits are applied synchronously; availability probes and the
//! checkout request run as background tasks whose outcomes are fed back
//! through a channel and applied one at a time by [`SignupForm::run`].

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_stream::{Stream, StreamExt};
use tracing::{debug, info, warn};

use crate::Rate;
use crate::availability::{AvailabilityProber, AvailabilityStatus};
use crate::checkout::{CheckoutClient, CheckoutError, CheckoutRequest, CheckoutSession};
use crate::config::Settings;
use crate::coupon::CouponBook;
use crate::model::{Extension, ServerLocation, TrialConfiguration};
use crate::pricing::{PriceBreakdown, PriceTable, PricingError};

mod state;
pub use state::{CHECKOUT_ERROR_MESSAGE, ProbeToken, ProbeTracker, UiStatus};

/// Sends the visitor to another page. Nothing on the form runs afterwards.
pub trait Navigator {
    fn navigate(&mut self, url: &str);
}

/// A user interaction with the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    DomainLabel(String),
    Extension(Extension),
    Location(ServerLocation),
    /// Edit the coupon text. A changed code drops the applied discount until
    /// the next `ApplyCoupon`.
    CouponCode(String),
    ApplyCoupon,
    CheckAvailability,
    Submit,
}

/// Why [`SignupForm::run`] returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormExit {
    /// The visitor was sent to the checkout page.
    Navigated(String),
    /// Events ran out and no background work is pending.
    Idle,
}

/// Result of a background task.
#[derive(Debug)]
enum Outcome {
    Probe {
        token: ProbeToken,
        status: AvailabilityStatus,
    },
    Checkout(Result<CheckoutSession, CheckoutError>),
}

pub struct SignupForm<N: Navigator> {
    config: TrialConfiguration,
    ui: UiStatus,
    prices: PriceTable,
    coupons: CouponBook,
    prober: AvailabilityProber,
    checkout: CheckoutClient,
    navigator: N,
    probes: ProbeTracker,
    probe_task: Option<JoinHandle<()>>,
    checkout_task: Option<JoinHandle<()>>,
    navigated: Option<String>,
    outcomes_tx: mpsc::UnboundedSender<Outcome>,
    outcomes_rx: mpsc::UnboundedReceiver<Outcome>,
}

/// Public API
impl<N: Navigator> SignupForm<N> {
    /// A fresh form with the standard price table and coupon book.
    pub fn new(checkout: CheckoutClient, prober: AvailabilityProber, navigator: N) -> Self {
        let (outcomes_tx, outcomes_rx) = mpsc::unbounded_channel();
        Self {
            config: TrialConfiguration::default(),
            ui: UiStatus::default(),
            prices: PriceTable::standard(),
            coupons: CouponBook::standard(),
            prober,
            checkout,
            navigator,
            probes: ProbeTracker::default(),
            probe_task: None,
            checkout_task: None,
            navigated: None,
            outcomes_tx,
            outcomes_rx,
        }
    }

    pub fn from_settings(settings: &Settings, navigator: N) -> Result<Self, CheckoutError> {
        let checkout = CheckoutClient::new(&settings.checkout_endpoint, settings.checkout_timeout)?;
        let prober = AvailabilityProber::new(settings.probe_delay, settings.probe_timeout);
        Ok(Self::new(checkout, prober, navigator))
    }

    pub fn with_price_table(mut self, prices: PriceTable) -> Self {
        self.prices = prices;
        self
    }

    pub fn with_coupons(mut self, coupons: CouponBook) -> Self {
        self.coupons = coupons;
        self
    }

    pub fn config(&self) -> &TrialConfiguration {
        &self.config
    }

    pub fn ui(&self) -> &UiStatus {
        &self.ui
    }

    /// Discount granted by the last applied coupon.
    pub fn discount(&self) -> Rate {
        self.config.discount_rate()
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    /// Price of the current configuration.
    pub fn quote(&self) -> Result<PriceBreakdown, PricingError> {
        self.prices.quote(&self.config)
    }

    /// Drive the form from `events` until it is idle or has navigated away.
    pub async fn run(&mut self, mut events: impl Stream<Item = FormEvent> + Unpin) -> FormExit {
        if let Some(url) = &self.navigated {
            return FormExit::Navigated(url.clone());
        }

        let mut events_open = true;
        loop {
            if !events_open && !self.ui.is_busy() {
                return FormExit::Idle;
            }

            tokio::select! {
                event = events.next(), if events_open => match event {
                    Some(event) => self.apply(event),
                    None => events_open = false,
                },
                Some(outcome) = self.outcomes_rx.recv() => {
                    if let Some(url) = self.settle(outcome) {
                        return FormExit::Navigated(url);
                    }
                }
            }
        }
    }

    /// Apply a single user event on top of the current form state.
    ///
    /// Must be called inside a Tokio runtime: probes and checkouts are
    /// spawned as tasks.
    pub fn apply(&mut self, event: FormEvent) {
        if self.navigated.is_some() {
            debug!(?event, "form has navigated away, event ignored");
            return;
        }

        match event {
            FormEvent::DomainLabel(label) => {
                self.config = self.config.with_domain_label(label);
                self.reset_availability();
                info!(domain = %self.config.domain_name(), "domain label updated");
            }
            FormEvent::Extension(extension) => {
                self.config = self.config.with_extension(extension);
                self.reset_availability();
                info!(domain = %self.config.domain_name(), "extension updated");
            }
            FormEvent::Location(location) => {
                self.config = self.config.with_location(location);
                info!(location = %location, "location updated");
            }
            FormEvent::CouponCode(code) => {
                self.config = self.config.with_coupon_code(code);
            }
            FormEvent::ApplyCoupon => {
                let discount = self.coupons.discount_for(self.config.coupon_code());
                self.config = self.config.with_discount_rate(discount);
                if discount.is_zero() {
                    info!(code = self.config.coupon_code(), "coupon not recognised, discount cleared");
                } else {
                    info!(code = self.config.coupon_code(), discount = %self.discount(), "coupon applied");
                }
            }
            FormEvent::CheckAvailability => {
                self.start_probe();
            }
            FormEvent::Submit => self.start_checkout(),
        }
    }
}

/// Private API
impl<N: Navigator> SignupForm<N> {
    fn reset_availability(&mut self) {
        self.probes.invalidate();
        if let Some(task) = self.probe_task.take() {
            task.abort();
        }
        self.ui = self.ui.with_availability(AvailabilityStatus::Unknown);
    }

    /// Start a probe for the current label, superseding any pending one.
    fn start_probe(&mut self) -> ProbeToken {
        let token = self.probes.next();
        if let Some(task) = self.probe_task.take() {
            debug!("superseding pending availability probe");
            task.abort();
        }
        self.ui = self.ui.with_availability(AvailabilityStatus::Checking);

        let label = self.config.domain_label().to_string();
        let prober = self.prober.clone();
        let outcomes = self.outcomes_tx.clone();
        self.probe_task = Some(tokio::spawn(async move {
            let status = match prober.probe(&label).await {
                Ok(status) => status,
                Err(e) => {
                    warn!(label = %label, reason = %e, "availability probe failed");
                    AvailabilityStatus::Error
                }
            };
            let _ = outcomes.send(Outcome::Probe { token, status });
        }));

        info!(domain = %self.config.domain_name(), "availability check started");
        token
    }

    /// Start a checkout unless one is already in flight.
    fn start_checkout(&mut self) {
        if self.ui.loading {
            debug!("checkout already in flight, submit ignored");
            return;
        }

        let quote = match self.quote() {
            Ok(quote) => quote,
            Err(e) => {
                self.fail_checkout(e.into());
                return;
            }
        };

        let request = CheckoutRequest::new(&self.config, quote.total);
        info!(
            domain = %request.domain,
            location = %request.location,
            total = %request.total,
            "checkout started"
        );
        self.ui = self.ui.checkout_started();

        let client = self.checkout.clone();
        let outcomes = self.outcomes_tx.clone();
        self.checkout_task = Some(tokio::spawn(async move {
            let result = client.create_session(&request).await;
            let _ = outcomes.send(Outcome::Checkout(result));
        }));
    }

    fn fail_checkout(&mut self, err: CheckoutError) {
        warn!(reason = %err, "checkout failed");
        self.ui = self.ui.checkout_failed();
    }

    /// Apply a background outcome. Returns the target URL once navigated.
    fn settle(&mut self, outcome: Outcome) -> Option<String> {
        match outcome {
            Outcome::Probe { token, status } => {
                if self.probes.is_current(token) {
                    self.probe_task = None;
                    self.ui = self.ui.with_availability(status);
                    info!(domain = %self.config.domain_name(), status = %status, "availability settled");
                } else {
                    debug!(status = %status, "stale availability result dropped");
                }
                None
            }
            Outcome::Checkout(Ok(session)) => {
                self.checkout_task = None;
                info!(url = %session.url, "redirecting to checkout");
                self.navigator.navigate(&session.url);
                self.navigated = Some(session.url.clone());
                Some(session.url)
            }
            Outcome::Checkout(Err(e)) => {
                self.checkout_task = None;
                self.fail_checkout(e);
                None
            }
        }
    }
}

impl<N: Navigator> Drop for SignupForm<N> {
    fn drop(&mut self) {
        for task in [self.probe_task.take(), self.checkout_task.take()]
            .into_iter()
            .flatten()
        {
            task.abort();
        }
    }
}
