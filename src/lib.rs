pub mod amount;
pub mod availability;
pub mod checkout;
pub mod config;
pub mod coupon;
pub mod form;
pub mod model;
pub mod pricing;
pub mod report;

pub use amount::{Amount, Rate};
pub use availability::{AvailabilityProber, AvailabilityStatus};
pub use checkout::{CheckoutClient, CheckoutError, CheckoutRequest, CheckoutSession};
pub use config::Settings;
pub use coupon::CouponBook;
pub use form::{FormEvent, FormExit, Navigator, SignupForm, UiStatus};
pub use model::{Extension, ServerLocation, TrialConfiguration};
pub use pricing::{PriceBreakdown, PriceTable, PricingError};
