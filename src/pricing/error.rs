//! Error types for price computation.

use thiserror::Error;

use crate::model::{Extension, ServerLocation};

/// The price table has no entry for a selected option.
///
/// Unreachable with [`PriceTable::standard`](super::PriceTable::standard);
/// only hand-built tables can miss an option.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    #[error("no price configured for extension {0}")]
    MissingExtensionPrice(Extension),

    #[error("no fee configured for location {0}")]
    MissingLocationFee(ServerLocation),
}
