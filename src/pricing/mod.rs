//! Trial price calculation.
//!
//! A quote is the base hosting price plus the extension price and the location
//! fee, taxed, then discounted. Tax and discount amounts keep full precision;
//! only the final total is rounded to cents (half away from zero).

use std::collections::HashMap;

use crate::model::{Extension, ServerLocation, TrialConfiguration};
use crate::{Amount, Rate};

mod error;
pub use error::PricingError;

/// Static prices used to quote a trial.
#[derive(Debug, Clone)]
pub struct PriceTable {
    base_price: Amount,
    tax_rate: Rate,
    extension_prices: HashMap<Extension, Amount>,
    location_fees: HashMap<ServerLocation, Amount>,
}

/// Every line of a quote, derived from a [`TrialConfiguration`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceBreakdown {
    pub base_price: Amount,
    pub domain_price: Amount,
    pub location_fee: Amount,
    pub subtotal: Amount,
    pub tax_rate: Rate,
    pub tax_amount: Amount,
    pub discount_rate: Rate,
    pub discount_amount: Amount,
    pub total: Amount,
}

impl PriceTable {
    /// An empty table; options must be priced with the `with_*` builders.
    pub fn new(base_price: Amount, tax_rate: Rate) -> Self {
        Self {
            base_price,
            tax_rate,
            extension_prices: HashMap::new(),
            location_fees: HashMap::new(),
        }
    }

    /// The prices shown on the signup page.
    pub fn standard() -> Self {
        Self::new(Amount::from_cents(2599), Rate::from_percent(13))
            .with_extension_price(Extension::Com, Amount::from_cents(999))
            .with_extension_price(Extension::Org, Amount::from_cents(899))
            .with_location_fee(ServerLocation::Usa, Amount::ZERO)
            .with_location_fee(ServerLocation::Canada, Amount::from_cents(150))
            .with_location_fee(ServerLocation::Germany, Amount::from_cents(200))
            .with_location_fee(ServerLocation::Bangladesh, Amount::from_cents(100))
            .with_location_fee(ServerLocation::Singapore, Amount::from_cents(300))
            .with_location_fee(ServerLocation::Japan, Amount::from_cents(400))
    }

    pub fn with_extension_price(mut self, extension: Extension, price: Amount) -> Self {
        self.extension_prices.insert(extension, price);
        self
    }

    pub fn with_location_fee(mut self, location: ServerLocation, fee: Amount) -> Self {
        self.location_fees.insert(location, fee);
        self
    }

    pub fn extension_price(&self, extension: Extension) -> Result<Amount, PricingError> {
        self.extension_prices
            .get(&extension)
            .copied()
            .ok_or(PricingError::MissingExtensionPrice(extension))
    }

    pub fn location_fee(&self, location: ServerLocation) -> Result<Amount, PricingError> {
        self.location_fees
            .get(&location)
            .copied()
            .ok_or(PricingError::MissingLocationFee(location))
    }

    /// Quote `config`; its discount rate is taken off the taxed subtotal.
    pub fn quote(&self, config: &TrialConfiguration) -> Result<PriceBreakdown, PricingError> {
        let discount_rate = config.discount_rate();
        let domain_price = self.extension_price(config.extension())?;
        let location_fee = self.location_fee(config.location())?;

        let subtotal = self.base_price + domain_price + location_fee;
        let tax_amount = subtotal.apply_rate(self.tax_rate);
        let discount_amount = (subtotal + tax_amount).apply_rate(discount_rate);
        let total = (subtotal + tax_amount - discount_amount).round_cents();

        Ok(PriceBreakdown {
            base_price: self.base_price,
            domain_price,
            location_fee,
            subtotal,
            tax_rate: self.tax_rate,
            tax_amount,
            discount_rate,
            discount_amount,
            total,
        })
    }
}

impl Default for PriceTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(extension: Extension, location: ServerLocation) -> TrialConfiguration {
        TrialConfiguration::new("example", extension, location)
    }

    fn discounted(extension: Extension, location: ServerLocation, rate: Rate) -> TrialConfiguration {
        config(extension, location).with_discount_rate(rate)
    }

    /// total = round2((base + ext + fee) * (1 + tax) * (1 - discount)), in cents
    fn expected_total_cents(base: i64, ext: i64, fee: i64, tax_bp: i64, discount_bp: i64) -> i64 {
        let numerator = (base + ext + fee) as i128 * (10_000 + tax_bp) as i128 * (10_000 - discount_bp) as i128;
        let denominator = 100_000_000i128;
        ((numerator + denominator / 2) / denominator) as i64
    }

    #[test]
    fn worked_example_com_usa() {
        let quote = PriceTable::standard()
            .quote(&config(Extension::Com, ServerLocation::Usa))
            .unwrap();

        assert_eq!(quote.base_price, Amount::from_cents(2599));
        assert_eq!(quote.domain_price, Amount::from_cents(999));
        assert_eq!(quote.location_fee, Amount::ZERO);
        assert_eq!(quote.subtotal, Amount::from_cents(3598));
        assert_eq!(quote.tax_rate, Rate::from_percent(13));
        assert_eq!(quote.tax_amount.to_string(), "4.6774");
        assert_eq!(quote.discount_amount, Amount::ZERO);
        assert_eq!(quote.total, Amount::from_cents(4066));
    }

    #[test]
    fn discount_applies_after_tax() {
        let quote = PriceTable::standard()
            .quote(&discounted(Extension::Com, ServerLocation::Usa, Rate::from_percent(10)))
            .unwrap();

        // 40.6574 - 4.06574 = 36.59166
        assert_eq!(quote.discount_amount.to_string(), "4.06574");
        assert_eq!(quote.total, Amount::from_cents(3659));
    }

    #[test]
    fn every_option_pair_matches_formula() {
        let table = PriceTable::standard();
        let ext_cents = |ext: Extension| match ext {
            Extension::Com => 999,
            Extension::Org => 899,
        };
        let fee_cents = |loc: ServerLocation| match loc {
            ServerLocation::Usa => 0,
            ServerLocation::Canada => 150,
            ServerLocation::Germany => 200,
            ServerLocation::Bangladesh => 100,
            ServerLocation::Singapore => 300,
            ServerLocation::Japan => 400,
        };

        for ext in Extension::ALL {
            for loc in ServerLocation::ALL {
                for discount_bp in [0, 1000] {
                    let quote = table
                        .quote(&discounted(ext, loc, Rate::from_basis_points(discount_bp)))
                        .unwrap();
                    let expected =
                        expected_total_cents(2599, ext_cents(ext), fee_cents(loc), 1300, discount_bp as i64);
                    assert_eq!(quote.total, Amount::from_cents(expected), "{ext} {loc} {discount_bp}");
                }
            }
        }
    }

    #[test]
    fn quote_is_deterministic() {
        let table = PriceTable::standard();
        let cfg = discounted(Extension::Org, ServerLocation::Japan, Rate::from_percent(10));
        assert_eq!(table.quote(&cfg), table.quote(&cfg.clone()));
    }

    #[test]
    fn full_discount_never_goes_negative() {
        let quote = PriceTable::standard()
            .quote(&discounted(Extension::Com, ServerLocation::Usa, Rate::from_percent(250)))
            .unwrap();
        assert_eq!(quote.total, Amount::ZERO);
    }

    #[test]
    fn missing_extension_price_is_configuration_error() {
        let table = PriceTable::new(Amount::from_cents(2599), Rate::from_percent(13))
            .with_location_fee(ServerLocation::Usa, Amount::ZERO);

        let result = table.quote(&config(Extension::Org, ServerLocation::Usa));
        assert_eq!(result, Err(PricingError::MissingExtensionPrice(Extension::Org)));
    }

    #[test]
    fn missing_location_fee_is_configuration_error() {
        let table = PriceTable::new(Amount::from_cents(2599), Rate::from_percent(13))
            .with_extension_price(Extension::Com, Amount::from_cents(999));

        let result = table.quote(&config(Extension::Com, ServerLocation::Germany));
        assert_eq!(result, Err(PricingError::MissingLocationFee(ServerLocation::Germany)));
    }
}
