use std::collections::HashMap;

use crate::Rate;

/// Known coupon codes and the discount each grants.
#[derive(Debug, Clone)]
pub struct CouponBook {
    codes: HashMap<String, Rate>,
}

impl CouponBook {
    pub fn empty() -> Self {
        Self {
            codes: HashMap::new(),
        }
    }

    /// `GET10` for 10% off.
    pub fn standard() -> Self {
        Self::empty().with_code("GET10", Rate::from_percent(10))
    }

    /// Register `code`. Rates above 100% are capped at 100%.
    pub fn with_code(mut self, code: &str, rate: Rate) -> Self {
        self.codes.insert(normalize(code), rate.min(Rate::FULL));
        self
    }

    /// Discount granted by `code`, or zero when it matches nothing.
    ///
    /// Surrounding whitespace and letter case are ignored; anything else must
    /// match exactly.
    pub fn discount_for(&self, code: &str) -> Rate {
        self.codes
            .get(&normalize(code))
            .copied()
            .unwrap_or(Rate::ZERO)
    }
}

impl Default for CouponBook {
    fn default() -> Self {
        Self::standard()
    }
}

fn normalize(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}
