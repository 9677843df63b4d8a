use std::io;

use serde::Serialize;

use crate::availability::AvailabilityStatus;
use crate::pricing::PriceBreakdown;

#[derive(Debug, Serialize)]
struct ReportRow<'a> {
    item: &'a str,
    value: String,
}

/// Write a quote as `item,value` csv rows.
pub fn write_quote(
    writer: impl io::Write,
    quote: &PriceBreakdown,
    availability: AvailabilityStatus,
) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(writer);

    let rows = [
        ("base_price", quote.base_price.to_string()),
        ("domain_price", quote.domain_price.to_string()),
        ("location_fee", quote.location_fee.to_string()),
        ("subtotal", quote.subtotal.to_string()),
        ("tax_rate", quote.tax_rate.to_string()),
        ("tax_amount", quote.tax_amount.to_string()),
        ("discount_rate", quote.discount_rate.to_string()),
        ("discount_amount", quote.discount_amount.to_string()),
        ("total", quote.total.to_string()),
        ("availability", availability.to_string()),
    ];
    for (item, value) in rows {
        writer.serialize(ReportRow { item, value })?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Extension, ServerLocation, TrialConfiguration};
    use crate::pricing::PriceTable;

    #[test]
    fn writes_every_line_of_the_quote() {
        let config = TrialConfiguration::new("example", Extension::Com, ServerLocation::Usa);
        let quote = PriceTable::standard().quote(&config).unwrap();

        let mut out = Vec::new();
        write_quote(&mut out, &quote, AvailabilityStatus::Unknown).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "item,value",
                "base_price,25.99",
                "domain_price,9.99",
                "location_fee,0.00",
                "subtotal,35.98",
                "tax_rate,13%",
                "tax_amount,4.6774",
                "discount_rate,0%",
                "discount_amount,0.00",
                "total,40.66",
                "availability,unknown",
            ]
        );
    }

    #[test]
    fn unable_to_verify_is_written_verbatim() {
        let config = TrialConfiguration::new("example", Extension::Org, ServerLocation::Japan);
        let quote = PriceTable::standard().quote(&config).unwrap();

        let mut out = Vec::new();
        write_quote(&mut out, &quote, AvailabilityStatus::Error).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with("availability,unable to verify\n"));
    }
}
