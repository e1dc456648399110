//! San Marino printed dockets.
//!
//! Positional: the Irish mobile number anchors the address block, which sits
//! on the lines immediately above it. Amounts follow their labels on the next line.

use tally_domain::{ReceiptFields, Vendor, ADDRESS_NOT_FOUND};

use super::amount::{parse_amount, DEFAULT_CURRENCY_SYMBOL};
use super::{any_line_contains, ReceiptParser};

const DETECTION_KEYWORD: &str = "san marino";
const IRISH_PREFIX: &str = "353";
const SUBTOTAL_LABEL: &str = "subtotal:";
const TOTAL_LABEL: &str = "total:";
const PAID: &str = "paid";
const ADDRESS_LINES: usize = 2;
const ADDRESS_SEPARATOR: &str = ", ";

#[derive(Debug, Clone)]
pub struct SanMarinoParser {
    currency_symbol: char,
}

impl SanMarinoParser {
    pub fn new() -> Self {
        Self {
            currency_symbol: DEFAULT_CURRENCY_SYMBOL,
        }
    }

    pub fn with_currency_symbol(mut self, currency_symbol: char) -> Self {
        self.currency_symbol = currency_symbol;
        self
    }
}

impl Default for SanMarinoParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ReceiptParser for SanMarinoParser {
    fn vendor(&self) -> Vendor {
        Vendor::SanMarino
    }

    fn can_parse(&self, lines: &[&str]) -> bool {
        any_line_contains(lines, DETECTION_KEYWORD)
    }

    fn extract(&self, lines: &[&str]) -> Option<ReceiptFields> {
        let mut fields = ReceiptFields::default();

        for (index, raw) in lines.iter().enumerate() {
            let line = raw.trim();
            let lower = line.to_lowercase();
            let next = lines.get(index + 1);

            // Needs at least one line above and two below.
            if line.starts_with('+')
                && line.contains(IRISH_PREFIX)
                && index > 0
                && index + 2 < lines.len()
            {
                fields.phone_number = line.to_string();
                let first = index.saturating_sub(ADDRESS_LINES);
                fields.delivery_address = lines
                    .get(first..index)
                    .map(|block| block.join(ADDRESS_SEPARATOR))
                    .unwrap_or_default()
                    .trim()
                    .to_string();
            }

            if let (Some(next), true) = (next, lower.starts_with(SUBTOTAL_LABEL)) {
                fields.subtotal = parse_amount(next, self.currency_symbol);
            }

            if let (Some(next), true) = (next, lower.starts_with(TOTAL_LABEL)) {
                fields.total = parse_amount(next, self.currency_symbol);
            }

            // Any mention of "paid", "unpaid" included, marks the order paid.
            if lower.contains(PAID) {
                fields.is_paid = true;
            }
        }

        if fields.delivery_address.is_empty() && !fields.phone_number.is_empty() {
            fields.delivery_address = ADDRESS_NOT_FOUND.to_string();
        }

        if fields.delivery_address.is_empty() && fields.phone_number.is_empty() {
            return None;
        }
        Some(fields)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn extract(lines: &[&str]) -> Option<ReceiptFields> {
        SanMarinoParser::new().extract(lines)
    }

    #[test]
    fn detects_keyword_case_insensitively() {
        let parser = SanMarinoParser::new();
        assert!(parser.can_parse(&["San Marino Pizzeria"]));
        assert!(!parser.can_parse(&["JustEats"]));
    }

    #[test]
    fn extracts_phone_anchored_docket() {
        let fields = extract(&[
            "SAN MARINO",
            "11 Grange Wood",
            "Rathfarnham",
            "+353879188373",
            "Subtotal:",
            "€ 58.10",
            "Total:",
            "€ 61.10",
            "Payment: Paid",
        ])
        .expect("phone present");
        assert_eq!(fields.phone_number, "+353879188373");
        assert_eq!(fields.delivery_address, "11 Grange Wood, Rathfarnham");
        assert_eq!(fields.subtotal, Decimal::new(5810, 2));
        assert_eq!(fields.total, Decimal::new(6110, 2));
        assert!(fields.is_paid);
        assert!(fields.masking_code.is_empty());
    }

    #[test]
    fn phone_on_second_line_uses_single_address_line() {
        let fields = extract(&["SAN MARINO", "+353870000000", "Subtotal:", "€ 5.00"]).unwrap();
        assert_eq!(fields.delivery_address, "SAN MARINO");
    }

    #[test]
    fn phone_too_close_to_the_end_is_ignored() {
        assert!(extract(&["SAN MARINO", "1 Road", "Town", "+353870000000", "Total:"]).is_none());
    }

    #[test]
    fn blank_address_block_falls_back_to_placeholder() {
        let fields = extract(&["  ", "+353870000000", "Subtotal:", "€ 5.00"]).unwrap();
        assert_eq!(fields.delivery_address, ADDRESS_NOT_FOUND);
        assert_eq!(fields.phone_number, "+353870000000");
    }

    #[test]
    fn unpaid_mentions_still_mark_paid() {
        let fields = extract(&[
            "SAN MARINO",
            "1 Road",
            "Town",
            "+353870000000",
            "Payment: Unpaid",
            "Cash on delivery",
        ])
        .unwrap();
        assert!(fields.is_paid);
    }

    #[test]
    fn without_phone_or_address_yields_nothing() {
        assert!(extract(&["SAN MARINO", "Subtotal:", "€ 10.00"]).is_none());
        assert!(extract(&["SAN MARINO", "1 Road", "087 000 0000", "a", "b"]).is_none());
    }

    #[test]
    fn defaults_to_unpaid_with_zero_amounts() {
        let fields = extract(&["SAN MARINO", "1 Road", "Town", "+353870000000", "x", "y"]).unwrap();
        assert!(!fields.is_paid);
        assert_eq!(fields.subtotal, Decimal::ZERO);
        assert_eq!(fields.total, Decimal::ZERO);
    }
}
