//! JustEats order summaries.
//!
//! Marker-driven and order sensitive: each line is matched against the rules
//! below in turn and only the first matching rule applies. Paid state is
//! last-write-wins by line position.

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use tally_domain::{ReceiptFields, Vendor};

use super::amount::{amount_after_symbol, parse_amount, DEFAULT_CURRENCY_SYMBOL};
use super::{any_line_contains, starts_with_ignore_ascii_case, ReceiptParser};

const DETECTION_KEYWORD: &str = "justeats";
const ORDER_PRICE: &str = "order price";
const PAID_AMOUNT_PREFIX: &str = "paid amount";
const OUTSTANDING: &str = "outstanding";
const ORDER_PAID: &str = "order paid";
const PAID: &str = "paid";
const CODE_MARKER: &str = "code)";
const MASKING_FRAGMENT: &str = "(masking code)";
const MASKING_SPLIT: &str = "(masking";

/// Local phone number written as `dd ddd dddd`, spaces optional.
static PHONE_PATTERN: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"\d{2}\s*\d{3}\s*\d{4}").ok());

#[derive(Debug, Clone)]
pub struct JustEatsParser {
    default_phone_number: String,
    currency_symbol: char,
}

impl JustEatsParser {
    /// `default_phone_number` is used when the receipt shows no phone number inline.
    pub fn new(default_phone_number: impl Into<String>) -> Self {
        Self {
            default_phone_number: default_phone_number.into(),
            currency_symbol: DEFAULT_CURRENCY_SYMBOL,
        }
    }

    pub fn with_currency_symbol(mut self, currency_symbol: char) -> Self {
        self.currency_symbol = currency_symbol;
        self
    }
}

impl Default for JustEatsParser {
    fn default() -> Self {
        Self::new(String::new())
    }
}

impl ReceiptParser for JustEatsParser {
    fn vendor(&self) -> Vendor {
        Vendor::JustEats
    }

    fn can_parse(&self, lines: &[&str]) -> bool {
        any_line_contains(lines, DETECTION_KEYWORD)
    }

    fn extract(&self, lines: &[&str]) -> Option<ReceiptFields> {
        let mut fields = ReceiptFields {
            phone_number: self.default_phone_number.clone(),
            ..ReceiptFields::default()
        };

        for (index, raw) in lines.iter().enumerate() {
            let line = raw.trim();
            let lower = line.to_lowercase();
            let next = lines.get(index + 1);

            if let (Some(next), true) = (next, lower == ORDER_PRICE) {
                fields.subtotal = parse_amount(next, self.currency_symbol);
            } else if starts_with_ignore_ascii_case(line, PAID_AMOUNT_PREFIX) {
                let amount = amount_after_symbol(line, self.currency_symbol);
                fields.is_paid = amount > Decimal::ZERO;
            } else if lower.contains(OUTSTANDING) {
                let amount = amount_after_symbol(line, self.currency_symbol);
                fields.is_paid = amount <= Decimal::ZERO;
            } else if lower.contains(ORDER_PAID) || lower == PAID {
                fields.is_paid = true;
            } else if let (Some(next), true) =
                (next, starts_with_ignore_ascii_case(line, CODE_MARKER))
            {
                fields.masking_code = line[CODE_MARKER.len()..].trim().to_string();
                fields.delivery_address = next.trim().to_string();
            } else if lower.contains(MASKING_FRAGMENT) {
                apply_inline_masking_line(line, &mut fields);
            }
        }

        // Totals are not printed on these receipts; `total` stays zero.
        if fields.delivery_address.is_empty() {
            return None;
        }
        Some(fields)
    }
}

/// Handles lines such as `01 483 2993 (masking code) 517616386 Knockard Dundrum Road`.
///
/// Detection ignores case but the split markers do not: a line that spells
/// `(Masking Code)` is left alone and contributes no address.
fn apply_inline_masking_line(line: &str, fields: &mut ReceiptFields) {
    let Some((before, after)) = split_around_single(line, MASKING_SPLIT) else {
        return;
    };

    if let Some(phone) = find_phone_number(before) {
        fields.phone_number = phone;
    }

    let after = after.rsplit(CODE_MARKER).next().unwrap_or(after).trim();

    let (code, address) = after
        .split_once(char::is_whitespace)
        .unwrap_or((after, ""));
    fields.masking_code = code.to_string();
    fields.delivery_address = address.trim().to_string();
}

fn find_phone_number(text: &str) -> Option<String> {
    let pattern = PHONE_PATTERN.as_ref()?;
    pattern.find(text).map(|found| {
        found
            .as_str()
            .chars()
            .filter(|ch| !ch.is_whitespace())
            .collect()
    })
}

/// Splits around the only occurrence of `marker`; lines with none or several are left alone.
fn split_around_single<'a>(line: &'a str, marker: &str) -> Option<(&'a str, &'a str)> {
    let mut parts = line.split(marker);
    let before = parts.next()?;
    let after = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    Some((before, after))
}
