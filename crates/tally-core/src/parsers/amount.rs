//! Lenient currency amount parsing.
//!
//! Malformed tokens are never an error: they count as zero so that a receipt
//! with one garbled price still yields a record.

use std::str::FromStr;

use rust_decimal::Decimal;
use tracing::trace;

pub const DEFAULT_CURRENCY_SYMBOL: char = '€';

/// Strips the currency symbol, reads `,` as the decimal separator and parses
/// what is left. Returns zero when the token is not a number.
pub fn parse_amount(token: &str, currency_symbol: char) -> Decimal {
    let cleaned = token.replace(currency_symbol, "").replace(',', ".");
    match Decimal::from_str(cleaned.trim()) {
        Ok(amount) => amount,
        Err(err) => {
            trace!(token, %err, "unparseable amount treated as zero");
            Decimal::ZERO
        }
    }
}

/// Parses whatever follows the last currency symbol on the line.
pub fn amount_after_symbol(line: &str, currency_symbol: char) -> Decimal {
    let tail = line.rsplit(currency_symbol).next().unwrap_or_default();
    parse_amount(tail, currency_symbol)
}
