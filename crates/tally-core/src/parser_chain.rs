//! Ordered registry of receipt parsers.

use std::fmt;

use chrono::NaiveDateTime;
use tracing::{debug, info};

use tally_domain::{DeliveryRecord, Vendor};

use crate::parsers::{JustEatsParser, ReceiptParser, SanMarinoParser};

/// Tries each registered parser in priority order.
///
/// The first parser whose detector accepts the text decides the outcome: if
/// its extractor finds nothing, no later parser is consulted.
pub struct ParserChain {
    parsers: Vec<Box<dyn ReceiptParser>>,
}

impl ParserChain {
    /// Empty chain; every input is unrecognized until parsers are registered.
    pub fn new() -> Self {
        Self {
            parsers: Vec::new(),
        }
    }

    /// JustEats first, then San Marino.
    pub fn standard(default_phone_number: impl Into<String>) -> Self {
        Self::new()
            .with_parser(JustEatsParser::new(default_phone_number))
            .with_parser(SanMarinoParser::new())
    }

    /// Builds a chain for the given vendors, in the given order.
    pub fn for_vendors(
        vendors: &[Vendor],
        default_phone_number: &str,
        currency_symbol: char,
    ) -> Self {
        vendors.iter().fold(Self::new(), |chain, vendor| match vendor {
            Vendor::JustEats => chain.with_parser(
                JustEatsParser::new(default_phone_number).with_currency_symbol(currency_symbol),
            ),
            Vendor::SanMarino => {
                chain.with_parser(SanMarinoParser::new().with_currency_symbol(currency_symbol))
            }
        })
    }

    pub fn with_parser(mut self, parser: impl ReceiptParser + 'static) -> Self {
        self.register(Box::new(parser));
        self
    }

    /// Appends a parser with the lowest priority so far.
    pub fn register(&mut self, parser: Box<dyn ReceiptParser>) {
        self.parsers.push(parser);
    }

    pub fn parser_names(&self) -> Vec<&'static str> {
        self.parsers.iter().map(|parser| parser.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.parsers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parsers.is_empty()
    }

    /// First parser whose detector accepts the lines.
    pub fn detect(&self, lines: &[&str]) -> Option<&dyn ReceiptParser> {
        self.parsers
            .iter()
            .map(|parser| parser.as_ref())
            .find(|parser| parser.can_parse(lines))
    }

    /// Parses pasted text into a record stamped at `captured_at`.
    pub fn process(&self, text: &str, captured_at: NaiveDateTime) -> Option<DeliveryRecord> {
        let lines = split_lines(text);
        let Some(parser) = self.detect(&lines) else {
            debug!(lines = lines.len(), "no parser recognised the receipt");
            return None;
        };

        match parser.extract(&lines) {
            Some(fields) => {
                info!(parser = parser.name(), "receipt parsed");
                Some(DeliveryRecord::new(
                    text,
                    parser.vendor(),
                    fields,
                    captured_at,
                ))
            }
            None => {
                debug!(parser = parser.name(), "receipt matched but no address was found");
                None
            }
        }
    }
}

impl Default for ParserChain {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ParserChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParserChain")
            .field("parsers", &self.parser_names())
            .finish()
    }
}

/// Splits on `\n` and `\r\n` line endings.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.lines().collect()
}
