//! Vendor receipt parsers.
//!
//! Each parser pairs a cheap detector (`can_parse`) with a heuristic extractor.
//! Adding a vendor means adding a type here and registering it with the
//! [`ParserChain`](crate::ParserChain); existing parsers are never touched.

pub mod amount;
pub mod just_eats;
pub mod san_marino;

pub use just_eats::JustEatsParser;
pub use san_marino::SanMarinoParser;

use tally_domain::{ReceiptFields, Vendor};

/// Detector + extractor capability set for one receipt layout.
pub trait ReceiptParser: Send + Sync {
    /// Platform whose layout this parser understands.
    fn vendor(&self) -> Vendor;

    /// Case-insensitive keyword scan. Must be side-effect free and never panic.
    fn can_parse(&self, lines: &[&str]) -> bool;

    /// Recovers the business fields, or `None` when no address (or, where the
    /// vendor allows it, no phone number) could be established.
    fn extract(&self, lines: &[&str]) -> Option<ReceiptFields>;

    fn name(&self) -> &'static str {
        self.vendor().label()
    }
}

pub(crate) fn any_line_contains(lines: &[&str], lowercase_needle: &str) -> bool {
    lines
        .iter()
        .any(|line| line.to_lowercase().contains(lowercase_needle))
}

pub(crate) fn starts_with_ignore_ascii_case(line: &str, prefix: &str) -> bool {
    line.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_scan_ignores_case() {
        let lines = ["Order from", "JUSTEATS ltd"];
        assert!(any_line_contains(&lines, "justeats"));
        assert!(!any_line_contains(&lines, "san marino"));
        assert!(!any_line_contains(&[], "justeats"));
    }

    #[test]
    fn prefix_check_handles_short_and_multibyte_lines() {
        assert!(starts_with_ignore_ascii_case("Paid Amount €3", "paid amount"));
        assert!(!starts_with_ignore_ascii_case("Paid", "paid amount"));
        assert!(!starts_with_ignore_ascii_case("€€€€€€", "code)"));
    }
}
