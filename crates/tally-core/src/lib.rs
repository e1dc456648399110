//! tally-core
//!
//! Receipt extraction and delivery aggregation for DropTally.
//! Depends on tally-domain. No terminal I/O, no clipboard access, no storage.

pub mod error;
pub mod parser_chain;
pub mod parsers;
pub mod public_api;
pub mod summary_service;
pub mod time;
pub mod tracker;

pub use error::CoreError;
pub use parser_chain::*;
pub use parsers::{JustEatsParser, ReceiptParser, SanMarinoParser};
pub use public_api::*;
pub use summary_service::*;
pub use time::{Clock, SystemClock};
pub use tracker::*;
