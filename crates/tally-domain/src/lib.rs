//! tally-domain
//!
//! Pure domain models for delivery tracking (records, calendar days, clock values, summaries).
//! No I/O, no parsing, no storage. Only data types and the rules that belong to them.

pub mod calendar;
pub mod common;
pub mod record;
pub mod summary;

pub use calendar::*;
pub use common::*;
pub use record::*;
pub use summary::*;
