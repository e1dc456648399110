#![doc(test(attr(deny(warnings))))]

//! DropTally turns pasted takeaway receipts into delivery records and keeps
//! per-day, per-shift tallies of them for a driver.
//!
//! The work happens in the member crates; this crate wires them together from
//! a [`Config`], owns logging setup and exposes build metadata.

pub mod errors;
pub mod session;
pub mod utils;

pub use errors::{Result, TallyError};
pub use session::{day_snapshot_json, parser_chain_from_config, tracker_from_config};
pub use tally_config::{Config, ConfigError, ConfigManager};
pub use tally_core::{
    api_day_snapshot, api_record_view, ApiDaySnapshot, ApiRecordView, Clock, CoreError,
    DeliveryTracker, IngestOutcome, ParserChain, ReceiptParser, RejectReason, ShiftBreakdown,
    SummaryService, SystemClock,
};
pub use tally_domain::{
    CalendarDay, DailySummary, DeliveryRecord, Shift, ShiftWindow, TimeOfDay, Vendor,
};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        let build = utils::build_info::current();
        tracing::info!(
            version = build.version,
            git = build.git_hash,
            "DropTally tracing initialized."
        );
    });
}
