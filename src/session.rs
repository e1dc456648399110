//! Builds a tracker session from persisted preferences.

use tracing::debug;

use tally_config::Config;
use tally_core::{api_day_snapshot, Clock, DeliveryTracker, ParserChain};

use crate::Result;

/// Parser chain in the order the configuration lists the vendors.
pub fn parser_chain_from_config(config: &Config) -> ParserChain {
    ParserChain::for_vendors(
        &config.parsers,
        &config.default_phone_number,
        config.currency_symbol,
    )
}

/// Validates `config` and starts an empty session on the clock's current day.
pub fn tracker_from_config(config: &Config, clock: Box<dyn Clock>) -> Result<DeliveryTracker> {
    config.validate()?;
    let chain = parser_chain_from_config(config);
    debug!(parsers = ?chain.parser_names(), "parser chain configured");
    Ok(DeliveryTracker::new(chain, config.shift_window, clock))
}

/// Selected day, its summary and its records as pretty JSON.
pub fn day_snapshot_json(tracker: &DeliveryTracker) -> Result<String> {
    Ok(serde_json::to_string_pretty(&api_day_snapshot(tracker))?)
}
