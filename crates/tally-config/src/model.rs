use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tally_domain::{ShiftWindow, Vendor};

use crate::ConfigError;

const APP_DIR: &str = "DropTally";

/// User preferences that shape parsing and aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Phone number recorded for JustEats orders that show none inline.
    #[serde(default)]
    pub default_phone_number: String,

    #[serde(default)]
    pub shift_window: ShiftWindow,

    /// Parser registration order. The first detector that matches wins.
    #[serde(default = "Config::default_parsers")]
    pub parsers: Vec<Vendor>,

    #[serde(default = "Config::default_currency_symbol")]
    pub currency_symbol: char,

    #[serde(skip_serializing_if = "Option::is_none")]
    /// Optional custom data directory. Defaults to the platform data dir.
    pub base_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_phone_number: String::new(),
            shift_window: ShiftWindow::default(),
            parsers: Self::default_parsers(),
            currency_symbol: Self::default_currency_symbol(),
            base_dir: None,
        }
    }
}

impl Config {
    pub fn default_parsers() -> Vec<Vendor> {
        Vendor::ALL.to_vec()
    }

    pub fn default_currency_symbol() -> char {
        '€'
    }

    pub fn resolve_base_dir(&self) -> PathBuf {
        if let Some(path) = &self.base_dir {
            return path.clone();
        }

        dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
    }

    /// Rejects settings the tracker cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let window = &self.shift_window;
        if !window.morning_start.is_valid() || !window.morning_end.is_valid() {
            return Err(ConfigError::Invalid(format!(
                "shift window times out of range ({:?} .. {:?})",
                window.morning_start, window.morning_end
            )));
        }
        if !window.is_valid() {
            return Err(ConfigError::Invalid(format!(
                "morning shift must start before it ends ({} >= {})",
                self.shift_window.morning_start, self.shift_window.morning_end
            )));
        }
        if self.parsers.is_empty() {
            return Err(ConfigError::Invalid("no receipt parsers enabled".into()));
        }
        for (index, vendor) in self.parsers.iter().enumerate() {
            if self.parsers[..index].contains(vendor) {
                return Err(ConfigError::Invalid(format!(
                    "parser `{vendor}` listed more than once"
                )));
            }
        }
        if self.currency_symbol.is_ascii_digit() || matches!(self.currency_symbol, '.' | ',') {
            return Err(ConfigError::Invalid(format!(
                "`{}` cannot be used as a currency symbol",
                self.currency_symbol
            )));
        }
        Ok(())
    }
}
