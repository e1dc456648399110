//! Shared traits and enums for delivery primitives.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Exposes a stable identifier for entities held by a tracker.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

/// Supplies a common contract for retrieving the amount counted in totals.
pub trait Amounted {
    fn amount(&self) -> Decimal;
}

/// Delivery platforms whose receipt layouts are understood.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Vendor {
    JustEats,
    SanMarino,
}

impl Vendor {
    /// Registration order used when no explicit order is configured.
    pub const ALL: [Vendor; 2] = [Vendor::JustEats, Vendor::SanMarino];

    pub fn label(self) -> &'static str {
        match self {
            Vendor::JustEats => "JustEats",
            Vendor::SanMarino => "San Marino",
        }
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
