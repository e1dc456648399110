//! Morning/evening shift classification and per-day delivery totals.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calendar::{CalendarDay, TimeOfDay};

/// Half of the working day a delivery is counted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shift {
    Morning,
    Evening,
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Shift::Morning => "Morning",
            Shift::Evening => "Evening",
        };
        f.write_str(label)
    }
}

/// Half-open `[morning_start, morning_end)` window in comparable minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftWindow {
    pub morning_start: TimeOfDay,
    pub morning_end: TimeOfDay,
}

impl ShiftWindow {
    pub const DEFAULT_MORNING_START: TimeOfDay = TimeOfDay::new(9, 0);
    pub const DEFAULT_MORNING_END: TimeOfDay = TimeOfDay::new(17, 0);

    pub fn new(morning_start: TimeOfDay, morning_end: TimeOfDay) -> Self {
        Self {
            morning_start,
            morning_end,
        }
    }

    /// Everything outside the morning window, including the 00:00/00:30
    /// rollover values, is evening.
    pub fn classify(&self, time: TimeOfDay) -> Shift {
        let minutes = time.comparable_minutes();
        if minutes >= self.morning_start.comparable_minutes()
            && minutes < self.morning_end.comparable_minutes()
        {
            Shift::Morning
        } else {
            Shift::Evening
        }
    }

    /// A window is usable when both ends are real clock values and the
    /// start sorts strictly before the end.
    pub fn is_valid(&self) -> bool {
        self.morning_start.is_valid()
            && self.morning_end.is_valid()
            && self.morning_start.comparable_minutes() < self.morning_end.comparable_minutes()
    }
}

impl Default for ShiftWindow {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MORNING_START, Self::DEFAULT_MORNING_END)
    }
}

/// Derived delivery statistics for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySummary {
    pub day: CalendarDay,
    pub morning_count: usize,
    pub evening_count: usize,
    pub total_count: usize,
    pub morning_total: Decimal,
    pub evening_total: Decimal,
    pub grand_total: Decimal,
    pub unpaid_count: usize,
}

impl DailySummary {
    /// Zeroed summary for a day with no deliveries.
    pub fn empty(day: CalendarDay) -> Self {
        Self {
            day,
            morning_count: 0,
            evening_count: 0,
            total_count: 0,
            morning_total: Decimal::ZERO,
            evening_total: Decimal::ZERO,
            grand_total: Decimal::ZERO,
            unpaid_count: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_count == 0
    }
}
