//! Delivery records produced from pasted receipts.

use chrono::{NaiveDateTime, Timelike};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calendar::{CalendarDay, TimeOfDay};
use crate::common::{Amounted, Identifiable, Vendor};

/// Address recorded when a receipt carried a phone number but no address block.
pub const ADDRESS_NOT_FOUND: &str = "Address not found";

/// Latest minute past midnight that still belongs to the previous working day.
pub const LATE_NIGHT_CUTOFF_MINUTE: u32 = 30;

/// Business fields recovered from a receipt before the record is stamped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptFields {
    pub delivery_address: String,
    pub subtotal: Decimal,
    pub total: Decimal,
    pub is_paid: bool,
    pub phone_number: String,
    pub masking_code: String,
}

/// A parsed delivery with its effective timestamp.
///
/// Everything except the paid flag is fixed at construction. Records are
/// exported but never read back, so [`DeliveryRecord::new`] is the only way in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryRecord {
    id: Uuid,
    raw_text: String,
    vendor: Vendor,
    delivery_address: String,
    subtotal: Decimal,
    total: Decimal,
    is_paid: bool,
    phone_number: String,
    masking_code: String,
    effective_timestamp: NaiveDateTime,
}

impl DeliveryRecord {
    /// Stamps extracted fields with a fresh identifier and the late-night adjusted capture time.
    pub fn new(
        raw_text: impl Into<String>,
        vendor: Vendor,
        fields: ReceiptFields,
        captured_at: NaiveDateTime,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            raw_text: raw_text.into(),
            vendor,
            delivery_address: fields.delivery_address,
            subtotal: fields.subtotal,
            total: fields.total,
            is_paid: fields.is_paid,
            phone_number: fields.phone_number,
            masking_code: fields.masking_code,
            effective_timestamp: adjust_for_late_night(captured_at),
        }
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    pub fn vendor(&self) -> Vendor {
        self.vendor
    }

    pub fn delivery_address(&self) -> &str {
        &self.delivery_address
    }

    pub fn subtotal(&self) -> Decimal {
        self.subtotal
    }

    pub fn total(&self) -> Decimal {
        self.total
    }

    pub fn is_paid(&self) -> bool {
        self.is_paid
    }

    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    pub fn masking_code(&self) -> &str {
        &self.masking_code
    }

    pub fn effective_timestamp(&self) -> NaiveDateTime {
        self.effective_timestamp
    }

    pub fn calendar_day(&self) -> CalendarDay {
        CalendarDay::from_datetime(self.effective_timestamp)
    }

    pub fn time_of_day(&self) -> TimeOfDay {
        TimeOfDay::from_datetime(self.effective_timestamp)
    }

    pub fn set_paid(&mut self, paid: bool) {
        self.is_paid = paid;
    }

    /// Whether both records were built from the exact same pasted text.
    pub fn is_duplicate_of(&self, raw_text: &str) -> bool {
        self.raw_text == raw_text
    }
}

impl Identifiable for DeliveryRecord {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Amounted for DeliveryRecord {
    fn amount(&self) -> Decimal {
        self.subtotal
    }
}

/// Moves instants between 00:00 and 00:30 (inclusive of every second in minute 30)
/// to 23:59:59 of the previous day. All other instants pass through unchanged.
pub fn adjust_for_late_night(instant: NaiveDateTime) -> NaiveDateTime {
    if instant.hour() != 0 || instant.minute() > LATE_NIGHT_CUTOFF_MINUTE {
        return instant;
    }
    match CalendarDay::from_datetime(instant).previous() {
        Some(previous) => previous.end_of_day(),
        None => instant,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn quarter_past_midnight_rolls_back_to_previous_day() {
        assert_eq!(
            adjust_for_late_night(at(2024, 3, 1, 0, 15, 0)),
            at(2024, 2, 29, 23, 59, 59)
        );
    }

    #[test]
    fn cutoff_minute_is_inclusive() {
        assert_eq!(
            adjust_for_late_night(at(2024, 1, 1, 0, 30, 45)),
            at(2023, 12, 31, 23, 59, 59)
        );
        assert_eq!(
            adjust_for_late_night(at(2024, 1, 1, 0, 0, 0)),
            at(2023, 12, 31, 23, 59, 59)
        );
    }

    #[test]
    fn later_times_pass_through() {
        for instant in [
            at(2024, 1, 1, 0, 31, 0),
            at(2024, 1, 1, 0, 45, 0),
            at(2024, 1, 1, 1, 15, 0),
            at(2024, 1, 1, 23, 59, 59),
        ] {
            assert_eq!(adjust_for_late_night(instant), instant);
        }
    }

    #[test]
    fn record_applies_adjustment_at_construction() {
        let record = DeliveryRecord::new(
            "JustEats",
            Vendor::JustEats,
            ReceiptFields {
                delivery_address: "1 Main Street".into(),
                ..ReceiptFields::default()
            },
            at(2024, 6, 2, 0, 10, 0),
        );
        assert_eq!(record.effective_timestamp(), at(2024, 6, 1, 23, 59, 59));
        assert_eq!(record.calendar_day().to_string(), "2024-06-01");
        assert_eq!(record.time_of_day(), TimeOfDay::new(23, 59));
    }

    #[test]
    fn only_paid_flag_changes() {
        let mut record = DeliveryRecord::new(
            "text",
            Vendor::SanMarino,
            ReceiptFields::default(),
            at(2024, 6, 2, 12, 0, 0),
        );
        let before = record.clone();
        record.set_paid(true);
        assert!(record.is_paid());
        assert_eq!(record.id(), before.id());
        assert_eq!(record.effective_timestamp(), before.effective_timestamp());
    }

    #[test]
    fn identifiers_are_independent_of_content() {
        let make = || {
            DeliveryRecord::new(
                "same",
                Vendor::JustEats,
                ReceiptFields::default(),
                at(2024, 6, 2, 12, 0, 0),
            )
        };
        let (a, b) = (make(), make());
        assert_ne!(a.id(), b.id());
        assert!(a.is_duplicate_of(b.raw_text()));
    }

    #[test]
    fn export_carries_adjusted_timestamp() {
        let captured = at(2024, 9, 13, 0, 10, 0);
        let record =
            DeliveryRecord::new("text", Vendor::JustEats, ReceiptFields::default(), captured);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["effective_timestamp"], "2024-09-12T23:59:59");
    }
}
