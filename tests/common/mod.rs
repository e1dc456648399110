#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, NaiveDateTime};
use drop_tally::{Clock, DeliveryTracker};
use rust_decimal::Decimal;
use tally_domain::{DeliveryRecord, ReceiptFields, Vendor};

pub const JUST_EATS_RECEIPT: &str = "JustEats\nOrder Price\n€18.98\nPaid Amount\n...€23.87\nOutstanding\n...€0.00\ncode) 303844006\n84 Weston Park Dublin 14";

pub const SAN_MARINO_RECEIPT: &str = "SAN MARINO\n11 Grange Wood\nRathfarnham\n+353879188373\nSubtotal:\n€ 58.10\nTotal:\n€ 61.10\nPayment: Paid";

pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, 0)
        .unwrap()
}

/// Clock the test can move while the tracker holds it.
#[derive(Clone)]
pub struct FixedClock(Arc<Mutex<NaiveDateTime>>);

impl FixedClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self(Arc::new(Mutex::new(now)))
    }

    pub fn set(&self, now: NaiveDateTime) {
        *self.0.lock().unwrap() = now;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        *self.0.lock().unwrap()
    }
}

/// Standard tracker whose clock the caller keeps a handle to.
pub fn tracker_at(now: NaiveDateTime) -> (DeliveryTracker, FixedClock) {
    let clock = FixedClock::new(now);
    let tracker = DeliveryTracker::with_clock(Box::new(clock.clone()));
    (tracker, clock)
}

pub fn record(
    raw_text: &str,
    captured_at: NaiveDateTime,
    subtotal_cents: i64,
    is_paid: bool,
) -> DeliveryRecord {
    DeliveryRecord::new(
        raw_text,
        Vendor::SanMarino,
        ReceiptFields {
            delivery_address: format!("{raw_text} Street"),
            subtotal: Decimal::new(subtotal_cents, 2),
            total: Decimal::new(subtotal_cents, 2),
            is_paid,
            ..ReceiptFields::default()
        },
        captured_at,
    )
}
