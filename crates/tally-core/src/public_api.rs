//! Stable, host-facing views over the tracker.
//!
//! Frontends (FFI, GUI shells) read these flattened snapshots instead of
//! depending on the full domain surface.

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use tally_domain::{CalendarDay, DailySummary, DeliveryRecord, Identifiable, Shift, Vendor};

use crate::DeliveryTracker;

/// One delivery as shown in a list row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiRecordView {
    pub id: Uuid,
    pub vendor: Vendor,
    pub delivery_address: String,
    pub subtotal: Decimal,
    pub total: Decimal,
    pub is_paid: bool,
    pub phone_number: String,
    pub masking_code: String,
    pub time: String,
    pub shift: Shift,
}

/// Selected day, its summary and the records behind it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiDaySnapshot {
    pub day: CalendarDay,
    pub summary: DailySummary,
    pub records: Vec<ApiRecordView>,
}

pub fn api_record_view(tracker: &DeliveryTracker, record: &DeliveryRecord) -> ApiRecordView {
    ApiRecordView {
        id: record.id(),
        vendor: record.vendor(),
        delivery_address: record.delivery_address().to_string(),
        subtotal: record.subtotal(),
        total: record.total(),
        is_paid: record.is_paid(),
        phone_number: record.phone_number().to_string(),
        masking_code: record.masking_code().to_string(),
        time: record.time_of_day().to_string(),
        shift: tracker.shift_window().classify(record.time_of_day()),
    }
}

pub fn api_day_snapshot(tracker: &DeliveryTracker) -> ApiDaySnapshot {
    ApiDaySnapshot {
        day: tracker.selected_day(),
        summary: tracker.summary().clone(),
        records: tracker
            .records_for_selected_day()
            .into_iter()
            .map(|record| api_record_view(tracker, record))
            .collect(),
    }
}
