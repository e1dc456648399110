//! Aggregation of delivery records into per-day shift totals.

use rust_decimal::Decimal;

use tally_domain::{Amounted, CalendarDay, DailySummary, DeliveryRecord, Shift, ShiftWindow};

/// Records behind each bucket of a [`DailySummary`], in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShiftBreakdown<'a> {
    pub morning: Vec<&'a DeliveryRecord>,
    pub evening: Vec<&'a DeliveryRecord>,
}

impl ShiftBreakdown<'_> {
    pub fn total(&self, shift: Shift) -> Decimal {
        self.records(shift)
            .iter()
            .fold(Decimal::ZERO, |total, record| total.saturating_add(record.amount()))
    }

    pub fn records(&self, shift: Shift) -> &[&DeliveryRecord] {
        match shift {
            Shift::Morning => &self.morning,
            Shift::Evening => &self.evening,
        }
    }
}

/// Recomputes daily statistics from scratch on every call.
pub struct SummaryService;

impl SummaryService {
    /// Records whose effective timestamp falls on `day`.
    pub fn records_for_day(
        records: &[DeliveryRecord],
        day: CalendarDay,
    ) -> impl Iterator<Item = &DeliveryRecord> {
        records
            .iter()
            .filter(move |record| record.calendar_day() == day)
    }

    pub fn classify(record: &DeliveryRecord, window: &ShiftWindow) -> Shift {
        window.classify(record.time_of_day())
    }

    /// Counts and subtotal sums per shift, plus the unpaid count across both.
    /// Sums saturate at the `Decimal` bounds.
    pub fn daily_summary(
        records: &[DeliveryRecord],
        day: CalendarDay,
        window: &ShiftWindow,
    ) -> DailySummary {
        let mut summary = DailySummary::empty(day);
        for record in Self::records_for_day(records, day) {
            match Self::classify(record, window) {
                Shift::Morning => {
                    summary.morning_count += 1;
                    summary.morning_total = summary.morning_total.saturating_add(record.amount());
                }
                Shift::Evening => {
                    summary.evening_count += 1;
                    summary.evening_total = summary.evening_total.saturating_add(record.amount());
                }
            }
            if !record.is_paid() {
                summary.unpaid_count += 1;
            }
        }
        summary.total_count = summary.morning_count + summary.evening_count;
        summary.grand_total = summary.morning_total.saturating_add(summary.evening_total);
        summary
    }

    pub fn shift_breakdown<'a>(
        records: &'a [DeliveryRecord],
        day: CalendarDay,
        window: &ShiftWindow,
    ) -> ShiftBreakdown<'a> {
        let mut breakdown = ShiftBreakdown::default();
        for record in Self::records_for_day(records, day) {
            match Self::classify(record, window) {
                Shift::Morning => breakdown.morning.push(record),
                Shift::Evening => breakdown.evening.push(record),
            }
        }
        breakdown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use tally_domain::{ReceiptFields, TimeOfDay, Vendor};

    fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 4, d)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn record(captured_at: NaiveDateTime, subtotal: Decimal, paid: bool) -> DeliveryRecord {
        DeliveryRecord::new(
            format!("receipt at {captured_at}"),
            Vendor::JustEats,
            ReceiptFields {
                delivery_address: "1 Road".into(),
                subtotal,
                is_paid: paid,
                ..ReceiptFields::default()
            },
            captured_at,
        )
    }

    fn day(d: u32) -> CalendarDay {
        CalendarDay::from_date(NaiveDate::from_ymd_opt(2024, 4, d).unwrap())
    }

    #[test]
    fn splits_morning_and_evening() {
        let records = vec![
            record(at(10, 10, 0), Decimal::new(1000, 2), false),
            record(at(10, 20, 0), Decimal::new(2000, 2), true),
        ];
        let summary = SummaryService::daily_summary(&records, day(10), &ShiftWindow::default());
        assert_eq!(summary.morning_count, 1);
        assert_eq!(summary.morning_total, Decimal::new(1000, 2));
        assert_eq!(summary.evening_count, 1);
        assert_eq!(summary.evening_total, Decimal::new(2000, 2));
        assert_eq!(summary.total_count, 2);
        assert_eq!(summary.grand_total, Decimal::new(3000, 2));
        assert_eq!(summary.unpaid_count, 1);
    }

    #[test]
    fn ignores_other_days() {
        let records = vec![
            record(at(9, 12, 0), Decimal::ONE, false),
            record(at(11, 12, 0), Decimal::ONE, false),
        ];
        let summary = SummaryService::daily_summary(&records, day(10), &ShiftWindow::default());
        assert_eq!(summary, DailySummary::empty(day(10)));
    }

    #[test]
    fn late_night_records_count_as_previous_evening() {
        let records = vec![record(at(11, 0, 20), Decimal::new(5, 0), false)];
        let window = ShiftWindow::default();
        assert!(SummaryService::daily_summary(&records, day(11), &window).is_empty());
        let summary = SummaryService::daily_summary(&records, day(10), &window);
        assert_eq!(summary.evening_count, 1);
        assert_eq!(summary.evening_total, Decimal::new(5, 0));
    }

    #[test]
    fn boundary_minutes() {
        let window = ShiftWindow::default();
        let cases = [
            (at(10, 9, 0), Shift::Morning),
            (at(10, 16, 59), Shift::Morning),
            (at(10, 17, 0), Shift::Evening),
            (at(10, 8, 59), Shift::Evening),
            (at(10, 0, 45), Shift::Evening),
        ];
        for (captured_at, expected) in cases {
            let rec = record(captured_at, Decimal::ZERO, true);
            assert_eq!(SummaryService::classify(&rec, &window), expected, "{captured_at}");
        }
    }

    #[test]
    fn custom_window_moves_the_boundary() {
        let window = ShiftWindow::new(TimeOfDay::new(11, 0), TimeOfDay::new(15, 30));
        let records = vec![
            record(at(10, 10, 0), Decimal::ONE, true),
            record(at(10, 15, 0), Decimal::ONE, true),
        ];
        let summary = SummaryService::daily_summary(&records, day(10), &window);
        assert_eq!((summary.morning_count, summary.evening_count), (1, 1));
    }

    #[test]
    fn breakdown_lists_bucket_members() {
        let records = vec![
            record(at(10, 10, 0), Decimal::new(1000, 2), false),
            record(at(10, 11, 0), Decimal::new(250, 2), true),
            record(at(10, 21, 0), Decimal::new(2000, 2), true),
        ];
        let breakdown =
            SummaryService::shift_breakdown(&records, day(10), &ShiftWindow::default());
        assert_eq!(breakdown.morning.len(), 2);
        assert_eq!(breakdown.evening.len(), 1);
        assert_eq!(breakdown.total(Shift::Morning), Decimal::new(1250, 2));
        assert_eq!(breakdown.records(Shift::Evening)[0].subtotal(), Decimal::new(2000, 2));
    }

    #[test]
    fn sums_saturate_instead_of_overflowing() {
        let records = vec![
            record(at(10, 10, 0), Decimal::MAX, false),
            record(at(10, 11, 0), Decimal::MAX, false),
            record(at(10, 20, 0), Decimal::MAX, false),
        ];
        let window = ShiftWindow::default();
        let summary = SummaryService::daily_summary(&records, day(10), &window);
        assert_eq!(summary.morning_total, Decimal::MAX);
        assert_eq!(summary.grand_total, Decimal::MAX);
        assert_eq!(summary.total_count, 3);

        let breakdown = SummaryService::shift_breakdown(&records, day(10), &window);
        assert_eq!(breakdown.total(Shift::Morning), Decimal::MAX);
    }
}
