//! Session state: the in-memory record collection, the selected day and its summary.
//!
//! The tracker performs no internal synchronization. Hosts that share it
//! between threads must serialize every mutating call themselves.

use std::fmt;

use tracing::{debug, info};
use uuid::Uuid;

use tally_domain::{
    CalendarDay, DailySummary, DeliveryRecord, Identifiable, ShiftWindow,
};

use crate::{Clock, CoreError, ParserChain, ShiftBreakdown, SummaryService};

/// Why a pasted text did not produce a new record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The exact same text was ingested before.
    Duplicate,
    /// No parser recognised the text, or the matching parser found no address.
    Unrecognized,
}

/// Result of handing pasted text to the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestOutcome {
    pub accepted: bool,
    pub reason: Option<RejectReason>,
    pub record_id: Option<Uuid>,
}

impl IngestOutcome {
    fn accepted(record_id: Uuid) -> Self {
        Self {
            accepted: true,
            reason: None,
            record_id: Some(record_id),
        }
    }

    fn rejected(reason: RejectReason) -> Self {
        Self {
            accepted: false,
            reason: Some(reason),
            record_id: None,
        }
    }

    /// Maps rejections onto [`CoreError`] for callers that prefer `?`.
    pub fn into_result(self) -> Result<Uuid, CoreError> {
        match (self.record_id, self.reason) {
            (Some(id), _) => Ok(id),
            (None, Some(RejectReason::Duplicate)) => Err(CoreError::DuplicateInput),
            (None, _) => Err(CoreError::UnrecognizedFormat),
        }
    }
}

/// Callback invoked with the recomputed summary after every mutation.
pub type ChangeListener = Box<dyn FnMut(&DailySummary) + Send>;

pub struct DeliveryTracker {
    records: Vec<DeliveryRecord>,
    selected_day: CalendarDay,
    summary: DailySummary,
    window: ShiftWindow,
    chain: ParserChain,
    clock: Box<dyn Clock>,
    listener: Option<ChangeListener>,
}

impl DeliveryTracker {
    /// Starts an empty session on the clock's current day.
    pub fn new(chain: ParserChain, window: ShiftWindow, clock: Box<dyn Clock>) -> Self {
        let selected_day = CalendarDay::from_date(clock.today());
        Self {
            records: Vec::new(),
            selected_day,
            summary: DailySummary::empty(selected_day),
            window,
            chain,
            clock,
            listener: None,
        }
    }

    /// Standard parser chain and default shift window.
    pub fn with_clock(clock: Box<dyn Clock>) -> Self {
        Self::new(ParserChain::standard(""), ShiftWindow::default(), clock)
    }

    pub fn on_change(&mut self, listener: impl FnMut(&DailySummary) + Send + 'static) {
        self.listener = Some(Box::new(listener));
    }

    pub fn clear_listener(&mut self) {
        self.listener = None;
    }

    /// Parses `raw_text` and stores the record unless identical text is already held.
    pub fn ingest(&mut self, raw_text: &str) -> IngestOutcome {
        match self.chain.process(raw_text, self.clock.now()) {
            Some(record) => self.insert(record),
            None => {
                debug!("pasted text not recognised");
                IngestOutcome::rejected(RejectReason::Unrecognized)
            }
        }
    }

    /// Adds an already built record (samples, replays). Deduplicates on raw text.
    pub fn insert(&mut self, record: DeliveryRecord) -> IngestOutcome {
        if self.contains_text(record.raw_text()) {
            debug!("duplicate receipt ignored");
            return IngestOutcome::rejected(RejectReason::Duplicate);
        }
        let id = record.id();
        info!(
            record = %id,
            vendor = %record.vendor(),
            address = record.delivery_address(),
            day = %record.calendar_day(),
            "delivery recorded"
        );
        self.records.push(record);
        self.recompute();
        IngestOutcome::accepted(id)
    }

    pub fn contains_text(&self, raw_text: &str) -> bool {
        self.records
            .iter()
            .any(|record| record.is_duplicate_of(raw_text))
    }

    pub fn clear_all(&mut self) {
        info!(cleared = self.records.len(), "all deliveries cleared");
        self.records.clear();
        self.recompute();
    }

    pub fn set_paid(&mut self, id: Uuid, paid: bool) -> Result<(), CoreError> {
        let record = self
            .records
            .iter_mut()
            .find(|record| record.id() == id)
            .ok_or(CoreError::RecordNotFound(id))?;
        record.set_paid(paid);
        debug!(record = %id, paid, "paid flag updated");
        self.recompute();
        Ok(())
    }

    pub fn select_day(&mut self, day: CalendarDay) {
        debug!(day = %day, "day selected");
        self.selected_day = day;
        self.recompute();
    }

    /// Steps back one day; stays put at the start of the supported range.
    pub fn previous_day(&mut self) {
        let day = self.selected_day.previous().unwrap_or(self.selected_day);
        self.select_day(day);
    }

    /// Steps forward one day; stays put at the end of the supported range.
    pub fn next_day(&mut self) {
        let day = self.selected_day.next().unwrap_or(self.selected_day);
        self.select_day(day);
    }

    pub fn today(&mut self) {
        let day = CalendarDay::from_date(self.clock.today());
        self.select_day(day);
    }

    pub fn selected_day(&self) -> CalendarDay {
        self.selected_day
    }

    pub fn summary(&self) -> &DailySummary {
        &self.summary
    }

    pub fn shift_window(&self) -> &ShiftWindow {
        &self.window
    }

    pub fn parser_chain(&self) -> &ParserChain {
        &self.chain
    }

    /// Records on the selected day, in insertion order.
    pub fn records_for_selected_day(&self) -> Vec<&DeliveryRecord> {
        SummaryService::records_for_day(&self.records, self.selected_day).collect()
    }

    pub fn shift_breakdown(&self) -> ShiftBreakdown<'_> {
        SummaryService::shift_breakdown(&self.records, self.selected_day, &self.window)
    }

    /// Every record held, in insertion order.
    pub fn all_records(&self) -> &[DeliveryRecord] {
        &self.records
    }

    pub fn record(&self, id: Uuid) -> Option<&DeliveryRecord> {
        self.records.iter().find(|record| record.id() == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn recompute(&mut self) {
        self.summary =
            SummaryService::daily_summary(&self.records, self.selected_day, &self.window);
        if let Some(listener) = self.listener.as_mut() {
            listener(&self.summary);
        }
    }
}

impl fmt::Debug for DeliveryTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeliveryTracker")
            .field("records", &self.records.len())
            .field("selected_day", &self.selected_day)
            .field("summary", &self.summary)
            .field("window", &self.window)
            .field("chain", &self.chain)
            .finish()
    }
}
