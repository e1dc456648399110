//! tally-ffi
//!
//! C ABI over the delivery tracker for native shells (menu bar apps, widgets).

use std::{
    ffi::{CStr, CString},
    os::raw::{c_char, c_double, c_int},
    ptr,
    sync::OnceLock,
};

use chrono::{Local, TimeZone};
use rust_decimal::{prelude::ToPrimitive, Decimal};
use uuid::Uuid;

use tally_core::{
    api_day_snapshot, CoreError, DeliveryTracker, ParserChain, RejectReason, SystemClock,
};
use tally_domain::{CalendarDay, ShiftWindow};

/// Semantic version of the C surface. Bumps when the ABI changes.
pub const FFI_VERSION: &str = "0.1.0";

pub const TALLY_OK: c_int = 0;
pub const TALLY_DUPLICATE: c_int = 1;
pub const TALLY_UNRECOGNIZED: c_int = 2;
pub const TALLY_ERR_NULL: c_int = 10;
pub const TALLY_ERR_ARGUMENT: c_int = 11;
pub const TALLY_ERR_OPERATION: c_int = 12;

/// Opaque pointer used by external callers to hold tracker state.
pub struct TrackerHandle {
    inner: DeliveryTracker,
}

impl TrackerHandle {
    fn new(tracker: DeliveryTracker) -> *mut Self {
        Box::into_raw(Box::new(Self { inner: tracker }))
    }
}

/// Selected-day figures. Calendar month is 1-based here.
#[repr(C)]
#[derive(Debug, Default, Clone, Copy)]
pub struct FfiDailySummary {
    pub year: i32,
    pub month: i32,
    pub day: i32,
    pub morning_count: c_int,
    pub evening_count: c_int,
    pub total_count: c_int,
    pub unpaid_count: c_int,
    pub morning_total: c_double,
    pub evening_total: c_double,
    pub grand_total: c_double,
}

/// Creates a tracker with the standard parsers. `default_phone` may be null.
#[no_mangle]
pub extern "C" fn tally_tracker_create(
    default_phone: *const c_char,
    out_error: *mut *mut c_char,
) -> *mut TrackerHandle {
    clear_error(out_error);
    let phone = if default_phone.is_null() {
        String::new()
    } else {
        match unsafe { c_string_argument(default_phone) } {
            Ok(value) => value,
            Err(err) => {
                unsafe {
                    write_core_error(out_error, err);
                }
                return ptr::null_mut();
            }
        }
    };

    let tracker = DeliveryTracker::new(
        ParserChain::standard(phone),
        ShiftWindow::default(),
        Box::new(SystemClock),
    );
    TrackerHandle::new(tracker)
}

#[no_mangle]
pub extern "C" fn tally_tracker_free(handle: *mut TrackerHandle) {
    if handle.is_null() {
        return;
    }
    unsafe {
        drop(Box::from_raw(handle));
    }
}

/// Parses pasted text. Returns [`TALLY_OK`], [`TALLY_DUPLICATE`] or [`TALLY_UNRECOGNIZED`].
/// On success the new record id is written to `out_record_id` when non-null.
#[no_mangle]
pub extern "C" fn tally_tracker_ingest(
    handle: *mut TrackerHandle,
    text: *const c_char,
    out_record_id: *mut *mut c_char,
    out_error: *mut *mut c_char,
) -> c_int {
    clear_error(out_error);
    let Some(tracker) = (unsafe { tracker_mut(handle, out_error) }) else {
        return TALLY_ERR_NULL;
    };
    let raw = match unsafe { c_string_argument(text) } {
        Ok(value) => value,
        Err(err) => {
            unsafe {
                write_core_error(out_error, err);
            }
            return TALLY_ERR_ARGUMENT;
        }
    };

    let outcome = tracker.ingest(&raw);
    match (outcome.record_id, outcome.reason) {
        (Some(id), _) => {
            unsafe {
                write_c_string(out_record_id, &id.to_string());
            }
            TALLY_OK
        }
        (None, Some(RejectReason::Duplicate)) => TALLY_DUPLICATE,
        (None, _) => TALLY_UNRECOGNIZED,
    }
}

/// Same as [`tally_tracker_ingest`] with the capture instant given as Unix milliseconds.
/// The instant is converted to local wall-clock time before the late-night rule applies.
#[no_mangle]
pub extern "C" fn tally_tracker_ingest_at(
    handle: *mut TrackerHandle,
    text: *const c_char,
    captured_at_millis: i64,
    out_error: *mut *mut c_char,
) -> c_int {
    clear_error(out_error);
    let Some(tracker) = (unsafe { tracker_mut(handle, out_error) }) else {
        return TALLY_ERR_NULL;
    };
    let raw = match unsafe { c_string_argument(text) } {
        Ok(value) => value,
        Err(err) => {
            unsafe {
                write_core_error(out_error, err);
            }
            return TALLY_ERR_ARGUMENT;
        }
    };
    let Some(captured_at) = Local
        .timestamp_millis_opt(captured_at_millis)
        .single()
        .map(|instant| instant.naive_local())
    else {
        unsafe {
            write_error(out_error, "capture time out of range");
        }
        return TALLY_ERR_ARGUMENT;
    };

    let Some(record) = tracker.parser_chain().process(&raw, captured_at) else {
        return TALLY_UNRECOGNIZED;
    };
    match tracker.insert(record).reason {
        None => TALLY_OK,
        Some(RejectReason::Duplicate) => TALLY_DUPLICATE,
        Some(RejectReason::Unrecognized) => TALLY_UNRECOGNIZED,
    }
}

#[no_mangle]
pub extern "C" fn tally_tracker_clear(handle: *mut TrackerHandle) -> c_int {
    match unsafe { tracker_mut(handle, ptr::null_mut()) } {
        Some(tracker) => {
            tracker.clear_all();
            TALLY_OK
        }
        None => TALLY_ERR_NULL,
    }
}

#[no_mangle]
pub extern "C" fn tally_tracker_previous_day(handle: *mut TrackerHandle) -> c_int {
    navigate(handle, DeliveryTracker::previous_day)
}

#[no_mangle]
pub extern "C" fn tally_tracker_next_day(handle: *mut TrackerHandle) -> c_int {
    navigate(handle, DeliveryTracker::next_day)
}

#[no_mangle]
pub extern "C" fn tally_tracker_today(handle: *mut TrackerHandle) -> c_int {
    navigate(handle, DeliveryTracker::today)
}

/// Selects a day. `month` is 0-based, matching the host calendar widgets.
#[no_mangle]
pub extern "C" fn tally_tracker_select_day(
    handle: *mut TrackerHandle,
    year: i32,
    month: u32,
    day: u32,
    out_error: *mut *mut c_char,
) -> c_int {
    clear_error(out_error);
    let Some(tracker) = (unsafe { tracker_mut(handle, out_error) }) else {
        return TALLY_ERR_NULL;
    };
    match CalendarDay::new(year, month, day) {
        Some(selected) => {
            tracker.select_day(selected);
            TALLY_OK
        }
        None => {
            unsafe {
                write_core_error(
                    out_error,
                    CoreError::InvalidDay(format!("{year}-{month}-{day}")),
                );
            }
            TALLY_ERR_ARGUMENT
        }
    }
}

#[no_mangle]
pub extern "C" fn tally_tracker_get_summary(
    handle: *const TrackerHandle,
    out_summary: *mut FfiDailySummary,
    out_error: *mut *mut c_char,
) -> c_int {
    clear_error(out_error);
    if handle.is_null() || out_summary.is_null() {
        unsafe {
            write_error(out_error, "tracker handle or output summary is null");
        }
        return TALLY_ERR_NULL;
    }

    let tracker = unsafe { &(*handle).inner };
    let summary = tracker.summary();
    let day = summary.day;

    unsafe {
        *out_summary = FfiDailySummary {
            year: day.year(),
            month: day.month() as i32 + 1,
            day: day.day_of_month() as i32,
            morning_count: summary.morning_count as c_int,
            evening_count: summary.evening_count as c_int,
            total_count: summary.total_count as c_int,
            unpaid_count: summary.unpaid_count as c_int,
            morning_total: decimal_to_double(summary.morning_total),
            evening_total: decimal_to_double(summary.evening_total),
            grand_total: decimal_to_double(summary.grand_total),
        };
    }

    TALLY_OK
}

/// Writes the selected day, its summary and its records as JSON.
/// Release the string with [`tally_string_free`].
#[no_mangle]
pub extern "C" fn tally_tracker_day_json(
    handle: *const TrackerHandle,
    out_json: *mut *mut c_char,
    out_error: *mut *mut c_char,
) -> c_int {
    clear_error(out_error);
    if handle.is_null() || out_json.is_null() {
        unsafe {
            write_error(out_error, "tracker handle or output string is null");
        }
        return TALLY_ERR_NULL;
    }
    let tracker = unsafe { &(*handle).inner };
    match serde_json::to_string(&api_day_snapshot(tracker)) {
        Ok(json) => {
            unsafe {
                write_c_string(out_json, &json);
            }
            TALLY_OK
        }
        Err(err) => {
            unsafe {
                write_error(out_error, &err.to_string());
            }
            TALLY_ERR_OPERATION
        }
    }
}

#[no_mangle]
pub extern "C" fn tally_tracker_set_paid(
    handle: *mut TrackerHandle,
    record_id: *const c_char,
    paid: bool,
    out_error: *mut *mut c_char,
) -> c_int {
    clear_error(out_error);
    let Some(tracker) = (unsafe { tracker_mut(handle, out_error) }) else {
        return TALLY_ERR_NULL;
    };
    let id = match unsafe { parse_uuid(record_id) } {
        Ok(id) => id,
        Err(err) => {
            unsafe {
                write_core_error(out_error, err);
            }
            return TALLY_ERR_ARGUMENT;
        }
    };
    match tracker.set_paid(id, paid) {
        Ok(()) => TALLY_OK,
        Err(err) => {
            unsafe {
                write_core_error(out_error, err);
            }
            TALLY_ERR_OPERATION
        }
    }
}

#[no_mangle]
pub extern "C" fn tally_tracker_record_count(handle: *const TrackerHandle) -> c_int {
    if handle.is_null() {
        return 0;
    }
    unsafe { (*handle).inner.len() as c_int }
}

/// Frees strings handed out by this library (ids, JSON, errors).
#[no_mangle]
pub extern "C" fn tally_string_free(value: *mut c_char) {
    if value.is_null() {
        return;
    }
    unsafe {
        drop(CString::from_raw(value));
    }
}

/// Returns the C surface version. The pointer is static and must not be freed.
#[no_mangle]
pub extern "C" fn tally_ffi_version() -> *const c_char {
    static VERSION: OnceLock<CString> = OnceLock::new();
    VERSION
        .get_or_init(|| CString::new(FFI_VERSION).unwrap_or_default())
        .as_ptr()
}

fn navigate(handle: *mut TrackerHandle, step: fn(&mut DeliveryTracker)) -> c_int {
    match unsafe { tracker_mut(handle, ptr::null_mut()) } {
        Some(tracker) => {
            step(tracker);
            TALLY_OK
        }
        None => TALLY_ERR_NULL,
    }
}

fn decimal_to_double(value: Decimal) -> c_double {
    value.to_f64().unwrap_or_default()
}

unsafe fn tracker_mut<'a>(
    handle: *mut TrackerHandle,
    out_error: *mut *mut c_char,
) -> Option<&'a mut DeliveryTracker> {
    if handle.is_null() {
        write_error(out_error, "tracker handle is null");
        return None;
    }
    Some(&mut (*handle).inner)
}

fn clear_error(out_error: *mut *mut c_char) {
    if !out_error.is_null() {
        unsafe {
            *out_error = ptr::null_mut();
        }
    }
}

/// Hands `value` to the caller as an owned C string. Skipped for null targets
/// and for values with interior NULs.
unsafe fn write_c_string(target: *mut *mut c_char, value: &str) {
    if target.is_null() {
        return;
    }
    if let Ok(cstring) = CString::new(value) {
        *target = cstring.into_raw();
    }
}

unsafe fn write_error(out_error: *mut *mut c_char, message: &str) {
    write_c_string(out_error, message);
}

unsafe fn write_core_error(out_error: *mut *mut c_char, err: CoreError) {
    write_c_string(out_error, &err.to_string());
}

unsafe fn c_string_argument(ptr: *const c_char) -> Result<String, CoreError> {
    if ptr.is_null() {
        return Err(CoreError::InvalidOperation("null string pointer received".into()));
    }
    CStr::from_ptr(ptr)
        .to_str()
        .map(str::to_owned)
        .map_err(|err| CoreError::Validation(format!("text is not UTF-8: {err}")))
}

unsafe fn parse_uuid(ptr: *const c_char) -> Result<Uuid, CoreError> {
    let raw = c_string_argument(ptr)?;
    Uuid::parse_str(raw.trim())
        .map_err(|err| CoreError::Validation(format!("invalid UUID: {err}")))
}
