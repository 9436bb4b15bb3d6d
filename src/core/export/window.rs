//! Retention window and destination path calculation
//!
//! Every export covers exactly one day: the window ends `retention_days`
//! days before "now" and starts one day earlier. The destination prefix
//! is derived from the source identifier and the window's start date, so
//! two runs on the same day write to the same prefix and consecutive days
//! never overlap.

use crate::domain::ids::{SourceId, SOURCE_SEPARATOR};
use crate::domain::{LogvaultError, Result};
use chrono::{DateTime, Datelike, Days, Duration, NaiveDate, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};

/// Replacement for the hierarchy separator in destination prefixes
pub const FLAT_SEPARATOR: char = '-';

/// One-day export window as epoch milliseconds, `[from, to)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetentionWindow {
    pub from_millis: i64,
    pub to_millis: i64,

    /// Calendar date of the window start, in the time zone "now" was taken in
    pub start_date: NaiveDate,
}

impl RetentionWindow {
    /// Window length in milliseconds
    pub fn duration_millis(&self) -> i64 {
        self.to_millis - self.from_millis
    }
}

/// Compute the export window for `now` and `retention_days`
///
/// Subtraction is done in whole calendar days on `now`'s local wall-clock
/// time, so month and year boundaries roll over correctly. A local time
/// that occurs twice (clocks set back) resolves to its earlier instant; one
/// that never occurs (clocks set forward) moves forward by an hour.
///
/// # Errors
///
/// Returns a validation error if the window would fall outside the
/// representable date range.
///
/// # Example
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use logvault::core::export::window::compute_window;
///
/// let now = Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap();
/// let window = compute_window(&now, 1).unwrap();
/// assert_eq!(window.start_date.to_string(), "2024-02-29");
/// assert_eq!(window.duration_millis(), 86_400_000);
/// ```
pub fn compute_window<Tz: TimeZone>(now: &DateTime<Tz>, retention_days: u32) -> Result<RetentionWindow> {
    let local_end = now
        .naive_local()
        .checked_sub_days(Days::new(u64::from(retention_days)))
        .ok_or_else(|| out_of_range(retention_days))?;
    let local_start = local_end
        .checked_sub_days(Days::new(1))
        .ok_or_else(|| out_of_range(retention_days))?;

    let tz = now.timezone();
    let day_end = resolve_local(&tz, local_end).ok_or_else(|| out_of_range(retention_days))?;
    let day_start = resolve_local(&tz, local_start).ok_or_else(|| out_of_range(retention_days))?;

    Ok(RetentionWindow {
        from_millis: day_start.timestamp_millis(),
        to_millis: day_end.timestamp_millis(),
        start_date: local_start.date(),
    })
}

/// Map a local wall-clock time to an instant in `tz`
fn resolve_local<Tz: TimeZone>(tz: &Tz, local: NaiveDateTime) -> Option<DateTime<Tz>> {
    tz.from_local_datetime(&local).earliest().or_else(|| {
        let shifted = local.checked_add_signed(Duration::hours(1))?;
        tz.from_local_datetime(&shifted).earliest()
    })
}

fn out_of_range(retention_days: u32) -> LogvaultError {
    LogvaultError::Validation(format!(
        "Retention of {retention_days} days puts the export window out of range"
    ))
}

/// Destination prefix for `source` and the window's start date
///
/// Hierarchy separators become `-`, one leading `-` is dropped, and the
/// un-padded `year/month/day` of `start_date` is appended.
///
/// ```
/// use chrono::NaiveDate;
/// use logvault::core::export::window::compute_destination_path;
/// use logvault::domain::SourceId;
///
/// let source = SourceId::new("/aws/ecs/app-a").unwrap();
/// let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
/// assert_eq!(compute_destination_path(&source, date), "aws-ecs-app-a/2024/2/29");
/// ```
pub fn compute_destination_path(source: &SourceId, start_date: NaiveDate) -> String {
    let flattened = source.as_str().replace(SOURCE_SEPARATOR, &FLAT_SEPARATOR.to_string());
    let sanitized = flattened.strip_prefix(FLAT_SEPARATOR).unwrap_or(&flattened);

    format!(
        "{sanitized}/{}/{}/{}",
        start_date.year(),
        start_date.month(),
        start_date.day()
    )
}
