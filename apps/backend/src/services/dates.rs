//! Server-local calendar day helpers.

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// The current calendar date in the server's local timezone.
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// UTC instants bounding a local calendar day as `[start, end)`.
pub fn local_day_bounds(day: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = local_midnight(day);
    let end = match day.succ_opt() {
        Some(next) => local_midnight(next),
        None => start + Duration::days(1),
    };
    (start, end)
}

/// Local midnight as a UTC instant. A midnight skipped by a DST jump
/// falls back to interpreting the wall time as UTC.
fn local_midnight(day: NaiveDate) -> DateTime<Utc> {
    let midnight = NaiveDateTime::from(day);
    match Local.from_local_datetime(&midnight).earliest() {
        Some(local) => local.with_timezone(&Utc),
        None => Utc.from_utc_datetime(&midnight),
    }
}
