//! Calendar arithmetic for the seven-day availability window.

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use slotwise_domain::{Result, SlotwiseError, Weekday};

/// Next date on or after `today` that falls on `day`. Today counts.
pub fn next_occurrence(day: Weekday, today: NaiveDate) -> NaiveDate {
    let today_index = Weekday::from(today.weekday()).index();
    let offset = (day.index() + 7 - today_index) % 7;
    today + Days::new(u64::from(offset))
}

/// One upcoming date per weekday, ordered Sunday..Saturday.
pub fn week_window(today: NaiveDate) -> Vec<(Weekday, NaiveDate)> {
    Weekday::ALL.into_iter().map(|day| (day, next_occurrence(day, today))).collect()
}

/// Calendar date of `now` in `tz`.
pub fn local_today(now: DateTime<Utc>, tz: Tz) -> NaiveDate {
    now.with_timezone(&tz).date_naive()
}

/// Resolve a local wall-clock time to an instant.
///
/// Ambiguous times (clock set back) resolve to the earlier instant;
/// times inside a DST gap do not exist and yield `None`.
pub fn resolve_local(tz: Tz, local: NaiveDateTime) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(&local).earliest().map(|dt| dt.with_timezone(&Utc))
}

/// UTC instants of local midnight on `date` and on the following day.
///
/// # Errors
/// Returns `SlotwiseError::Validation` if the date is out of range or a
/// midnight falls inside a DST gap that cannot be resolved.
pub fn local_day_bounds(date: NaiveDate, tz: Tz) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let next = date
        .checked_add_days(Days::new(1))
        .ok_or_else(|| SlotwiseError::Validation(format!("date out of range: {date}")))?;
    Ok((start_of_local_day(date, tz)?, start_of_local_day(next, tz)?))
}

fn start_of_local_day(date: NaiveDate, tz: Tz) -> Result<DateTime<Utc>> {
    let midnight = date.and_time(NaiveTime::MIN);
    // Zones that skip midnight start the day at the end of the gap.
    resolve_local(tz, midnight)
        .or_else(|| resolve_local(tz, midnight + chrono::Duration::hours(1)))
        .ok_or_else(|| {
            SlotwiseError::Validation(format!("local midnight of {date} does not exist in {tz}"))
        })
}
