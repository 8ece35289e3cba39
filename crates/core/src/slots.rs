//! Slot generation for a single day.
//!
//! Starting at the opening time, candidate slots of `duration` minutes are
//! stepped forward by the configured gap. A slot is offered only when it
//! ends by closing time, starts no earlier than `now`, and does not overlap
//! an existing booking on the half-open interval `[start, end)`.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use slotwise_domain::constants::{DEFAULT_TIME_GAP_MINUTES, MAX_SLOT_MINUTES};
use slotwise_domain::{Meeting, Result, SlotwiseError};

use crate::time_window::resolve_local;

/// Half-open `[start, end)` interval of instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Interval {
    pub const fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && self.end > other.start
    }
}

impl From<&Meeting> for Interval {
    fn from(meeting: &Meeting) -> Self {
        Self::new(meeting.start_time, meeting.end_time)
    }
}

/// Inputs describing one bookable day.
#[derive(Debug, Clone)]
pub struct DaySchedule<'a> {
    pub date: NaiveDate,
    pub time_zone: Tz,
    pub open: &'a str,
    pub close: &'a str,
    pub duration_minutes: i64,
    /// Values `<= 0` fall back to the default gap.
    pub gap_minutes: i64,
}

/// Parse a wall-clock string in `HH:MM` or `HH:MM:SS` form.
///
/// # Errors
/// Returns `SlotwiseError::Validation` for any other shape.
pub fn parse_wall_clock(value: &str) -> Result<NaiveTime> {
    let trimmed = value.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .map_err(|_| SlotwiseError::Validation(format!("invalid time of day '{value}', expected HH:MM")))
}

/// Compute free slot starts (`HH:MM`, local to the schedule's zone).
///
/// Pure: `now` is supplied by the caller. Output is ascending and may be
/// empty.
///
/// # Errors
/// Returns `SlotwiseError::Validation` when the duration is not positive, the
/// duration or gap exceeds a day, a time string is malformed, or
/// opening/closing time does not exist on the date in the schedule's zone.
pub fn generate_slots(
    schedule: &DaySchedule<'_>,
    booked: &[Interval],
    now: DateTime<Utc>,
) -> Result<Vec<String>> {
    if schedule.duration_minutes <= 0 || schedule.duration_minutes > MAX_SLOT_MINUTES {
        return Err(SlotwiseError::Validation(format!(
            "event duration must be between 1 and {MAX_SLOT_MINUTES} minutes, got {}",
            schedule.duration_minutes
        )));
    }
    if schedule.gap_minutes > MAX_SLOT_MINUTES {
        return Err(SlotwiseError::Validation(format!(
            "time gap must be at most {MAX_SLOT_MINUTES} minutes, got {}",
            schedule.gap_minutes
        )));
    }

    let gap_minutes =
        if schedule.gap_minutes <= 0 { DEFAULT_TIME_GAP_MINUTES } else { schedule.gap_minutes };
    let duration = Duration::minutes(schedule.duration_minutes);
    let gap = Duration::minutes(gap_minutes);

    let day_start = localize(schedule, schedule.open)?;
    let day_end = localize(schedule, schedule.close)?;

    let mut slots = Vec::new();
    let mut slot_start = day_start;

    loop {
        let slot_end = step(slot_start, duration)?;
        if slot_end > day_end {
            break;
        }

        let candidate = Interval::new(slot_start, slot_end);
        if slot_start >= now && !booked.iter().any(|b| b.overlaps(&candidate)) {
            slots.push(slot_start.with_timezone(&schedule.time_zone).format("%H:%M").to_string());
        }

        slot_start = step(slot_start, gap)?;
    }

    Ok(slots)
}

fn step(instant: DateTime<Utc>, by: Duration) -> Result<DateTime<Utc>> {
    instant.checked_add_signed(by).ok_or_else(|| {
        SlotwiseError::Validation(format!("{instant} + {by} is out of range"))
    })
}

fn localize(schedule: &DaySchedule<'_>, wall_clock: &str) -> Result<DateTime<Utc>> {
    let time = parse_wall_clock(wall_clock)?;
    resolve_local(schedule.time_zone, schedule.date.and_time(time)).ok_or_else(|| {
        SlotwiseError::Validation(format!(
            "{wall_clock} does not exist on {} in {}",
            schedule.date, schedule.time_zone
        ))
    })
}
