//! Weekly availability rules and the per-day slot view derived from them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
#[cfg(feature = "ts-gen")]
use ts_rs::TS;

use crate::constants::{DEFAULT_DAY_END, DEFAULT_DAY_START, DEFAULT_TIME_GAP_MINUTES};
use crate::impl_domain_status_conversions;

/// Day of week, ordered Sunday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub enum Weekday {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl_domain_status_conversions!(Weekday {
    Sunday => "SUNDAY",
    Monday => "MONDAY",
    Tuesday => "TUESDAY",
    Wednesday => "WEDNESDAY",
    Thursday => "THURSDAY",
    Friday => "FRIDAY",
    Saturday => "SATURDAY",
});

impl Weekday {
    pub const ALL: [Self; 7] = [
        Self::Sunday,
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
    ];

    /// Days since Sunday (0..=6).
    pub const fn index(self) -> u32 {
        self as u32
    }

    pub const fn is_weekend(self) -> bool {
        matches!(self, Self::Saturday | Self::Sunday)
    }

    pub const fn to_chrono(self) -> chrono::Weekday {
        match self {
            Self::Sunday => chrono::Weekday::Sun,
            Self::Monday => chrono::Weekday::Mon,
            Self::Tuesday => chrono::Weekday::Tue,
            Self::Wednesday => chrono::Weekday::Wed,
            Self::Thursday => chrono::Weekday::Thu,
            Self::Friday => chrono::Weekday::Fri,
            Self::Saturday => chrono::Weekday::Sat,
        }
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(value: chrono::Weekday) -> Self {
        match value {
            chrono::Weekday::Sun => Self::Sunday,
            chrono::Weekday::Mon => Self::Monday,
            chrono::Weekday::Tue => Self::Tuesday,
            chrono::Weekday::Wed => Self::Wednesday,
            chrono::Weekday::Thu => Self::Thursday,
            chrono::Weekday::Fri => Self::Friday,
            chrono::Weekday::Sat => Self::Saturday,
        }
    }
}

/// One day of a host's recurring weekly schedule.
///
/// Times are local wall-clock strings (`HH:MM`) interpreted in the
/// configured booking time zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct WeeklyAvailabilityRule {
    pub day: Weekday,
    pub start_time: String,
    pub end_time: String,
    pub is_available: bool,
}

/// The full weekly schedule of one owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct WeeklyAvailability {
    pub owner_id: String,
    /// Step between consecutive slot starts, shared by every day.
    pub time_gap_minutes: i64,
    pub rules: Vec<WeeklyAvailabilityRule>,
}

impl WeeklyAvailability {
    /// Schedule created at registration: weekdays 09:00-17:00, weekends off.
    pub fn defaults(owner_id: impl Into<String>) -> Self {
        let rules = Weekday::ALL
            .into_iter()
            .map(|day| WeeklyAvailabilityRule {
                day,
                start_time: DEFAULT_DAY_START.to_string(),
                end_time: DEFAULT_DAY_END.to_string(),
                is_available: !day.is_weekend(),
            })
            .collect();

        Self { owner_id: owner_id.into(), time_gap_minutes: DEFAULT_TIME_GAP_MINUTES, rules }
    }

    pub fn rule_for(&self, day: Weekday) -> Option<&WeeklyAvailabilityRule> {
        self.rules.iter().find(|rule| rule.day == day)
    }
}

/// Replacement payload for an owner's weekly schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityUpdate {
    pub time_gap_minutes: i64,
    pub rules: Vec<WeeklyAvailabilityRule>,
}

/// Free slot starts for one upcoming date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct DailySlots {
    pub day: Weekday,
    #[cfg_attr(feature = "ts-gen", ts(type = "string"))]
    pub date: NaiveDate,
    pub slots: Vec<String>,
    pub is_available: bool,
}

/// Result of the public availability query for an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "days", rename_all = "snake_case")]
pub enum EventAvailability {
    /// The owner never configured a weekly schedule.
    NotConfigured,
    /// Seven entries ordered Sunday..Saturday.
    Days(Vec<DailySlots>),
}
