//! Availability service - weekly schedules and the public seven-day view

use std::collections::HashSet;
use std::sync::Arc;

use chrono_tz::Tz;
use slotwise_domain::constants::{DEFAULT_DAY_END, DEFAULT_DAY_START, MAX_SLOT_MINUTES};
use slotwise_domain::{
    AvailabilityUpdate, BookableEvent, DailySlots, EventAvailability, Meeting, Result,
    SlotwiseError, WeeklyAvailability, WeeklyAvailabilityRule, Weekday,
};
use tracing::{debug, instrument, warn};

use super::ports::AvailabilityRepository;
use crate::booking::ports::{EventRepository, MeetingRepository};
use crate::clock::Clock;
use crate::slots::{generate_slots, parse_wall_clock, DaySchedule, Interval};
use crate::time_window::{local_day_bounds, local_today, week_window};

pub struct AvailabilityService {
    events: Arc<dyn EventRepository>,
    availability: Arc<dyn AvailabilityRepository>,
    meetings: Arc<dyn MeetingRepository>,
    clock: Arc<dyn Clock>,
    time_zone: Tz,
}

impl AvailabilityService {
    pub fn new(
        events: Arc<dyn EventRepository>,
        availability: Arc<dyn AvailabilityRepository>,
        meetings: Arc<dyn MeetingRepository>,
        clock: Arc<dyn Clock>,
        time_zone: Tz,
    ) -> Self {
        Self { events, availability, meetings, clock, time_zone }
    }

    /// Free slots for a public event over the next seven days.
    ///
    /// Meetings are fetched once for the whole window. A day whose slots
    /// cannot be computed is logged and reported with no slots; the rest of
    /// the week is still returned.
    ///
    /// # Errors
    /// `NotFound` when the event is missing or private. Storage failures
    /// propagate.
    #[instrument(skip(self))]
    pub async fn event_availability(&self, event_id: &str) -> Result<EventAvailability> {
        let event = self.public_event(event_id).await?;

        let Some(weekly) = self.availability.get_weekly_availability(&event.owner_id).await? else {
            debug!(owner_id = %event.owner_id, "owner has no weekly availability");
            return Ok(EventAvailability::NotConfigured);
        };

        let now = self.clock.now();
        let window = week_window(local_today(now, self.time_zone));

        let first = window.iter().map(|(_, date)| *date).min();
        let last = window.iter().map(|(_, date)| *date).max();
        let (Some(first), Some(last)) = (first, last) else {
            return Ok(EventAvailability::Days(Vec::new()));
        };
        let (range_start, _) = local_day_bounds(first, self.time_zone)?;
        let (_, range_end) = local_day_bounds(last, self.time_zone)?;

        let meetings = self
            .meetings
            .scheduled_meetings_between(&event.owner_id, range_start, range_end)
            .await?;

        debug!(
            owner_id = %event.owner_id,
            meetings = meetings.len(),
            %range_start,
            %range_end,
            "computing weekly slots"
        );

        let days = window
            .into_iter()
            .map(|(day, date)| {
                let Some(rule) = weekly.rule_for(day).filter(|rule| rule.is_available) else {
                    return DailySlots { day, date, slots: Vec::new(), is_available: false };
                };

                let slots = self
                    .slots_for_day(&event, rule, weekly.time_gap_minutes, date, &meetings, now)
                    .unwrap_or_else(|err| {
                        warn!(
                            event_id = %event.id,
                            %day,
                            %date,
                            error = %err,
                            "failed to generate slots for day"
                        );
                        Vec::new()
                    });

                DailySlots { day, date, slots, is_available: true }
            })
            .collect();

        Ok(EventAvailability::Days(days))
    }

    /// Stored weekly schedule of an owner.
    pub async fn owner_availability(&self, owner_id: &str) -> Result<WeeklyAvailability> {
        self.availability.get_weekly_availability(owner_id).await?.ok_or_else(|| {
            SlotwiseError::NotFound(format!("availability for user {owner_id}"))
        })
    }

    /// Validate and replace an owner's weekly schedule.
    ///
    /// Weekdays missing from the update are stored as unavailable, so the
    /// stored schedule always holds one rule per weekday.
    ///
    /// # Errors
    /// `Validation` for a gap outside `1..=1440` minutes, duplicate weekdays,
    /// malformed times or an available day whose start is not before its end.
    #[instrument(skip(self, update), fields(rules = update.rules.len()))]
    pub async fn update_availability(
        &self,
        owner_id: &str,
        update: AvailabilityUpdate,
    ) -> Result<WeeklyAvailability> {
        validate_update(&update)?;

        let mut rules = update.rules;
        for day in Weekday::ALL {
            if !rules.iter().any(|rule| rule.day == day) {
                rules.push(WeeklyAvailabilityRule {
                    day,
                    start_time: DEFAULT_DAY_START.to_string(),
                    end_time: DEFAULT_DAY_END.to_string(),
                    is_available: false,
                });
            }
        }
        rules.sort_by_key(|rule| rule.day);
        let availability = WeeklyAvailability {
            owner_id: owner_id.to_string(),
            time_gap_minutes: update.time_gap_minutes,
            rules,
        };

        self.availability.replace_weekly_availability(&availability).await?;
        debug!(owner_id, "weekly availability replaced");
        Ok(availability)
    }

    /// Install the registration defaults for a new owner.
    pub async fn provision_defaults(&self, owner_id: &str) -> Result<WeeklyAvailability> {
        let availability = WeeklyAvailability::defaults(owner_id);
        self.availability.replace_weekly_availability(&availability).await?;
        Ok(availability)
    }

    async fn public_event(&self, event_id: &str) -> Result<BookableEvent> {
        self.events
            .get_event(event_id)
            .await?
            .filter(|event| !event.is_private)
            .ok_or_else(|| SlotwiseError::NotFound(format!("event {event_id}")))
    }

    fn slots_for_day(
        &self,
        event: &BookableEvent,
        rule: &WeeklyAvailabilityRule,
        gap_minutes: i64,
        date: chrono::NaiveDate,
        meetings: &[Meeting],
        now: chrono::DateTime<chrono::Utc>,
    ) -> Result<Vec<String>> {
        let (day_start, day_end) = local_day_bounds(date, self.time_zone)?;
        let day = Interval::new(day_start, day_end);
        let booked: Vec<Interval> =
            meetings.iter().map(Interval::from).filter(|m| m.overlaps(&day)).collect();

        let schedule = DaySchedule {
            date,
            time_zone: self.time_zone,
            open: &rule.start_time,
            close: &rule.end_time,
            duration_minutes: event.duration_minutes,
            gap_minutes,
        };
        generate_slots(&schedule, &booked, now)
    }
}

fn validate_update(update: &AvailabilityUpdate) -> Result<()> {
    if !(1..=MAX_SLOT_MINUTES).contains(&update.time_gap_minutes) {
        return Err(SlotwiseError::Validation(format!(
            "time gap must be between 1 and {MAX_SLOT_MINUTES} minutes, got {}",
            update.time_gap_minutes
        )));
    }

    let mut seen: HashSet<Weekday> = HashSet::new();
    for rule in &update.rules {
        if !seen.insert(rule.day) {
            return Err(SlotwiseError::Validation(format!("duplicate rule for {}", rule.day)));
        }

        let start = parse_wall_clock(&rule.start_time)?;
        let end = parse_wall_clock(&rule.end_time)?;
        if rule.is_available && start >= end {
            return Err(SlotwiseError::Validation(format!(
                "{}: start time {} must be before end time {}",
                rule.day, rule.start_time, rule.end_time
            )));
        }
    }

    Ok(())
}
