//! Application constants
//!
//! Centralized location for domain-level constants used throughout the
//! application.

// Availability defaults applied at registration
pub const DEFAULT_TIME_GAP_MINUTES: i64 = 30;
pub const DEFAULT_DAY_START: &str = "09:00";
pub const DEFAULT_DAY_END: &str = "17:00";

/// Upper bound for event durations and slot gaps (one day).
pub const MAX_SLOT_MINUTES: i64 = 1440;

/// Number of days covered by the public availability view.
pub const AVAILABILITY_WINDOW_DAYS: usize = 7;

// Booking request budgets
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_REFRESH_THRESHOLD_SECS: i64 = 300;
pub const DEFAULT_TIMEZONE: &str = "UTC";

// Google endpoints
pub const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const GOOGLE_CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";
pub const GOOGLE_CALENDAR_SCOPE: &str = "https://www.googleapis.com/auth/calendar.events";
pub const GOOGLE_PRIMARY_CALENDAR: &str = "primary";
pub const GOOGLE_MEET_SOLUTION: &str = "hangoutsMeet";
