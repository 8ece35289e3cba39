//! Domain types and models

pub mod availability;
pub mod calendar;
pub mod event;
pub mod integration;
pub mod meeting;

pub use availability::{
    AvailabilityUpdate, DailySlots, EventAvailability, WeeklyAvailability, WeeklyAvailabilityRule,
    Weekday,
};
pub use calendar::{ReconciliationEvent, ReconciliationKind, RemoteEvent, RemoteEventSpec};
pub use event::{BookableEvent, EventLocationType};
pub use integration::{
    IntegrationAppType, IntegrationCategory, IntegrationCredential, IntegrationProvider,
    IntegrationStatus, OAuthState, TokenGrant,
};
pub use meeting::{BookingRequest, Meeting, MeetingFilter, MeetingStatus, NewMeeting};
