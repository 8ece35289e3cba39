//! # Slotwise Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Time-window arithmetic and the slot generator
//! - Port/adapter interfaces (traits)
//! - Availability, credential refresh and booking services
//!
//! ## Architecture Principles
//! - Only depends on `slotwise-domain`
//! - No database, HTTP, or platform code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod availability;
pub mod booking;
pub mod clock;
pub mod credentials;
pub mod slots;
pub mod time_window;

// Re-export specific items to avoid ambiguity
pub use availability::ports::AvailabilityRepository;
pub use availability::AvailabilityService;
pub use booking::ports::{
    CalendarProvider, EventRepository, MeetingRepository, ReconciliationSink,
    TracingReconciliationSink,
};
pub use booking::BookingService;
pub use clock::{Clock, MockClock, SystemClock};
pub use credentials::ports::{CredentialRepository, TokenRefresher};
pub use credentials::{CredentialRefresher, RefreshedCredential, TokenCheck, TokenState};
pub use slots::{generate_slots, DaySchedule, Interval};
