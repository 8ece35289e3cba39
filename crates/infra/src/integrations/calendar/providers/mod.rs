//! Remote calendar providers

pub mod google;

pub use google::GoogleCalendarProvider;
