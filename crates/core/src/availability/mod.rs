//! Weekly availability and the public slot view

pub mod ports;
pub mod service;

pub use service::AvailabilityService;
