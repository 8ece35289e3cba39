//! Meeting booking and cancellation

pub mod ports;
pub mod service;

pub use service::BookingService;
