//! Commands - the surface a host (HTTP router, CLI, desktop shell) calls into

mod availability;
mod booking;
mod integrations;

pub use availability::*;
pub use booking::*;
pub use integrations::*;
