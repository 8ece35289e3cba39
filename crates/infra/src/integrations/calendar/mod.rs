//! Google Meet & Calendar integration
//!
//! - [`GoogleOAuthClient`]: consent URL, code exchange and token refresh
//! - [`GoogleCalendarProvider`]: create and delete events with a Meet link

pub mod oauth;
pub mod providers;

pub use oauth::{decode_state, encode_state, GoogleOAuthClient, GoogleOAuthSettings};
pub use providers::GoogleCalendarProvider;
