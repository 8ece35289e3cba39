//! # Slotwise Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - SQLite repositories behind an r2d2 pool
//! - The shared HTTP client
//! - Google OAuth and Calendar adapters
//! - Configuration loading
//!
//! ## Architecture
//! - Implements traits defined in `slotwise-core`
//! - Contains all "impure" code (I/O, network)

pub mod config;
pub mod database;
pub mod errors;
pub mod http;
pub mod integrations;

// Re-export commonly used items
pub use database::*;
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use integrations::calendar::{
    decode_state, encode_state, GoogleCalendarProvider, GoogleOAuthClient, GoogleOAuthSettings,
};
