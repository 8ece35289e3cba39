//! # Slotwise API
//!
//! Application layer - command functions and the composition root.
//!
//! This crate contains:
//! - Commands (caller → services bridge)
//! - Application context (dependency injection)
//! - Tracing setup and the bootstrap binary
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - Wires up the hexagonal architecture
//! - Routing and request decoding belong to the embedding host

pub mod commands;
pub mod context;
pub mod utils;

// Re-export for convenience
pub use commands::*;
pub use context::*;
