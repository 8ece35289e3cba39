//! Database implementations

pub mod availability_repository;
pub mod credential_repository;
pub mod event_repository;
pub mod manager;
pub mod meeting_repository;
pub mod reconciliation_repository;
mod rows;

pub use availability_repository::*;
pub use credential_repository::*;
pub use event_repository::*;
pub use manager::*;
pub use meeting_repository::*;
pub use reconciliation_repository::*;
