//! Integration credentials and token refresh

pub mod ports;
pub mod refresher;

pub use refresher::{CredentialRefresher, RefreshedCredential, TokenCheck, TokenState};
