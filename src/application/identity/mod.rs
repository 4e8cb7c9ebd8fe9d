//! Identity module: registration and login
//!
//! Contains the `CredentialService` which creates and verifies user
//! identities and obtains tokens from the `TokenService`.

pub mod service;

pub use service::{AuthSession, CredentialService};
