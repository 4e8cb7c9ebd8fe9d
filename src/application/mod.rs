//! Application layer: use cases built on the domain traits

pub mod identity;
pub mod stations;

pub use identity::{AuthSession, CredentialService};
pub use stations::StationService;
