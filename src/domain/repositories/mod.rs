//! Repository traits for the domain layer
//!
//! `RepositoryProvider` gives unified access to the per-aggregate
//! repositories, so use cases depend on one handle:
//!
//! ```ignore
//! async fn handle(repos: &dyn RepositoryProvider) {
//!     let owner = repos.users().find_by_id(&owner_id).await?;
//!     let stations = repos.stations().find_by_owner(&owner_id).await?;
//! }
//! ```

use super::station::StationRepository;
use super::user::UserRepository;

pub trait RepositoryProvider: Send + Sync {
    fn users(&self) -> &dyn UserRepository;
    fn stations(&self) -> &dyn StationRepository;
}
