//! Charging station repository interface

use async_trait::async_trait;

use super::{ChargingStation, StationChanges};
use crate::shared::DomainResult;

#[async_trait]
pub trait StationRepository: Send + Sync {
    async fn insert(&self, station: ChargingStation) -> DomainResult<ChargingStation>;
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<ChargingStation>>;

    /// All stations of one owner, newest first.
    async fn find_by_owner(&self, owner_id: &str) -> DomainResult<Vec<ChargingStation>>;

    /// Apply `changes` only if the station exists AND belongs to `owner_id`,
    /// as one conditional write. Returns `None` when nothing matched.
    async fn update_owned(
        &self,
        id: &str,
        owner_id: &str,
        changes: StationChanges,
    ) -> DomainResult<Option<ChargingStation>>;

    /// Delete only if the station exists AND belongs to `owner_id`.
    /// Returns whether a row was removed.
    async fn delete_owned(&self, id: &str, owner_id: &str) -> DomainResult<bool>;
}
