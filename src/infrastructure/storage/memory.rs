//! In-memory storage implementation

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use crate::domain::{
    ChargingStation, CreateUserDto, DomainError, DomainResult, RepositoryProvider,
    StationChanges, StationRepository, User, UserRepository,
};

/// In-memory users for development and testing
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: DashMap<String, User>,
    /// username -> id; the entry API makes the uniqueness check atomic
    usernames: DashMap<String, String>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create_user(&self, dto: CreateUserDto) -> DomainResult<User> {
        let user = User {
            id: Uuid::new_v4().to_string(),
            username: dto.username,
            password_hash: dto.password_hash,
            created_at: Utc::now(),
        };

        match self.usernames.entry(user.username.clone()) {
            dashmap::mapref::entry::Entry::Occupied(_) => {
                return Err(DomainError::DuplicateUser(user.username));
            }
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(user.id.clone());
            }
        }
        self.users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>> {
        Ok(self.users.get(id).map(|u| u.clone()))
    }

    async fn find_by_username(&self, username: &str) -> DomainResult<Option<User>> {
        Ok(self
            .usernames
            .get(username)
            .and_then(|id| self.users.get(id.value()).map(|u| u.clone())))
    }
}

/// In-memory stations for development and testing
#[derive(Default)]
pub struct InMemoryStationRepository {
    /// id -> (insertion sequence, station)
    stations: DashMap<String, (u64, ChargingStation)>,
    sequence: AtomicU64,
}

#[async_trait]
impl StationRepository for InMemoryStationRepository {
    async fn insert(&self, station: ChargingStation) -> DomainResult<ChargingStation> {
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst);
        self.stations
            .insert(station.id.clone(), (seq, station.clone()));
        Ok(station)
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<ChargingStation>> {
        Ok(self.stations.get(id).map(|entry| entry.1.clone()))
    }

    async fn find_by_owner(&self, owner_id: &str) -> DomainResult<Vec<ChargingStation>> {
        let mut owned: Vec<(u64, ChargingStation)> = self
            .stations
            .iter()
            .filter(|entry| entry.1.owner_id == owner_id)
            .map(|entry| entry.value().clone())
            .collect();

        owned.sort_by(|(a_seq, a), (b_seq, b)| {
            b.created_at.cmp(&a.created_at).then(b_seq.cmp(a_seq))
        });
        Ok(owned.into_iter().map(|(_, station)| station).collect())
    }

    async fn update_owned(
        &self,
        id: &str,
        owner_id: &str,
        changes: StationChanges,
    ) -> DomainResult<Option<ChargingStation>> {
        // The shard lock is held for the check and the write.
        let Some(mut entry) = self.stations.get_mut(id) else {
            return Ok(None);
        };
        let station = &mut entry.1;
        if station.owner_id != owner_id {
            return Ok(None);
        }

        if let Some(name) = changes.name {
            station.name = name;
        }
        if let Some(location) = changes.location {
            station.location = location;
        }
        if let Some(label) = changes.address_display_name {
            station.address_display_name = label;
        }
        if let Some(status) = changes.status {
            station.status = status;
        }
        if let Some(power_output) = changes.power_output {
            station.power_output = power_output;
        }
        if let Some(connector_type) = changes.connector_type {
            station.connector_type = connector_type;
        }
        station.updated_at = changes.updated_at;

        Ok(Some(station.clone()))
    }

    async fn delete_owned(&self, id: &str, owner_id: &str) -> DomainResult<bool> {
        Ok(self
            .stations
            .remove_if(id, |_, (_, station)| station.owner_id == owner_id)
            .is_some())
    }
}

/// `RepositoryProvider` over process memory; contents are lost on exit.
#[derive(Default)]
pub struct InMemoryRepositoryProvider {
    users: InMemoryUserRepository,
    stations: InMemoryStationRepository,
}

impl InMemoryRepositoryProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RepositoryProvider for InMemoryRepositoryProvider {
    fn users(&self) -> &dyn UserRepository {
        &self.users
    }

    fn stations(&self) -> &dyn StationRepository {
        &self.stations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::geo;
    use crate::domain::{ConnectorType, StationStatus};

    fn station(id: &str, owner_id: &str) -> ChargingStation {
        let now = Utc::now();
        ChargingStation {
            id: id.to_string(),
            owner_id: owner_id.to_string(),
            name: "Lot A".to_string(),
            location: geo::encode(40.0, -75.0).unwrap(),
            address_display_name: None,
            status: StationStatus::Active,
            power_output: 50.0,
            connector_type: ConnectorType::Ccs,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn username_is_unique() {
        let repo = InMemoryUserRepository::default();
        let dto = CreateUserDto {
            username: "alice".into(),
            password_hash: "h".into(),
        };
        let alice = repo.create_user(dto.clone()).await.unwrap();

        assert!(matches!(
            repo.create_user(dto).await,
            Err(DomainError::DuplicateUser(_))
        ));
        let found = repo.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(found.id, alice.id);
        assert!(repo.find_by_username("ALICE").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn conditional_writes_respect_owner() {
        let repo = InMemoryStationRepository::default();
        repo.insert(station("s1", "alice")).await.unwrap();

        let mut changes = StationChanges::new(Utc::now());
        changes.name = Some("Lot B".into());

        assert!(repo
            .update_owned("s1", "bob", changes.clone())
            .await
            .unwrap()
            .is_none());
        assert!(!repo.delete_owned("s1", "bob").await.unwrap());

        let updated = repo.update_owned("s1", "alice", changes).await.unwrap().unwrap();
        assert_eq!(updated.name, "Lot B");
        assert!(repo.delete_owned("s1", "alice").await.unwrap());
        assert!(repo.find_by_id("s1").await.unwrap().is_none());
    }
}
