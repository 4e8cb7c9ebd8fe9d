//! Charging station business logic service

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

use crate::domain::geo;
use crate::domain::{
    ChargingStation, ConnectorType, CreateStationDto, DomainError, DomainResult, Patch,
    RepositoryProvider, StationChanges, StationDetails, StationDraft, StationStatus,
    UpdateStationDto, UserSummary,
};
use crate::shared::validations::collect_messages;

const INCOMPLETE_LOCATION: &str = "Invalid location data provided. If updating location, both latitude and longitude must be numbers.";
const OWNER_REQUIRED: &str = "A user must be associated with the charging station.";

const NAME_REQUIRED: &str = "Charger name is required.";
const NAME_MISTYPED: &str = "Charger name must be a string.";
const LOCATION_REQUIRED: &str = "Location with latitude and longitude is required.";
const LATITUDE_REQUIRED: &str = "Latitude is required and must be a number.";
const LONGITUDE_REQUIRED: &str = "Longitude is required and must be a number.";
const STATUS_REQUIRED: &str = "Status is required.";
const STATUS_MISTYPED: &str = "Status must be a string.";
const POWER_REQUIRED: &str = "Power output is required.";
const POWER_MISTYPED: &str = "Power output must be a number.";
const POWER_NOT_FINITE: &str = "Power output must be a finite number.";
const POWER_NEGATIVE: &str = "Power output cannot be negative.";
const CONNECTOR_REQUIRED: &str = "Connector type is required.";
const CONNECTOR_MISTYPED: &str = "Connector type must be a string.";
const ADDRESS_MISTYPED: &str = "Address display name must be a string.";

/// Ownership-scoped CRUD over charging stations
pub struct StationService {
    repos: Arc<dyn RepositoryProvider>,
}

impl StationService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// Create a station owned by `owner_id`.
    pub async fn create(
        &self,
        owner_id: &str,
        dto: CreateStationDto,
    ) -> DomainResult<StationDetails> {
        let mut errors = Vec::new();

        let name = required(dto.name, NAME_REQUIRED, NAME_MISTYPED, text, &mut errors);
        let location = match dto.location {
            None | Some(Value::Null) => {
                errors.push(LOCATION_REQUIRED.to_string());
                None
            }
            Some(location) => {
                let latitude = coordinate(&location, "latitude");
                let longitude = coordinate(&location, "longitude");
                if latitude.is_none() {
                    errors.push(LATITUDE_REQUIRED.to_string());
                }
                if longitude.is_none() {
                    errors.push(LONGITUDE_REQUIRED.to_string());
                }
                match (latitude, longitude) {
                    (Some(latitude), Some(longitude)) => geo::encode(latitude, longitude)
                        .map_err(|e| errors.push(e.to_string()))
                        .ok(),
                    _ => None,
                }
            }
        };
        let status = required(dto.status, STATUS_REQUIRED, STATUS_MISTYPED, text, &mut errors)
            .and_then(|s| parse_status(&s).map_err(|e| errors.push(e)).ok());
        let power_output =
            required(dto.power_output, POWER_REQUIRED, POWER_MISTYPED, number, &mut errors)
                .filter(|power| {
                    let finite = power.is_finite();
                    if !finite {
                        errors.push(POWER_NOT_FINITE.to_string());
                    }
                    finite
                });
        let connector_type = required(
            dto.connector_type,
            CONNECTOR_REQUIRED,
            CONNECTOR_MISTYPED,
            text,
            &mut errors,
        )
        .and_then(|c| parse_connector(&c).map_err(|e| errors.push(e)).ok());
        let address_display_name = match dto.address_display_name {
            None | Some(Value::Null) => None,
            Some(label) => text(label).or_else(|| {
                errors.push(ADDRESS_MISTYPED.to_string());
                None
            }),
        };

        let draft = StationDraft {
            name,
            location,
            status,
            power_output,
            connector_type,
            address_display_name,
        };
        if let Err(e) = draft.validate() {
            errors.extend(collect_messages(&e));
        }

        let (
            StationDraft {
                name: Some(name),
                location: Some(location),
                status: Some(status),
                power_output: Some(power_output),
                connector_type: Some(connector_type),
                address_display_name,
            },
            true,
        ) = (draft, errors.is_empty())
        else {
            errors.sort();
            return Err(DomainError::validation(errors));
        };

        let owner = self
            .repos
            .users()
            .find_by_id(owner_id)
            .await?
            .ok_or_else(|| DomainError::invalid(OWNER_REQUIRED))?;

        let now = Utc::now();
        let station = ChargingStation {
            id: Uuid::new_v4().to_string(),
            owner_id: owner.id.clone(),
            name,
            location,
            address_display_name,
            status,
            power_output,
            connector_type,
            created_at: now,
            updated_at: now,
        };

        let station = self.repos.stations().insert(station).await?;
        metrics::counter!("stations_created_total").increment(1);
        info!(station_id = %station.id, owner_id = %owner.id, "Charging station created");

        Ok(StationDetails::new(station, owner.into()))
    }

    /// All stations of `owner_id`, newest first.
    pub async fn list_by_owner(&self, owner_id: &str) -> DomainResult<Vec<StationDetails>> {
        let owner = self.owner_summary(owner_id).await?;
        let stations = self.repos.stations().find_by_owner(owner_id).await?;

        debug!(owner_id = %owner_id, count = stations.len(), "Listed charging stations");
        Ok(stations
            .into_iter()
            .map(|station| StationDetails::new(station, owner.clone()))
            .collect())
    }

    /// Apply a partial update to a station owned by `owner_id`.
    pub async fn update(
        &self,
        station_id: &str,
        owner_id: &str,
        dto: UpdateStationDto,
    ) -> DomainResult<StationDetails> {
        let existing = self.find_owned(station_id, owner_id, "update").await?;

        let mut changes = diff(&existing, dto)?;
        if changes.is_empty() {
            return Err(DomainError::NoChange);
        }
        changes.updated_at = changes.updated_at.max(existing.updated_at);

        let Some(station) = self
            .repos
            .stations()
            .update_owned(station_id, owner_id, changes)
            .await?
        else {
            // Deleted or changed hands since the read above.
            return Err(self.explain_miss(station_id, "update").await);
        };

        info!(station_id = %station.id, owner_id = %owner_id, "Charging station updated");
        let owner = self.owner_summary(owner_id).await?;
        Ok(StationDetails::new(station, owner))
    }

    /// Remove a station owned by `owner_id`.
    pub async fn delete(&self, station_id: &str, owner_id: &str) -> DomainResult<()> {
        self.find_owned(station_id, owner_id, "delete").await?;

        if !self
            .repos
            .stations()
            .delete_owned(station_id, owner_id)
            .await?
        {
            return Err(self.explain_miss(station_id, "delete").await);
        }

        metrics::counter!("stations_deleted_total").increment(1);
        info!(station_id = %station_id, owner_id = %owner_id, "Charging station deleted");
        Ok(())
    }

    async fn find_owned(
        &self,
        station_id: &str,
        owner_id: &str,
        action: &'static str,
    ) -> DomainResult<ChargingStation> {
        let station = self
            .repos
            .stations()
            .find_by_id(station_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(station_id.to_string()))?;

        if station.owner_id != owner_id {
            return Err(DomainError::Forbidden { action });
        }
        Ok(station)
    }

    /// Classify a conditional write that matched nothing.
    async fn explain_miss(&self, station_id: &str, action: &'static str) -> DomainError {
        match self.repos.stations().find_by_id(station_id).await {
            Ok(Some(_)) => DomainError::Forbidden { action },
            Ok(None) => DomainError::NotFound(station_id.to_string()),
            Err(e) => e,
        }
    }

    async fn owner_summary(&self, owner_id: &str) -> DomainResult<UserSummary> {
        self.repos
            .users()
            .find_by_id(owner_id)
            .await?
            .map(UserSummary::from)
            .ok_or_else(|| DomainError::UserNotFound(owner_id.to_string()))
    }
}

fn parse_status(s: &str) -> Result<StationStatus, String> {
    StationStatus::parse(s).ok_or_else(|| format!("`{}` is not a valid status.", s))
}

fn parse_connector(s: &str) -> Result<ConnectorType, String> {
    ConnectorType::parse(s).ok_or_else(|| format!("`{}` is not a valid connector type.", s.trim()))
}

/// Turn a partial update into the set of fields that actually change.
fn diff(existing: &ChargingStation, dto: UpdateStationDto) -> DomainResult<StationChanges> {
    let mut changes = StationChanges::new(Utc::now());
    let mut errors = Vec::new();

    // A location must be complete and numeric; it is never merged with the
    // stored one.
    match dto.location {
        Patch::Absent => {}
        Patch::Null => return Err(DomainError::invalid(INCOMPLETE_LOCATION)),
        Patch::Value(location) => {
            let (Some(latitude), Some(longitude)) = (
                coordinate(&location, "latitude"),
                coordinate(&location, "longitude"),
            ) else {
                return Err(DomainError::invalid(INCOMPLETE_LOCATION));
            };
            match geo::encode(latitude, longitude) {
                Ok(point) => changes.location = changed(point, &existing.location),
                Err(e) => errors.push(e.to_string()),
            }
        }
    }

    if let Some(name) = supplied(dto.name, NAME_REQUIRED, NAME_MISTYPED, text, &mut errors) {
        if name.is_empty() {
            errors.push(NAME_REQUIRED.to_string());
        } else {
            changes.name = changed(name, &existing.name);
        }
    }

    if let Some(s) = supplied(dto.status, STATUS_REQUIRED, STATUS_MISTYPED, text, &mut errors) {
        match parse_status(&s) {
            Ok(status) => changes.status = changed(status, &existing.status),
            Err(e) => errors.push(e),
        }
    }

    if let Some(power) = supplied(
        dto.power_output,
        POWER_REQUIRED,
        POWER_MISTYPED,
        number,
        &mut errors,
    ) {
        if !power.is_finite() {
            errors.push(POWER_NOT_FINITE.to_string());
        } else if power < 0.0 {
            errors.push(POWER_NEGATIVE.to_string());
        } else {
            changes.power_output = changed(power, &existing.power_output);
        }
    }

    if let Some(c) = supplied(
        dto.connector_type,
        CONNECTOR_REQUIRED,
        CONNECTOR_MISTYPED,
        text,
        &mut errors,
    ) {
        match parse_connector(&c) {
            Ok(connector) => changes.connector_type = changed(connector, &existing.connector_type),
            Err(e) => errors.push(e),
        }
    }

    let address = match dto.address_display_name {
        Patch::Absent => None,
        Patch::Null => Some(None),
        Patch::Value(label) => match text(label) {
            Some(label) => Some(Some(label)),
            None => {
                errors.push(ADDRESS_MISTYPED.to_string());
                None
            }
        },
    };
    changes.address_display_name =
        address.and_then(|label| changed(label, &existing.address_display_name));

    if errors.is_empty() {
        Ok(changes)
    } else {
        errors.sort();
        Err(DomainError::validation(errors))
    }
}

/// Trimmed string value.
fn text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        _ => None,
    }
}

fn number(value: Value) -> Option<f64> {
    value.as_f64()
}

/// Numeric `key` of a `{latitude, longitude}` object.
fn coordinate(location: &Value, key: &str) -> Option<f64> {
    location.get(key).and_then(Value::as_f64)
}

/// Narrow a required create field, reporting it when missing or mistyped.
fn required<T>(
    value: Option<Value>,
    missing: &str,
    mistyped: &str,
    narrow: fn(Value) -> Option<T>,
    errors: &mut Vec<String>,
) -> Option<T> {
    match value {
        None | Some(Value::Null) => {
            errors.push(missing.to_string());
            None
        }
        Some(value) => narrow(value).or_else(|| {
            errors.push(mistyped.to_string());
            None
        }),
    }
}

/// Narrow a non-nullable update field. `None` when absent or already reported.
fn supplied<T>(
    value: Patch<Value>,
    missing: &str,
    mistyped: &str,
    narrow: fn(Value) -> Option<T>,
    errors: &mut Vec<String>,
) -> Option<T> {
    match value {
        Patch::Absent => None,
        Patch::Null => required(None, missing, mistyped, narrow, errors),
        Patch::Value(value) => required(Some(value), missing, mistyped, narrow, errors),
    }
}

fn changed<T: PartialEq>(new: T, current: &T) -> Option<T> {
    (new != *current).then_some(new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CreateUserDto, User};
    use crate::infrastructure::storage::InMemoryRepositoryProvider;
    use serde_json::json;

    async fn setup() -> (StationService, Arc<dyn RepositoryProvider>, User, User) {
        let repos: Arc<dyn RepositoryProvider> = Arc::new(InMemoryRepositoryProvider::new());
        let alice = create_user(&repos, "alice").await;
        let bob = create_user(&repos, "bob").await;
        (StationService::new(repos.clone()), repos, alice, bob)
    }

    async fn create_user(repos: &Arc<dyn RepositoryProvider>, username: &str) -> User {
        repos
            .users()
            .create_user(CreateUserDto {
                username: username.to_string(),
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap()
    }

    fn lot_a() -> CreateStationDto {
        CreateStationDto {
            name: Some(json!("  Lot A ")),
            location: Some(json!({"latitude": 40.0, "longitude": -75.0})),
            status: Some(json!("Active")),
            power_output: Some(json!(50)),
            connector_type: Some(json!("CCS")),
            address_display_name: None,
        }
    }

    fn validation_errors(err: DomainError) -> Vec<String> {
        match err {
            DomainError::InvalidInput { errors, .. } => errors,
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn create_encodes_location_and_resolves_owner() {
        let (service, repos, alice, _) = setup().await;
        let details = service.create(&alice.id, lot_a()).await.unwrap();

        assert_eq!(details.name, "Lot A");
        assert_eq!(details.location.latitude, 40.0);
        assert_eq!(details.location.longitude, -75.0);
        assert_eq!(details.power_output, 50.0);
        assert_eq!(details.address_display_name, None);
        assert_eq!(details.owner, alice.summary());
        assert_eq!(details.created_at, details.updated_at);

        let stored = repos.stations().find_by_id(&details.id).await.unwrap().unwrap();
        assert_eq!(stored.location.coordinates(), [-75.0, 40.0]);
        assert_eq!(stored.owner_id, alice.id);
    }

    #[tokio::test]
    async fn create_collects_every_field_problem() {
        let (service, _, alice, _) = setup().await;
        let dto = CreateStationDto {
            name: Some(json!("   ")),
            location: Some(json!({"latitude": 95.0, "longitude": 0.0})),
            status: Some(json!("Broken")),
            power_output: Some(json!(-1.0)),
            connector_type: Some(json!("Type 1")),
            address_display_name: None,
        };

        let errors = validation_errors(service.create(&alice.id, dto).await.unwrap_err());
        assert_eq!(errors.len(), 5, "{errors:?}");
        assert!(errors.contains(&NAME_REQUIRED.to_string()));
        assert!(errors.contains(&POWER_NEGATIVE.to_string()));
        assert!(errors.contains(&"`Broken` is not a valid status.".to_string()));
        assert!(errors.contains(&"`Type 1` is not a valid connector type.".to_string()));
        assert!(errors.iter().any(|e| e.contains("latitude")));
    }

    #[tokio::test]
    async fn create_reports_mistyped_values() {
        let (service, _, alice, _) = setup().await;
        let dto = CreateStationDto {
            name: Some(json!(7)),
            location: Some(json!({"latitude": "40", "longitude": -75.0})),
            power_output: Some(json!("fifty")),
            address_display_name: Some(json!(["Main St"])),
            ..lot_a()
        };

        let errors = validation_errors(service.create(&alice.id, dto).await.unwrap_err());
        assert_eq!(
            errors,
            vec![
                ADDRESS_MISTYPED.to_string(),
                NAME_MISTYPED.to_string(),
                LATITUDE_REQUIRED.to_string(),
                POWER_MISTYPED.to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn create_requires_both_coordinates() {
        let (service, _, alice, _) = setup().await;
        let dto = CreateStationDto {
            location: Some(json!({"latitude": 40.0})),
            ..lot_a()
        };

        let errors = validation_errors(service.create(&alice.id, dto).await.unwrap_err());
        assert_eq!(errors, vec![LONGITUDE_REQUIRED.to_string()]);
    }

    #[tokio::test]
    async fn create_rejects_missing_fields() {
        let (service, _, alice, _) = setup().await;
        let errors = validation_errors(
            service
                .create(&alice.id, CreateStationDto::default())
                .await
                .unwrap_err(),
        );
        assert_eq!(errors.len(), 5);

        let nulls = CreateStationDto {
            name: Some(Value::Null),
            status: Some(Value::Null),
            ..lot_a()
        };
        let errors = validation_errors(service.create(&alice.id, nulls).await.unwrap_err());
        assert_eq!(errors, vec![NAME_REQUIRED.to_string(), STATUS_REQUIRED.to_string()]);
    }

    #[tokio::test]
    async fn create_for_unknown_owner_is_invalid() {
        let (service, _, _, _) = setup().await;
        let err = service.create("ghost", lot_a()).await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::InvalidInput { ref message, .. } if message == OWNER_REQUIRED
        ));
    }

    #[tokio::test]
    async fn list_is_scoped_to_owner_and_newest_first() {
        let (service, _, alice, bob) = setup().await;
        let first = service.create(&alice.id, lot_a()).await.unwrap();
        let second = service
            .create(
                &alice.id,
                CreateStationDto {
                    name: Some(json!("Lot B")),
                    ..lot_a()
                },
            )
            .await
            .unwrap();
        service.create(&bob.id, lot_a()).await.unwrap();

        let listed = service.list_by_owner(&alice.id).await.unwrap();
        let ids: Vec<_> = listed.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec![second.id.as_str(), first.id.as_str()]);
        assert!(listed.iter().all(|s| s.owner.username == "alice"));
    }

    #[tokio::test]
    async fn list_for_owner_without_stations_is_empty() {
        let (service, _, _, bob) = setup().await;
        assert!(service.list_by_owner(&bob.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn foreign_owner_is_forbidden_regardless_of_payload() {
        let (service, _, alice, bob) = setup().await;
        let station = service.create(&alice.id, lot_a()).await.unwrap();

        let invalid = UpdateStationDto {
            status: Patch::Value(json!("Broken")),
            power_output: Patch::Value(json!("fifty")),
            location: Patch::Value(json!("here")),
            ..Default::default()
        };
        assert!(matches!(
            service.update(&station.id, &bob.id, invalid).await,
            Err(DomainError::Forbidden { action: "update" })
        ));
        assert!(matches!(
            service.delete(&station.id, &bob.id).await,
            Err(DomainError::Forbidden { action: "delete" })
        ));
        assert_eq!(service.list_by_owner(&alice.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn empty_update_is_no_change() {
        let (service, _, alice, _) = setup().await;
        let station = service.create(&alice.id, lot_a()).await.unwrap();

        assert!(matches!(
            service
                .update(&station.id, &alice.id, UpdateStationDto::default())
                .await,
            Err(DomainError::NoChange)
        ));

        let same = UpdateStationDto {
            name: Patch::Value(json!("Lot A")),
            status: Patch::Value(json!("Active")),
            ..Default::default()
        };
        assert!(matches!(
            service.update(&station.id, &alice.id, same).await,
            Err(DomainError::NoChange)
        ));
    }

    #[tokio::test]
    async fn incomplete_or_non_numeric_location_is_rejected() {
        let (service, _, alice, _) = setup().await;
        let station = service.create(&alice.id, lot_a()).await.unwrap();

        for location in [
            Patch::Value(json!({"latitude": 41.0})),
            Patch::Value(json!({"latitude": "41", "longitude": -75.0})),
            Patch::Value(json!([41.0, -75.0])),
            Patch::Null,
        ] {
            let dto = UpdateStationDto {
                location,
                ..Default::default()
            };
            let err = service.update(&station.id, &alice.id, dto).await.unwrap_err();
            assert!(matches!(
                err,
                DomainError::InvalidInput { ref message, .. } if message == INCOMPLETE_LOCATION
            ));
        }
    }

    #[tokio::test]
    async fn update_applies_only_supplied_fields() {
        let (service, _, alice, _) = setup().await;
        let station = service.create(&alice.id, lot_a()).await.unwrap();

        let dto = UpdateStationDto {
            location: Patch::Value(json!({"latitude": 41.5, "longitude": -74.25})),
            status: Patch::Value(json!("Inactive")),
            address_display_name: Patch::Value(json!(" Depot ")),
            ..Default::default()
        };
        let updated = service.update(&station.id, &alice.id, dto).await.unwrap();

        assert_eq!(updated.name, "Lot A");
        assert_eq!(updated.status, StationStatus::Inactive);
        assert_eq!(updated.location.latitude, 41.5);
        assert_eq!(updated.location.longitude, -74.25);
        assert_eq!(updated.address_display_name.as_deref(), Some("Depot"));
        assert_eq!(updated.power_output, 50.0);
        assert_eq!(updated.created_at, station.created_at);
        assert!(updated.updated_at >= station.updated_at);
    }

    #[tokio::test]
    async fn null_address_clears_the_label() {
        let (service, _, alice, _) = setup().await;
        let station = service
            .create(
                &alice.id,
                CreateStationDto {
                    address_display_name: Some(json!("Main St")),
                    ..lot_a()
                },
            )
            .await
            .unwrap();
        assert_eq!(station.address_display_name.as_deref(), Some("Main St"));

        let dto = UpdateStationDto {
            address_display_name: Patch::Null,
            ..Default::default()
        };
        let updated = service.update(&station.id, &alice.id, dto).await.unwrap();
        assert_eq!(updated.address_display_name, None);
    }

    #[tokio::test]
    async fn null_for_required_field_is_invalid() {
        let (service, _, alice, _) = setup().await;
        let station = service.create(&alice.id, lot_a()).await.unwrap();

        let dto = UpdateStationDto {
            name: Patch::Null,
            power_output: Patch::Null,
            ..Default::default()
        };
        let errors = validation_errors(service.update(&station.id, &alice.id, dto).await.unwrap_err());
        assert_eq!(errors, vec![NAME_REQUIRED.to_string(), POWER_REQUIRED.to_string()]);
    }

    #[tokio::test]
    async fn mistyped_update_fields_are_validation_errors() {
        let (service, _, alice, _) = setup().await;
        let station = service.create(&alice.id, lot_a()).await.unwrap();

        let dto = UpdateStationDto {
            power_output: Patch::Value(json!("fifty")),
            connector_type: Patch::Value(json!(2)),
            address_display_name: Patch::Value(json!(false)),
            ..Default::default()
        };
        let errors = validation_errors(service.update(&station.id, &alice.id, dto).await.unwrap_err());
        assert_eq!(
            errors,
            vec![
                ADDRESS_MISTYPED.to_string(),
                CONNECTOR_MISTYPED.to_string(),
                POWER_MISTYPED.to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn update_unknown_station_is_not_found() {
        let (service, _, alice, _) = setup().await;
        let dto = UpdateStationDto {
            name: Patch::Value(json!(42)),
            ..Default::default()
        };
        assert!(matches!(
            service.update("missing", &alice.id, dto).await,
            Err(DomainError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn delete_twice_is_not_found() {
        let (service, _, alice, _) = setup().await;
        let station = service.create(&alice.id, lot_a()).await.unwrap();

        service.delete(&station.id, &alice.id).await.unwrap();
        assert!(service.list_by_owner(&alice.id).await.unwrap().is_empty());
        assert!(matches!(
            service.delete(&station.id, &alice.id).await,
            Err(DomainError::NotFound(_))
        ));
    }
}
