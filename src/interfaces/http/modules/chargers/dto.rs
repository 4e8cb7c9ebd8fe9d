//! Charging station DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::{Coordinates, CreateStationDto, Patch, StationDetails, UpdateStationDto};
use crate::interfaces::http::modules::auth::UserInfo;

/// Documents the `location` object; requests read it as raw JSON.
#[derive(Debug, Clone, ToSchema)]
pub struct LocationRequest {
    #[schema(example = 40.0)]
    pub latitude: f64,
    #[schema(example = -75.0)]
    pub longitude: f64,
}

/// Field types are checked by the service so that problems come back as a
/// validation error list.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateStationRequest {
    #[schema(value_type = String, example = "Lot A")]
    pub name: Option<Value>,
    #[schema(value_type = LocationRequest)]
    pub location: Option<Value>,
    #[schema(value_type = String, example = "Active")]
    pub status: Option<Value>,
    /// kW
    #[schema(value_type = f64, example = 50.0)]
    pub power_output: Option<Value>,
    #[schema(value_type = String, example = "CCS")]
    pub connector_type: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub address_display_name: Option<Value>,
}

impl CreateStationRequest {
    /// Fields are read from a JSON object; any other body supplies none.
    pub fn from_body(body: Value) -> Self {
        from_object(body)
    }
}

impl From<CreateStationRequest> for CreateStationDto {
    fn from(request: CreateStationRequest) -> Self {
        Self {
            name: request.name,
            location: request.location,
            status: request.status,
            power_output: request.power_output,
            connector_type: request.connector_type,
            address_display_name: request.address_display_name,
        }
    }
}

/// Any subset of the create fields. `addressDisplayName: null` clears the label.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateStationRequest {
    #[schema(value_type = Option<String>)]
    pub name: Patch<Value>,
    #[schema(value_type = Option<LocationRequest>)]
    pub location: Patch<Value>,
    #[schema(value_type = Option<String>)]
    pub status: Patch<Value>,
    #[schema(value_type = Option<f64>)]
    pub power_output: Patch<Value>,
    #[schema(value_type = Option<String>)]
    pub connector_type: Patch<Value>,
    #[schema(value_type = Option<String>)]
    pub address_display_name: Patch<Value>,
}

impl UpdateStationRequest {
    /// Fields are read from a JSON object; any other body supplies none.
    pub fn from_body(body: Value) -> Self {
        from_object(body)
    }
}

impl From<UpdateStationRequest> for UpdateStationDto {
    fn from(request: UpdateStationRequest) -> Self {
        Self {
            name: request.name,
            location: request.location,
            status: request.status,
            power_output: request.power_output,
            connector_type: request.connector_type,
            address_display_name: request.address_display_name,
        }
    }
}

// Every field accepts any JSON value, so an object always deserializes.
fn from_object<T: Default + serde::de::DeserializeOwned>(body: Value) -> T {
    match body {
        Value::Object(_) => serde_json::from_value(body).unwrap_or_default(),
        _ => T::default(),
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StationResponse {
    pub id: String,
    pub name: String,
    pub location: Coordinates,
    pub address_display_name: Option<String>,
    #[schema(example = "Active")]
    pub status: String,
    pub power_output: f64,
    #[schema(example = "CCS")]
    pub connector_type: String,
    pub user: UserInfo,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<StationDetails> for StationResponse {
    fn from(station: StationDetails) -> Self {
        Self {
            id: station.id,
            name: station.name,
            location: station.location,
            address_display_name: station.address_display_name,
            status: station.status.to_string(),
            power_output: station.power_output,
            connector_type: station.connector_type.to_string(),
            user: UserInfo {
                id: station.owner.id,
                username: station.owner.username,
            },
            created_at: station.created_at,
            updated_at: station.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}
