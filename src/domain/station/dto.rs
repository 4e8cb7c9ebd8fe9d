use chrono::{DateTime, Utc};
use serde_json::Value;
use validator::Validate;

use super::{ConnectorType, StationStatus};
use crate::domain::geo::GeoPoint;
use crate::domain::Patch;

/// Station fields exactly as a client submitted them.
///
/// Values stay untyped JSON until the service has checked ownership, so a
/// mistyped field is reported as a validation problem instead of failing
/// the request outright.
#[derive(Debug, Clone, Default)]
pub struct CreateStationDto {
    pub name: Option<Value>,
    pub location: Option<Value>,
    pub status: Option<Value>,
    pub power_output: Option<Value>,
    pub connector_type: Option<Value>,
    pub address_display_name: Option<Value>,
}

/// Partial update, untyped like [`CreateStationDto`]. Only
/// `address_display_name` may be `Null`.
#[derive(Debug, Clone, Default)]
pub struct UpdateStationDto {
    pub name: Patch<Value>,
    pub location: Patch<Value>,
    pub status: Patch<Value>,
    pub power_output: Patch<Value>,
    pub connector_type: Patch<Value>,
    pub address_display_name: Patch<Value>,
}

/// Create fields after type narrowing. `None` means the field was missing
/// or mistyped and has already been reported; the rules below only check
/// values that are present.
#[derive(Debug, Default, Validate)]
pub struct StationDraft {
    #[validate(length(min = 1, message = "Charger name is required."))]
    pub name: Option<String>,
    pub location: Option<GeoPoint>,
    pub status: Option<StationStatus>,
    #[validate(range(min = 0.0, message = "Power output cannot be negative."))]
    pub power_output: Option<f64>,
    pub connector_type: Option<ConnectorType>,
    pub address_display_name: Option<String>,
}

/// Validated set of field changes handed to the repository.
///
/// `None` leaves the stored value untouched; for the address label
/// `Some(None)` clears it.
#[derive(Debug, Clone, PartialEq)]
pub struct StationChanges {
    pub name: Option<String>,
    pub location: Option<GeoPoint>,
    pub address_display_name: Option<Option<String>>,
    pub status: Option<StationStatus>,
    pub power_output: Option<f64>,
    pub connector_type: Option<ConnectorType>,
    pub updated_at: DateTime<Utc>,
}

impl StationChanges {
    pub fn new(updated_at: DateTime<Utc>) -> Self {
        Self {
            name: None,
            location: None,
            address_display_name: None,
            status: None,
            power_output: None,
            connector_type: None,
            updated_at,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.location.is_none()
            && self.address_display_name.is_none()
            && self.status.is_none()
            && self.power_output.is_none()
            && self.connector_type.is_none()
    }
}
