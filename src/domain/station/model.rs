//! Charging station domain entity

use chrono::{DateTime, Utc};

use crate::domain::geo::{self, Coordinates, GeoPoint};
use crate::domain::user::UserSummary;

/// Operational status of a station
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StationStatus {
    Active,
    Inactive,
}

impl StationStatus {
    pub const ALL: [StationStatus; 2] = [Self::Active, Self::Inactive];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
        }
    }

    /// Exact match against the wire literal.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == s)
    }
}

impl std::fmt::Display for StationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Plug standard offered by a station
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectorType {
    Type2,
    Ccs,
    Chademo,
    AcType1,
    AcType3,
}

impl ConnectorType {
    pub const ALL: [ConnectorType; 5] = [
        Self::Type2,
        Self::Ccs,
        Self::Chademo,
        Self::AcType1,
        Self::AcType3,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Type2 => "Type 2",
            Self::Ccs => "CCS",
            Self::Chademo => "CHAdeMO",
            Self::AcType1 => "AC (Type 1)",
            Self::AcType3 => "AC (Type 3)",
        }
    }

    /// Match against the wire literal, ignoring surrounding whitespace.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL.into_iter().find(|connector| connector.as_str() == s)
    }
}

impl std::fmt::Display for ConnectorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Charging station as persisted
#[derive(Debug, Clone, PartialEq)]
pub struct ChargingStation {
    pub id: String,
    /// Owning user, fixed at creation
    pub owner_id: String,
    pub name: String,
    pub location: GeoPoint,
    pub address_display_name: Option<String>,
    pub status: StationStatus,
    /// Power output in kW
    pub power_output: f64,
    pub connector_type: ConnectorType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Client-facing view of a station: position decoded, owner resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct StationDetails {
    pub id: String,
    pub name: String,
    pub location: Coordinates,
    pub address_display_name: Option<String>,
    pub status: StationStatus,
    pub power_output: f64,
    pub connector_type: ConnectorType,
    pub owner: UserSummary,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StationDetails {
    pub fn new(station: ChargingStation, owner: UserSummary) -> Self {
        Self {
            location: geo::decode(&station.location),
            id: station.id,
            name: station.name,
            address_display_name: station.address_display_name,
            status: station.status,
            power_output: station.power_output,
            connector_type: station.connector_type,
            owner,
            created_at: station.created_at,
            updated_at: station.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_literals_are_exact() {
        assert_eq!(StationStatus::parse("Active"), Some(StationStatus::Active));
        assert_eq!(StationStatus::parse("Inactive"), Some(StationStatus::Inactive));
        assert_eq!(StationStatus::parse("active"), None);
        assert_eq!(StationStatus::parse("Broken"), None);
    }

    #[test]
    fn connector_literals_round_trip() {
        for connector in ConnectorType::ALL {
            assert_eq!(ConnectorType::parse(connector.as_str()), Some(connector));
        }
        assert_eq!(ConnectorType::parse("  CCS "), Some(ConnectorType::Ccs));
        assert_eq!(ConnectorType::parse("Type 1"), None);
    }
}
