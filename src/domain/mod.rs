pub mod geo;
pub mod patch;
pub mod repositories;
pub mod station;
pub mod user;

pub use geo::{Coordinates, GeoError, GeoPoint};
pub use patch::Patch;
pub use repositories::RepositoryProvider;
pub use station::{
    ChargingStation, ConnectorType, CreateStationDto, StationChanges, StationDraft,
    StationDetails, StationRepository, StationStatus, UpdateStationDto,
};
pub use user::{CreateUserDto, User, UserRepository, UserSummary};

pub use crate::shared::errors::{DomainError, DomainResult};
