//! Charging station aggregate
//!
//! Contains the ChargingStation entity, its enumerations, DTOs, and
//! repository interface.

pub mod dto;
pub mod model;
pub mod repository;

pub use dto::{CreateStationDto, StationChanges, StationDraft, UpdateStationDto};
pub use model::{ChargingStation, ConnectorType, StationDetails, StationStatus};
pub use repository::StationRepository;
