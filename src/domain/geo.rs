//! Coordinate codec
//!
//! Converts between the client-facing `{latitude, longitude}` pair and the
//! stored geospatial point. Points follow the GeoJSON convention: the pair
//! is ordered longitude first and tagged with the geometry kind `"Point"`.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Geometry kind marker carried by every stored point.
pub const POINT_KIND: &str = "Point";

pub const LATITUDE_RANGE: (f64, f64) = (-90.0, 90.0);
pub const LONGITUDE_RANGE: (f64, f64) = (-180.0, 180.0);

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoError {
    #[error("{value} is not a valid {axis}. Latitude must be -90 to 90, longitude -180 to 180.")]
    InvalidCoordinate { axis: &'static str, value: f64 },

    #[error("expected geometry kind 'Point', found '{0}'")]
    UnexpectedGeometry(String),

    #[error("a point needs exactly 2 coordinates, found {0}")]
    MalformedCoordinates(usize),
}

/// Human-facing position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Stored geospatial point: `(longitude, latitude)`, always of kind `Point`.
///
/// Only obtainable through [`encode`] or [`GeoPoint::from_geojson`], so a
/// value of this type is always a valid point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    coordinates: [f64; 2],
}

impl GeoPoint {
    /// Geometry kind marker of this point.
    pub fn kind(&self) -> &'static str {
        POINT_KIND
    }

    /// Ordered `[longitude, latitude]` pair.
    pub fn coordinates(&self) -> [f64; 2] {
        self.coordinates
    }

    /// Rebuild a point read back from storage.
    ///
    /// Anything other than a `Point` with a valid pair is an invariant
    /// violation of the stored document.
    pub fn from_geojson(kind: &str, coordinates: &[f64]) -> Result<Self, GeoError> {
        if kind != POINT_KIND {
            return Err(GeoError::UnexpectedGeometry(kind.to_string()));
        }
        let [longitude, latitude] = coordinates else {
            return Err(GeoError::MalformedCoordinates(coordinates.len()));
        };
        encode(*latitude, *longitude)
    }
}

fn check(axis: &'static str, value: f64, (min, max): (f64, f64)) -> Result<f64, GeoError> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(GeoError::InvalidCoordinate { axis, value })
    }
}

/// Encode a latitude/longitude pair into a stored point.
pub fn encode(latitude: f64, longitude: f64) -> Result<GeoPoint, GeoError> {
    let latitude = check("latitude", latitude, LATITUDE_RANGE)?;
    let longitude = check("longitude", longitude, LONGITUDE_RANGE)?;
    Ok(GeoPoint {
        coordinates: [longitude, latitude],
    })
}

/// Decode a stored point back into client-facing coordinates.
pub fn decode(point: &GeoPoint) -> Coordinates {
    let [longitude, latitude] = point.coordinates;
    Coordinates {
        latitude,
        longitude,
    }
}
