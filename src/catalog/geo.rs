use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::source::CatalogError;

const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coord {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Great-circle distance in kilometres (haversine), rounded to 2 decimals.
pub fn distance(a: Coord, b: Coord) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.latitude.to_radians().cos() * b.latitude.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    (EARTH_RADIUS_KM * c * 100.0).round() / 100.0
}

/// Where the user is. Permission prompts live behind the implementation.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn location(&self) -> Result<Coord, CatalogError>;
}

/// Always reports the same coordinate.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub Coord);

#[async_trait]
impl LocationProvider for FixedLocation {
    async fn location(&self) -> Result<Coord, CatalogError> {
        Ok(self.0)
    }
}
