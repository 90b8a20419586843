use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::geo::Coord;

/// A dog in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dog {
    pub name: String,
    pub breed: String,
    pub photo: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Coord>,
    /// Kilometres from the user, filled in once a location is known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unavailable: Option<Unavailable>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnavailableReason {
    Sick,
    TooYoung,
}

/// Why a dog can't be adopted yet, and from when it can.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unavailable {
    pub reason: UnavailableReason,
    pub available_from: NaiveDate,
}

impl Dog {
    pub fn new(name: impl Into<String>, breed: impl Into<String>, photo: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            breed: breed.into(),
            photo: photo.into(),
            age: None,
            location: None,
            distance_km: None,
            unavailable: None,
        }
    }

    pub fn with_age(mut self, age: u8) -> Self {
        self.age = Some(age);
        self
    }

    pub fn with_location(mut self, location: Coord) -> Self {
        self.location = Some(location);
        self
    }

    pub fn unavailable(mut self, reason: UnavailableReason, available_from: NaiveDate) -> Self {
        self.unavailable = Some(Unavailable {
            reason,
            available_from,
        });
        self
    }

    pub fn is_adoptable(&self) -> bool {
        self.unavailable.is_none()
    }

    /// One-line "<name> es de raza <breed>" used by list rows.
    pub fn summary(&self) -> String {
        format!("{} es de raza {}", self.name, self.breed)
    }
}
