use async_trait::async_trait;
use log::debug;
use thiserror::Error;

use super::dog::Dog;
use super::geo::Coord;

/// Where the sample shelter list is centred (Madrid).
pub const SAMPLE_ORIGIN: Coord = Coord::new(40.4168, -3.7038);

/// Failures reported by catalog collaborators (list source, location).
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The list source could not produce dogs.
    #[error("failed to fetch dogs: {0}")]
    Fetch(String),

    /// The user refused location access.
    #[error("location permission denied")]
    PermissionDenied,

    /// Location access was granted but no fix came back.
    #[error("location unavailable: {0}")]
    Location(String),
}

/// Produces the list of dogs shown by the catalog tab.
#[async_trait]
pub trait DogSource: Send + Sync {
    async fn fetch_list(&self) -> Result<Vec<Dog>, CatalogError>;
}

/// A fixed, in-memory list.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    dogs: Vec<Dog>,
}

impl StaticSource {
    pub fn new(dogs: Vec<Dog>) -> Self {
        Self { dogs }
    }

    /// A handful of dogs for the shell.
    pub fn sample() -> Self {
        Self::new(vec![
            Dog::new("Firulais", "Labrador", "https://images.dog.ceo/breeds/labrador/1.jpg")
                .with_age(3)
                .with_location(Coord::new(40.4530, -3.6883)),
            Dog::new("Luna", "Husky", "https://images.dog.ceo/breeds/husky/2.jpg")
                .with_age(2)
                .with_location(Coord::new(40.4000, -3.7100)),
            Dog::new("Rocky", "Boxer", "https://images.dog.ceo/breeds/boxer/3.jpg")
                .with_age(7)
                .with_location(Coord::new(40.3223, -3.8650)),
            Dog::new("Nina", "Beagle", "https://images.dog.ceo/breeds/beagle/4.jpg").with_age(1),
            Dog::new("Simba", "Akita", "https://images.dog.ceo/breeds/akita/5.jpg")
                .with_age(5)
                .with_location(Coord::new(40.4818, -3.3635)),
        ])
    }
}

#[async_trait]
impl DogSource for StaticSource {
    async fn fetch_list(&self) -> Result<Vec<Dog>, CatalogError> {
        debug!("Static source returning {} dogs", self.dogs.len());
        Ok(self.dogs.clone())
    }
}
