//! # Adoption Catalog
//!
//! The domain side of the app routes: what a dog looks like, how the list is
//! searched and ordered, and the adopted set that survives between runs.
//!
//! ```text
//!   DogSource ──fetch_list──► Vec<Dog> ──search / sort_by_distance──► list
//!                                                   ▲
//!   LocationProvider ──location──► Coord ───────────┘
//!
//!   AdoptionStore ◄──load (mount)── AdoptionStorage ──save (unmount)──►
//! ```
//!
//! Only `AdoptionStorage` touches the filesystem.

pub mod adoption;
pub mod dog;
pub mod geo;
pub mod list;
pub mod source;

pub use adoption::{AdoptionStorage, AdoptionStore, JsonFileStorage, StorageError};
pub use dog::{Dog, Unavailable, UnavailableReason};
pub use geo::{Coord, FixedLocation, LocationProvider, distance};
pub use source::{CatalogError, DogSource, SAMPLE_ORIGIN, StaticSource};
