//! Core domain logic for the rental catalog.
//! This crate is the single source of truth for entity rules and
//! cross-entity invariants.

pub mod config;
pub mod credential;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{CatalogConfig, ConfigError, LoggingConfig, StorageConfig};
pub use credential::{CredentialHasher, Sha256CredentialHasher};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::amenity::{Amenity, AmenityPatch, NewAmenity};
pub use model::place::{NewPlace, Place, PlacePatch};
pub use model::review::{NewReview, Review, ReviewPatch};
pub use model::user::{NewUser, User, UserUpdate};
pub use model::{Entity, EntityId, EntityKind, ValidationError};
pub use repo::{InMemoryRepository, RepoError, RepoResult, Repository, SqliteRepository};
pub use service::{
    shared_facade, CatalogError, CatalogFacade, CatalogResult, CatalogSummary, ErrorKind,
    SharedFacadeError,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
