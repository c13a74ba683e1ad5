//! Catalog use-case services.
//!
//! # Responsibility
//! - Orchestrate the four entity repositories into cross-entity use-cases.
//! - Own the process-wide facade so every caller sees one store.

pub mod catalog_service;
pub mod shared;

pub use catalog_service::{CatalogError, CatalogFacade, CatalogResult, CatalogSummary, ErrorKind};
pub use shared::{shared_facade, SharedFacadeError};
