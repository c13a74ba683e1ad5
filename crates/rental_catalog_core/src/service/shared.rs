//! Process-wide catalog facade.
//!
//! # Invariants
//! - At most one facade (and one repository set) exists per process.
//! - Later calls must name the same storage backend as the first one.

use super::catalog_service::{CatalogError, CatalogFacade};
use crate::config::{CatalogConfig, StorageConfig};
use crate::logging::init_logging;
use once_cell::sync::OnceCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

static SHARED_FACADE: OnceCell<SharedFacade> = OnceCell::new();

struct SharedFacade {
    storage: StorageConfig,
    facade: Arc<CatalogFacade>,
}

#[derive(Debug)]
pub enum SharedFacadeError {
    Logging(String),
    Open(CatalogError),
    /// The shared facade already runs on another backend.
    ConfigMismatch {
        active: StorageConfig,
        requested: StorageConfig,
    },
}

impl Display for SharedFacadeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Logging(message) => write!(f, "logging init failed: {message}"),
            Self::Open(err) => write!(f, "catalog open failed: {err}"),
            Self::ConfigMismatch { active, requested } => write!(
                f,
                "catalog already open on {active:?}; refusing to switch to {requested:?}"
            ),
        }
    }
}

impl Error for SharedFacadeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open(err) => Some(err),
            _ => None,
        }
    }
}

/// Returns the process-wide facade, opening it on first use.
///
/// Starts file logging first when `config.logging` is set.
///
/// # Errors
/// - `Logging` / `Open` when the first initialization fails; a later call
///   may retry.
/// - `ConfigMismatch` when the facade is already open on another backend.
pub fn shared_facade(config: &CatalogConfig) -> Result<Arc<CatalogFacade>, SharedFacadeError> {
    if let Some(logging) = &config.logging {
        init_logging(logging).map_err(SharedFacadeError::Logging)?;
    }

    let shared = SHARED_FACADE.get_or_try_init(|| -> Result<SharedFacade, SharedFacadeError> {
        let facade = CatalogFacade::from_config(&config.storage).map_err(SharedFacadeError::Open)?;
        Ok(SharedFacade {
            storage: config.storage.clone(),
            facade: Arc::new(facade),
        })
    })?;

    if shared.storage != config.storage {
        return Err(SharedFacadeError::ConfigMismatch {
            active: shared.storage.clone(),
            requested: config.storage.clone(),
        });
    }
    Ok(Arc::clone(&shared.facade))
}
