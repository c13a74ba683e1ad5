//! CLI smoke entry point.
//!
//! # Responsibility
//! - Open the configured catalog through the shared facade.
//! - Print deterministic backend and entity counts for local sanity checks.

use rental_catalog_core::{shared_facade, CatalogConfig};
use std::process::ExitCode;

fn main() -> ExitCode {
    let config = match CatalogConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("rental_catalog config error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let facade = match shared_facade(&config) {
        Ok(facade) => facade,
        Err(err) => {
            eprintln!("rental_catalog open error: {err}");
            return ExitCode::FAILURE;
        }
    };

    match facade.summary() {
        Ok(summary) => {
            log::info!(
                "event=cli_summary module=cli status=ok backend={}",
                facade.backend_name()
            );
            println!("rental_catalog version={}", rental_catalog_core::core_version());
            println!("rental_catalog backend={}", facade.backend_name());
            println!(
                "rental_catalog users={} places={} reviews={} amenities={}",
                summary.users, summary.places, summary.reviews, summary.amenities
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("rental_catalog summary error: {err}");
            ExitCode::FAILURE
        }
    }
}
