//! In-memory data stores.
//!
//! # Architecture
//!
//! - [`Catalog`] - restaurants and menus, loaded once at startup from YAML
//! - [`OrderBook`] - orders placed since startup
//! - [`ReviewBoard`] - seeded reviews plus reviews submitted since startup
//!
//! Nothing here survives a restart. The stores are behind `tokio` locks so
//! handlers can share them through `AppState`.

pub mod catalog;
pub mod orders;
pub mod reviews;

pub use catalog::{Catalog, CatalogFile, validate_catalog};
pub use orders::OrderBook;
pub use reviews::ReviewBoard;

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading or querying the stores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The catalog file could not be read.
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The catalog file is not valid YAML for the catalog schema.
    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// The catalog parsed but is inconsistent.
    #[error("Invalid catalog: {}", .0.join("; "))]
    Invalid(Vec<String>),
}
