pub mod config;
pub mod library;
pub mod premium;
pub mod read;
pub mod utils;

use anyhow::Result;
use std::path::Path;

use crate::catalog::Catalog;

/// Catalog from the command line, the config file, or the built-in set
pub fn load_catalog(cli_path: Option<&Path>, configured: Option<&Path>) -> Result<Catalog> {
    match cli_path.or(configured) {
        Some(path) => {
            tracing::debug!("Loading catalog from {}", path.display());
            Catalog::load(path)
        }
        None => Ok(Catalog::builtin()),
    }
}
