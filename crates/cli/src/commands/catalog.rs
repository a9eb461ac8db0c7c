//! Restaurant catalog checks.

use std::path::Path;

use foodpi_storefront::store::{CatalogFile, validate_catalog};
use tracing::{error, info};

/// Parse and validate a catalog YAML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or lists the
/// validation problems found.
pub fn check(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    info!(path = %path.display(), "Checking catalog");

    let file = CatalogFile::read(path)?;
    info!(
        restaurants = file.restaurants.len(),
        reviews = file.reviews.len(),
        "Parsed catalog"
    );

    let errors = validate_catalog(&file);
    if !errors.is_empty() {
        error!("Catalog validation failed:");
        for err in &errors {
            error!("  - {err}");
        }
        return Err(format!("{} validation errors found", errors.len()).into());
    }

    let items: usize = file.restaurants.iter().map(|r| r.menu.len()).sum();
    info!(menu_items = items, "Catalog is valid");
    Ok(())
}
