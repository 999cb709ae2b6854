use super::ui;
use crate::core::model::Catalog;
use crate::store::CatalogStore;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{info, warn};

/// Loads a JSON export (`{assets, avatars, collections}`) into the store.
/// Records with an existing id are replaced.
pub fn run(store: &CatalogStore, path: &Path) -> Result<usize> {
    let catalog = read_catalog(path)?;
    let total = catalog.assets.len() + catalog.avatars.len() + catalog.collections.len();

    let pb = ui::new_progress_bar(total as u64, true);
    pb.set_message("Importing records...");
    let written = store.import(&catalog, &|| pb.inc(1))?;
    pb.finish_and_clear();

    info!(
        "Imported {} assets, {} avatars, {} collections from {}",
        catalog.assets.len(),
        catalog.avatars.len(),
        catalog.collections.len(),
        path.display()
    );
    if written < total {
        warn!("Skipped {} records with unusable ids", total - written);
        println!("Imported {written} of {total} records.");
    } else {
        println!("Imported {written} records.");
    }
    Ok(written)
}

pub fn read_catalog(path: &Path) -> Result<Catalog> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read import file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse import file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_import_file() -> Result<()> {
        let file = NamedTempFile::new()?;
        std::fs::write(
            file.path(),
            r#"{
                "assets": [{ "id": "a1", "name": "Hat", "price": "5" }],
                "avatars": [{ "id": "v1", "name": "Fae", "base": "Fantasy2.0" }]
            }"#,
        )?;

        let store = CatalogStore::in_memory();
        assert_eq!(run(&store, file.path())?, 2);
        let snapshot = store.snapshot()?;
        assert_eq!(snapshot.assets[0].price.as_deref(), Some("5"));
        assert!(snapshot.collections.is_empty());
        Ok(())
    }

    #[test]
    fn test_import_skips_blank_ids() -> Result<()> {
        let file = NamedTempFile::new()?;
        std::fs::write(
            file.path(),
            r#"{
                "assets": [{ "id": "", "name": "Nameless" }, { "id": "a1", "name": "Hat" }]
            }"#,
        )?;

        let store = CatalogStore::in_memory();
        assert_eq!(run(&store, file.path())?, 1);
        assert_eq!(store.snapshot()?.assets[0].id, "a1");
        Ok(())
    }

    #[test]
    fn test_import_rejects_invalid_json() -> Result<()> {
        let file = NamedTempFile::new()?;
        std::fs::write(file.path(), "assets: []")?;

        let store = CatalogStore::in_memory();
        let err = run(&store, file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse import file"));
        Ok(())
    }
}
