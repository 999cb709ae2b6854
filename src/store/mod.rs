pub mod codec;
pub mod disk;
pub mod memory;

use crate::core::config::AppConfig;
use crate::core::model::{Asset, Avatar, Catalog, Collection};
use anyhow::{Result, bail};
use codec::Record;
use disk::DiskStore;
use memory::MemoryStore;
use std::sync::Arc;
use tracing::{debug, warn};

const SETTINGS: &str = "settings";

/// Longest key the disk backend accepts, in bytes.
pub const MAX_KEY_LEN: usize = u16::MAX as usize;

/// Rejects keys no backend can hold: empty, or over [`MAX_KEY_LEN`] bytes.
pub fn check_key(key: &str) -> Result<()> {
    if key.is_empty() {
        bail!("Empty key");
    }
    if key.len() > MAX_KEY_LEN {
        bail!("Key too long: {} bytes, max {MAX_KEY_LEN}", key.len());
    }
    Ok(())
}

/// A named collection of byte values keyed by string.
pub trait KeyValueCollection: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;
    fn put(&self, key: &str, value: Vec<u8>) -> Result<()>;
    /// Returns true if the key was present.
    fn remove(&self, key: &str) -> Result<bool>;
    /// All entries, sorted by key.
    fn entries(&self) -> Result<Vec<(String, Vec<u8>)>>;
}

/// Holds named collections, creating them on first use.
pub trait Store: Send + Sync {
    fn collection(&self, name: &str) -> Result<Arc<dyn KeyValueCollection>>;
}

/// Typed access to catalog records and settings on top of a [`Store`].
pub struct CatalogStore {
    store: Arc<dyn Store>,
}

impl CatalogStore {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Opens the on-disk catalog under the configured data path.
    pub fn open(config: &AppConfig) -> Result<Self> {
        let path = config.data_path()?.join("catalog");
        Ok(Self::new(Arc::new(DiskStore::open(&path)?)))
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    pub fn get<R: Record>(&self, id: &str) -> Result<Option<R>> {
        let collection = self.store.collection(R::COLLECTION)?;
        collection
            .get(id)?
            .map(|bytes| R::decode(&bytes))
            .transpose()
    }

    pub fn put<R: Record>(&self, record: &R) -> Result<()> {
        let collection = self.store.collection(R::COLLECTION)?;
        collection.put(record.id(), record.encode()?)
    }

    pub fn remove<R: Record>(&self, id: &str) -> Result<bool> {
        self.store.collection(R::COLLECTION)?.remove(id)
    }

    /// Every decodable record in the collection, in id order. Rows that fail
    /// to decode are skipped so one bad record cannot blank a listing.
    pub fn list<R: Record>(&self) -> Result<Vec<R>> {
        let entries = self.store.collection(R::COLLECTION)?.entries()?;
        let mut records = Vec::with_capacity(entries.len());
        for (key, bytes) in entries {
            match R::decode(&bytes) {
                Ok(record) => records.push(record),
                Err(e) => warn!("Skipping corrupt {} record {key}: {e:#}", R::COLLECTION),
            }
        }
        Ok(records)
    }

    pub fn setting(&self, key: &str) -> Result<Option<String>> {
        let value = self.store.collection(SETTINGS)?.get(key)?;
        Ok(value.map(|bytes| String::from_utf8_lossy(&bytes).into_owned()))
    }

    pub fn put_setting(&self, key: &str, value: &str) -> Result<()> {
        self.store
            .collection(SETTINGS)?
            .put(key, value.as_bytes().to_vec())
    }

    pub fn snapshot(&self) -> Result<Catalog> {
        let catalog = Catalog {
            assets: self.list::<Asset>()?,
            avatars: self.list::<Avatar>()?,
            collections: self.list::<Collection>()?,
        };
        debug!(
            "Loaded snapshot: {} assets, {} avatars, {} collections",
            catalog.assets.len(),
            catalog.avatars.len(),
            catalog.collections.len()
        );
        Ok(catalog)
    }

    /// Upserts every record in `catalog` and returns how many were written.
    /// Records with an unusable id are skipped. `on_record` is called once
    /// per record, written or not.
    pub fn import(&self, catalog: &Catalog, on_record: &dyn Fn()) -> Result<usize> {
        let written = self.import_records(&catalog.assets, on_record)?
            + self.import_records(&catalog.avatars, on_record)?
            + self.import_records(&catalog.collections, on_record)?;
        Ok(written)
    }

    fn import_records<R: Record>(&self, records: &[R], on_record: &dyn Fn()) -> Result<usize> {
        let mut written = 0;
        for record in records {
            match check_key(record.id()) {
                Ok(()) => {
                    self.put(record)?;
                    written += 1;
                }
                Err(e) => warn!("Skipping {} record with bad id: {e}", R::COLLECTION),
            }
            on_record();
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_catalog() -> Catalog {
        Catalog {
            assets: vec![
                Asset {
                    id: "a2".to_string(),
                    name: "Boots".to_string(),
                    ..Default::default()
                },
                Asset {
                    id: "a1".to_string(),
                    name: "Hat".to_string(),
                    tags: vec!["hat".to_string()],
                    ..Default::default()
                },
            ],
            avatars: vec![Avatar {
                id: "v1".to_string(),
                name: "Morrigan".to_string(),
                base: "Fantasy2.0".to_string(),
                is_current: true,
                ..Default::default()
            }],
            collections: vec![Collection {
                id: "c1".to_string(),
                name: "Outfit".to_string(),
                asset_ids: vec!["a1".to_string(), "a2".to_string()],
                ..Default::default()
            }],
        }
    }

    #[test]
    fn test_import_and_snapshot() {
        let store = CatalogStore::in_memory();
        let calls = std::cell::Cell::new(0);
        let written = store
            .import(&sample_catalog(), &|| calls.set(calls.get() + 1))
            .unwrap();
        assert_eq!(written, 4);
        assert_eq!(calls.get(), 4);

        let snapshot = store.snapshot().unwrap();
        let ids: Vec<&str> = snapshot.assets.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["a1", "a2"]);
        assert_eq!(snapshot.assets[0].tags, vec!["hat".to_string()]);
        assert!(snapshot.avatars[0].is_current);
        assert_eq!(snapshot.collections[0].asset_ids.len(), 2);
    }

    #[test]
    fn test_get_put_remove_record() {
        let store = CatalogStore::in_memory();
        assert!(store.get::<Avatar>("v1").unwrap().is_none());

        let avatar = sample_catalog().avatars.remove(0);
        store.put(&avatar).unwrap();
        assert_eq!(store.get::<Avatar>("v1").unwrap(), Some(avatar));

        assert!(store.remove::<Avatar>("v1").unwrap());
        assert!(store.get::<Avatar>("v1").unwrap().is_none());
    }

    #[test]
    fn test_corrupt_row_is_skipped_in_list() {
        let backend = Arc::new(MemoryStore::new());
        let store = CatalogStore::new(backend.clone());
        store.put(&sample_catalog().assets[0]).unwrap();
        backend
            .collection("assets")
            .unwrap()
            .put("broken", b"{not json".to_vec())
            .unwrap();

        let assets = store.list::<Asset>().unwrap();
        assert_eq!(assets.len(), 1);
        assert_eq!(assets[0].id, "a2");
    }

    #[test]
    fn test_settings() {
        let store = CatalogStore::in_memory();
        assert!(store.setting("stats.currency").unwrap().is_none());
        store.put_setting("stats.currency", "EUR").unwrap();
        assert_eq!(
            store.setting("stats.currency").unwrap().as_deref(),
            Some("EUR")
        );
    }

    #[test]
    fn test_put_rejects_unusable_ids() {
        let store = CatalogStore::in_memory();
        let err = store.put(&Asset::default()).unwrap_err();
        assert_eq!(err.to_string(), "Empty key");

        let long = Avatar {
            id: "x".repeat(MAX_KEY_LEN + 1),
            ..Default::default()
        };
        assert!(store.put(&long).is_err());
        assert!(store.list::<Avatar>().unwrap().is_empty());
    }

    #[test]
    fn test_disk_import_skips_unusable_ids() {
        let dir = tempfile::tempdir().unwrap();
        let store = CatalogStore::new(Arc::new(DiskStore::open(dir.path()).unwrap()));
        let mut catalog = sample_catalog();
        catalog.assets.push(Asset {
            id: String::new(),
            name: "Nameless".to_string(),
            ..Default::default()
        });
        catalog.avatars.push(Avatar {
            id: "v".repeat(MAX_KEY_LEN + 1),
            ..Default::default()
        });

        let calls = std::cell::Cell::new(0);
        let written = store
            .import(&catalog, &|| calls.set(calls.get() + 1))
            .unwrap();
        assert_eq!(written, 4);
        assert_eq!(calls.get(), 6);

        let snapshot = store.snapshot().unwrap();
        assert_eq!(snapshot.assets.len(), 2);
        assert_eq!(snapshot.avatars.len(), 1);
        assert!(store.put(&Asset::default()).is_err());
    }

    #[test]
    fn test_disk_catalog_store() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            data_path: Some(dir.path().to_string_lossy().into_owned()),
            ..Default::default()
        };
        let store = CatalogStore::open(&config).unwrap();
        store.import(&sample_catalog(), &|| ()).unwrap();
        assert_eq!(store.snapshot().unwrap(), {
            let mut expected = sample_catalog();
            expected.assets.reverse();
            expected
        });
    }
}
