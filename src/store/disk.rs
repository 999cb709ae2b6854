use super::{KeyValueCollection, Store, check_key};
use anyhow::{Context, Result, anyhow};
use fjall::{Keyspace, PartitionCreateOptions, PartitionHandle};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, RwLock};
use tracing::debug;

/// A collection backed by one fjall partition.
pub struct DiskCollection {
    partition: PartitionHandle,
}

impl DiskCollection {
    pub fn new(partition: PartitionHandle) -> Self {
        Self { partition }
    }
}

impl KeyValueCollection for DiskCollection {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        if check_key(key).is_err() {
            return Ok(None);
        }
        let value = self.partition.get(key.as_bytes())?;
        debug!("GET {key}: {}", if value.is_some() { "HIT" } else { "MISS" });
        Ok(value.map(|v| v.to_vec()))
    }

    fn put(&self, key: &str, value: Vec<u8>) -> Result<()> {
        check_key(key)?;
        self.partition.insert(key.as_bytes(), value)?;
        debug!("PUT {key}");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        check_key(key)?;
        let existed = self.partition.contains_key(key.as_bytes())?;
        if existed {
            self.partition.remove(key.as_bytes())?;
            debug!("REMOVE {key}");
        }
        Ok(existed)
    }

    fn entries(&self) -> Result<Vec<(String, Vec<u8>)>> {
        let mut entries = Vec::new();
        for item in self.partition.iter() {
            let (key, value) = item?;
            let key = String::from_utf8(key.to_vec()).context("Non UTF-8 key in partition")?;
            entries.push((key, value.to_vec()));
        }
        Ok(entries)
    }
}

/// Store persisted in a fjall keyspace; each collection is a partition.
pub struct DiskStore {
    keyspace: Keyspace,
    collections: RwLock<HashMap<String, Arc<DiskCollection>>>,
}

impl DiskStore {
    pub fn open(path: &Path) -> Result<Self> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create data directory: {}", path.display()))?;
        let keyspace = fjall::Config::new(path)
            .open()
            .with_context(|| format!("Failed to open catalog at {}", path.display()))?;
        debug!("Opened catalog keyspace at {}", path.display());

        Ok(Self {
            keyspace,
            collections: RwLock::new(HashMap::new()),
        })
    }
}

impl Store for DiskStore {
    fn collection(&self, name: &str) -> Result<Arc<dyn KeyValueCollection>> {
        let mut collections = self
            .collections
            .write()
            .map_err(|_| anyhow!("Store lock poisoned"))?;

        if let Some(collection) = collections.get(name) {
            let collection: Arc<dyn KeyValueCollection> = collection.clone();
            return Ok(collection);
        }

        let partition = self
            .keyspace
            .open_partition(name, PartitionCreateOptions::default())
            .with_context(|| format!("Failed to open partition {name}"))?;
        let collection = Arc::new(DiskCollection::new(partition));
        collections.insert(name.to_string(), collection.clone());
        let collection: Arc<dyn KeyValueCollection> = collection;
        Ok(collection)
    }
}
