use super::{KeyValueCollection, Store, check_key};
use anyhow::{Result, anyhow};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};
use tracing::debug;

/// In-memory collection. Keys iterate in sorted order, like the disk backend.
#[derive(Default)]
pub struct MemoryCollection {
    inner: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl MemoryCollection {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueCollection for MemoryCollection {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let map = self.inner.read().map_err(|_| anyhow!("Collection lock poisoned"))?;
        Ok(map.get(key).cloned())
    }

    fn put(&self, key: &str, value: Vec<u8>) -> Result<()> {
        check_key(key)?;
        let mut map = self.inner.write().map_err(|_| anyhow!("Collection lock poisoned"))?;
        debug!("PUT {key}");
        map.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        check_key(key)?;
        let mut map = self.inner.write().map_err(|_| anyhow!("Collection lock poisoned"))?;
        debug!("REMOVE {key}");
        Ok(map.remove(key).is_some())
    }

    fn entries(&self) -> Result<Vec<(String, Vec<u8>)>> {
        let map = self.inner.read().map_err(|_| anyhow!("Collection lock poisoned"))?;
        Ok(map.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
    }
}

/// Store whose collections live only as long as the process.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Arc<MemoryCollection>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn collection(&self, name: &str) -> Result<Arc<dyn KeyValueCollection>> {
        let mut collections = self
            .collections
            .write()
            .map_err(|_| anyhow!("Store lock poisoned"))?;
        let collection = collections
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(MemoryCollection::new()));
        let collection: Arc<dyn KeyValueCollection> = collection.clone();
        Ok(collection)
    }
}
