use std::{collections::HashMap, hash::Hash, path::PathBuf, sync::Arc};
use tokio::{fs, sync::RwLock};

use crate::errors::ServiceError;

/// Generic key-value map, optionally persisted to a JSON file.
///
/// Without a file the map lives in memory only. With a file, every write
/// rewrites it while the write lock is still held, so the file never lags
/// behind a committed update.
pub struct JsonMapStore<K, V> {
    inner: Arc<RwLock<HashMap<K, V>>>,
    file_path: Option<PathBuf>,
}

impl<K, V> JsonMapStore<K, V>
where
    K: Eq + Hash + serde::Serialize + serde::de::DeserializeOwned + Clone,
    V: serde::Serialize + serde::de::DeserializeOwned + Clone,
{
    pub fn in_memory() -> Self {
        Self { inner: Arc::new(RwLock::new(HashMap::new())), file_path: None }
    }

    /// Initialize the store from a path. Creates the file with an empty map if missing.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Self, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(ServiceError::store)?;
        }

        let map: HashMap<K, V> = match fs::read(&file_path).await {
            Ok(bytes) if bytes.is_empty() => HashMap::new(),
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| ServiceError::Store(format!("corrupt store file {}: {e}", file_path.display())))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let empty: HashMap<K, V> = HashMap::new();
                fs::write(&file_path, serde_json::to_vec(&empty).map_err(ServiceError::store)?)
                    .await
                    .map_err(ServiceError::store)?;
                empty
            }
            Err(e) => {
                return Err(ServiceError::Store(format!("cannot read store file {}: {e}", file_path.display())));
            }
        };

        Ok(Self { inner: Arc::new(RwLock::new(map)), file_path: Some(file_path) })
    }

    async fn save(&self, map: &HashMap<K, V>) -> Result<(), ServiceError> {
        let Some(path) = &self.file_path else {
            return Ok(());
        };
        let data = serde_json::to_vec(map).map_err(ServiceError::store)?;
        fs::write(path, data).await.map_err(ServiceError::store)?;
        Ok(())
    }

    /// List all entries as `(key, value)` pairs.
    pub async fn list(&self) -> Vec<(K, V)> {
        let map = self.inner.read().await;
        map.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    /// Get value by key.
    pub async fn get(&self, key: &K) -> Option<V> {
        let map = self.inner.read().await;
        map.get(key).cloned()
    }

    /// Insert or update a value by key and persist.
    pub async fn insert(&self, key: K, value: V) -> Result<(), ServiceError> {
        self.update_map(move |m| {
            m.insert(key, value);
            Ok(())
        })
        .await
    }

    /// Apply a mutation under the write lock and persist it.
    ///
    /// `f` runs against a copy; the live map is replaced only after the
    /// copy has been saved, so a failed `f` or a failed save changes nothing.
    pub async fn update_map<F, R>(&self, f: F) -> Result<R, ServiceError>
    where
        F: FnOnce(&mut HashMap<K, V>) -> Result<R, ServiceError>,
    {
        let mut map = self.inner.write().await;
        let mut next = map.clone();
        let out = f(&mut next)?;
        self.save(&next).await?;
        *map = next;
        Ok(out)
    }
}
