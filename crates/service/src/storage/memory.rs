use std::path::PathBuf;

use async_trait::async_trait;
use models::{PostKey, PostRecord};

use super::{json_map_store::JsonMapStore, Mutation, PostStore};
use crate::errors::ServiceError;

/// Post store backed by a locked in-process map, optionally mirrored to a JSON file.
///
/// Transactions hold the map's write lock for the whole read-modify-write,
/// which serializes writers of every key, not just the one being updated.
pub struct MemoryPostStore {
    map: JsonMapStore<PostKey, PostRecord>,
}

impl MemoryPostStore {
    pub fn new() -> Self {
        Self { map: JsonMapStore::in_memory() }
    }

    /// Open (or create) a JSON-file-backed store.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Self, ServiceError> {
        Ok(Self { map: JsonMapStore::open(path).await? })
    }
}

impl Default for MemoryPostStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PostStore for MemoryPostStore {
    async fn query_all(&self) -> Result<Vec<(PostKey, PostRecord)>, ServiceError> {
        Ok(self.map.list().await)
    }

    async fn put(&self, key: Option<PostKey>, record: PostRecord) -> Result<PostKey, ServiceError> {
        self.map
            .update_map(move |m| {
                let key = match key {
                    Some(k) => k,
                    None => loop {
                        let k = PostKey::generate();
                        if !m.contains_key(&k) {
                            break k;
                        }
                    },
                };
                m.insert(key, record);
                Ok(key)
            })
            .await
    }

    async fn get(&self, key: &PostKey) -> Result<Option<PostRecord>, ServiceError> {
        Ok(self.map.get(key).await)
    }

    async fn run_in_transaction(&self, key: &PostKey, mutation: Mutation) -> Result<(), ServiceError> {
        let key = *key;
        self.map
            .update_map(move |m| {
                let next = mutation(m.get(&key).cloned())?;
                m.insert(key, next);
                Ok(())
            })
            .await
    }
}
