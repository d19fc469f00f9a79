//! Storage abstractions for the posts service
//!
//! `PostStore` is the only capability the service needs from a datastore:
//! whole-collection query, keyed get/put, and a single-key transaction.

pub mod json_map_store;
pub mod memory;
pub mod seaorm;

use async_trait::async_trait;
use models::{PostKey, PostRecord};

use crate::errors::ServiceError;

pub use memory::MemoryPostStore;
pub use seaorm::SeaOrmPostStore;

/// Read-modify-write step run inside [`PostStore::run_in_transaction`].
///
/// Receives the current record (or `None` when the key is absent) and returns
/// the record to write back. Returning an error aborts without writing.
pub type Mutation = Box<dyn FnOnce(Option<PostRecord>) -> Result<PostRecord, ServiceError> + Send>;

#[async_trait]
pub trait PostStore: Send + Sync {
    /// Every stored post with its key. No filtering, ordering or paging.
    async fn query_all(&self) -> Result<Vec<(PostKey, PostRecord)>, ServiceError>;

    /// Insert under a fresh key (`None`) or overwrite the record at `key`.
    async fn put(&self, key: Option<PostKey>, record: PostRecord) -> Result<PostKey, ServiceError>;

    async fn get(&self, key: &PostKey) -> Result<Option<PostRecord>, ServiceError>;

    /// Run `mutation` against the record at `key` atomically with respect to
    /// other writers of the same key.
    async fn run_in_transaction(&self, key: &PostKey, mutation: Mutation) -> Result<(), ServiceError>;
}
