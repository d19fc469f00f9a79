use std::sync::Arc;

use tracing::{info, instrument};

use models::{AddRequest, Post, PostRecord, Posts, SetFavoriteRequest};

use crate::errors::ServiceError;
use crate::storage::PostStore;

/// List, Add and SetFavorite over an injected [`PostStore`].
#[derive(Clone)]
pub struct PostsService {
    store: Arc<dyn PostStore>,
}

impl PostsService {
    pub fn new(store: Arc<dyn PostStore>) -> Self { Self { store } }

    /// All posts with their keys attached, in whatever order the store yields.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Posts, ServiceError> {
        let posts = self
            .store
            .query_all()
            .await?
            .into_iter()
            .map(|(key, record)| Post::from_record(key, record))
            .collect::<Vec<_>>();
        info!(count = posts.len(), "listed posts");
        Ok(Posts { posts })
    }

    /// Store a new, non-favorite post and return it with its assigned key.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::{posts::PostsService, storage::MemoryPostStore};
    /// use models::AddRequest;
    /// let svc = PostsService::new(Arc::new(MemoryPostStore::new()));
    /// let req = AddRequest { text: "hi".into(), username: "bob".into(), avatar: "a.png".into() };
    /// let post = tokio_test::block_on(svc.add(req)).unwrap();
    /// assert!(post.uid.is_some());
    /// assert!(!post.favorite);
    /// ```
    #[instrument(skip(self, req), fields(username = %req.username))]
    pub async fn add(&self, req: AddRequest) -> Result<Post, ServiceError> {
        let record = PostRecord::from(req);
        let key = self.store.put(None, record.clone()).await?;
        info!(uid = %key, "post_added");
        Ok(Post::from_record(key, record))
    }

    /// Set the favorite flag of an existing post inside a store transaction.
    #[instrument(skip(self, req), fields(uid = %req.uid, favorite = req.favorite))]
    pub async fn set_favorite(&self, req: SetFavoriteRequest) -> Result<(), ServiceError> {
        let favorite = req.favorite;
        self.store
            .run_in_transaction(
                &req.uid,
                Box::new(move |current: Option<PostRecord>| -> Result<PostRecord, ServiceError> {
                    let mut record = current.ok_or_else(|| ServiceError::not_found("post"))?;
                    record.favorite = favorite;
                    Ok(record)
                }),
            )
            .await?;
        info!("favorite_updated");
        Ok(())
    }
}
