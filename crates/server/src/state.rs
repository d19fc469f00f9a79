use std::sync::Arc;

use service::{guard::RefererPolicy, posts::PostsService};

/// Shared handler state; cheap to clone per request.
#[derive(Clone)]
pub struct ServerState {
    pub posts: PostsService,
    pub referer_policy: Arc<RefererPolicy>,
}

impl ServerState {
    pub fn new(posts: PostsService, referer_policy: RefererPolicy) -> Self {
        Self { posts, referer_policy: Arc::new(referer_policy) }
    }
}
