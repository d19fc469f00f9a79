//! Data model for posts: the wire/domain types and the sea-orm entity
//! backing the Postgres store.

pub mod errors;
pub mod db;
pub mod domain;
pub mod post;

pub use domain::{AddRequest, Post, PostKey, PostRecord, Posts, SetFavoriteRequest};
