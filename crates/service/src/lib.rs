//! Service layer for the posts API.
//! - `storage`: the `PostStore` capability and its memory/Postgres implementations.
//! - `posts`: List, Add and SetFavorite on top of any `PostStore`.
//! - `guard`: referer-based access check run before every operation.

pub mod errors;
pub mod guard;
pub mod posts;
pub mod storage;
