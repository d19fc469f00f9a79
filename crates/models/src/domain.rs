use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;

/// Opaque identifier of a stored post. Assigned by the store, never by callers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostKey(Uuid);

impl PostKey {
    /// Fresh key for a newly inserted record.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for PostKey {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for PostKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for PostKey {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|e| ModelError::Validation(format!("invalid post key {s:?}: {e}")))
    }
}

/// A post as it sits in the store, without its key.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PostRecord {
    pub text: String,
    pub username: String,
    pub avatar: String,
    #[serde(default)]
    pub favorite: bool,
}

impl PostRecord {
    pub fn new(text: impl Into<String>, username: impl Into<String>, avatar: impl Into<String>) -> Self {
        Self { text: text.into(), username: username.into(), avatar: avatar.into(), favorite: false }
    }
}

/// A post as returned to clients: the record plus the key the store assigned.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub uid: Option<PostKey>,
    pub text: String,
    pub username: String,
    pub avatar: String,
    pub favorite: bool,
}

impl Post {
    pub fn from_record(key: PostKey, record: PostRecord) -> Self {
        Self {
            uid: Some(key),
            text: record.text,
            username: record.username,
            avatar: record.avatar,
            favorite: record.favorite,
        }
    }
}

/// List response wrapper: `{ "posts": [...] }`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posts {
    pub posts: Vec<Post>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub avatar: String,
}

impl From<AddRequest> for PostRecord {
    fn from(r: AddRequest) -> Self {
        PostRecord::new(r.text, r.username, r.avatar)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetFavoriteRequest {
    pub uid: PostKey,
    #[serde(default)]
    pub favorite: bool,
}
