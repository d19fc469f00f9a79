use sea_orm::{entity::prelude::*, Set};
use serde::{Deserialize, Serialize};

use crate::domain::{PostKey, PostRecord};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "post")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub text: String,
    #[sea_orm(column_type = "Text")]
    pub username: String,
    #[sea_orm(column_type = "Text")]
    pub avatar: String,
    pub favorite: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn key(&self) -> PostKey {
        PostKey::from(self.id)
    }

    pub fn into_record(self) -> (PostKey, PostRecord) {
        let key = self.key();
        let record = PostRecord {
            text: self.text,
            username: self.username,
            avatar: self.avatar,
            favorite: self.favorite,
        };
        (key, record)
    }
}

/// Fully-set active model for an insert or overwrite at `key`.
pub fn active_model(key: PostKey, record: PostRecord) -> ActiveModel {
    ActiveModel {
        id: Set(key.as_uuid()),
        text: Set(record.text),
        username: Set(record.username),
        avatar: Set(record.avatar),
        favorite: Set(record.favorite),
    }
}
