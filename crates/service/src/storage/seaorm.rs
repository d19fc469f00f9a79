use async_trait::async_trait;
use sea_orm::{
    sea_query::OnConflict, ActiveModelTrait, DatabaseConnection, EntityTrait, QuerySelect, TransactionTrait,
};
use tracing::debug;

use models::{post, PostKey, PostRecord};

use super::{Mutation, PostStore};
use crate::errors::ServiceError;

/// SeaORM-backed post store (Postgres).
pub struct SeaOrmPostStore {
    pub db: DatabaseConnection,
}

impl SeaOrmPostStore {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

#[async_trait]
impl PostStore for SeaOrmPostStore {
    async fn query_all(&self) -> Result<Vec<(PostKey, PostRecord)>, ServiceError> {
        let rows = post::Entity::find().all(&self.db).await?;
        Ok(rows.into_iter().map(post::Model::into_record).collect())
    }

    async fn put(&self, key: Option<PostKey>, record: PostRecord) -> Result<PostKey, ServiceError> {
        match key {
            None => {
                let key = PostKey::generate();
                post::active_model(key, record).insert(&self.db).await?;
                Ok(key)
            }
            Some(key) => {
                post::Entity::insert(post::active_model(key, record))
                    .on_conflict(
                        OnConflict::column(post::Column::Id)
                            .update_columns([
                                post::Column::Text,
                                post::Column::Username,
                                post::Column::Avatar,
                                post::Column::Favorite,
                            ])
                            .to_owned(),
                    )
                    .exec(&self.db)
                    .await?;
                Ok(key)
            }
        }
    }

    async fn get(&self, key: &PostKey) -> Result<Option<PostRecord>, ServiceError> {
        let row = post::Entity::find_by_id(key.as_uuid()).one(&self.db).await?;
        Ok(row.map(|m| m.into_record().1))
    }

    async fn run_in_transaction(&self, key: &PostKey, mutation: Mutation) -> Result<(), ServiceError> {
        // Dropping `txn` on any early return rolls it back.
        let txn = self.db.begin().await?;
        let current = post::Entity::find_by_id(key.as_uuid())
            .lock_exclusive()
            .one(&txn)
            .await?;
        let existed = current.is_some();
        let next = mutation(current.map(|m| m.into_record().1))?;

        let am = post::active_model(*key, next);
        if existed {
            am.update(&txn).await?;
        } else {
            am.insert(&txn).await?;
        }
        txn.commit().await?;
        debug!(uid = %key, existed, "post transaction committed");
        Ok(())
    }
}
