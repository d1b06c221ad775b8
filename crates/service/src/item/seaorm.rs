use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::item::repository::{Item, ItemFields, ItemPatch, ItemStore};
use crate::search;

/// SeaORM-backed store implementation (Postgres).
pub struct SeaOrmItemStore {
    pub db: DatabaseConnection,
}

impl SeaOrmItemStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ItemStore for SeaOrmItemStore {
    async fn insert(&self, fields: ItemFields) -> Result<Uuid, ServiceError> {
        let model = models::item::create(
            &self.db,
            &fields.name,
            fields.description.as_deref(),
            fields.quantity,
            fields.category.as_deref(),
            fields.notes.as_deref(),
            fields.is_fragile,
            fields.last_modified,
        )
        .await?;
        Ok(model.id)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Item>, ServiceError> {
        Ok(models::item::get(&self.db, id).await?)
    }

    async fn patch(
        &self,
        id: Uuid,
        patch: &ItemPatch,
        last_modified: i64,
    ) -> Result<(), ServiceError> {
        models::item::update_partial(
            &self.db,
            id,
            patch.name.as_deref(),
            patch.description.as_deref(),
            patch.quantity,
            patch.category.as_deref(),
            patch.notes.as_deref(),
            patch.is_fragile,
            last_modified,
        )
        .await?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        Ok(models::item::delete(&self.db, id).await?)
    }

    async fn list_all(&self) -> Result<Vec<Item>, ServiceError> {
        Ok(models::item::list_all(&self.db).await?)
    }

    async fn list_by_category(&self, category: &str) -> Result<Vec<Item>, ServiceError> {
        Ok(models::item::list_by_category(&self.db, category).await?)
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<Item>, ServiceError> {
        Ok(models::item::list_recent(&self.db, limit as u64).await?)
    }

    async fn search_by_name(&self, query: &str, limit: usize) -> Result<Vec<Item>, ServiceError> {
        let tokens = search::tokenize(query);
        if tokens.is_empty() {
            return Ok(Vec::new());
        }
        // ILIKE prefilters candidates; the shared scorer orders them.
        let candidates = models::item::search_candidates(&self.db, &tokens).await?;
        Ok(search::rank(candidates, &tokens, limit))
    }

    async fn distinct_categories(&self) -> Result<Vec<String>, ServiceError> {
        Ok(models::item::distinct_categories(&self.db).await?)
    }
}
