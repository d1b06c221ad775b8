use std::sync::Arc;

use chrono::Utc;
use tokio::sync::broadcast;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::item::events::{ItemAction, ItemEvent, ItemEvents};
use crate::item::repository::{CreateItemInput, Item, ItemFields, ItemPatch, ItemStore};

/// Default number of records returned by `recent`.
const DEFAULT_RECENT_LIMIT: usize = 10;
/// Name search is always capped here; an unbounded match-everything query
/// must never reach the store.
const SEARCH_LIMIT: usize = 20;

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Application service encapsulating the item CRUD rules: validation,
/// defaulting, `last_modified` stamping, and change-event publication.
/// All conflict handling is last-write-wins on `last_modified`.
pub struct ItemService {
    store: Arc<dyn ItemStore>,
    events: ItemEvents,
}

impl ItemService {
    pub fn new(store: Arc<dyn ItemStore>) -> Self {
        Self { store, events: ItemEvents::default() }
    }

    /// Subscribe to change notifications; one event per affected record.
    pub fn subscribe(&self) -> broadcast::Receiver<ItemEvent> {
        self.events.subscribe()
    }

    pub async fn list(&self, category: Option<&str>) -> Result<Vec<Item>, ServiceError> {
        match category {
            Some(c) => self.store.list_by_category(c).await,
            None => self.store.list_all().await,
        }
    }

    pub async fn recent(&self, limit: Option<usize>) -> Result<Vec<Item>, ServiceError> {
        self.store.list_recent(limit.unwrap_or(DEFAULT_RECENT_LIMIT)).await
    }

    /// Name search. A trimmed-empty query returns no results without a
    /// store call; this short-circuit is part of the contract.
    pub async fn search(&self, query: &str) -> Result<Vec<Item>, ServiceError> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }
        self.store.search_by_name(query, SEARCH_LIMIT).await
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Item>, ServiceError> {
        self.store.get(id).await
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(&self, input: CreateItemInput) -> Result<Uuid, ServiceError> {
        models::item::validate_name(&input.name)?;

        let at = now_millis();
        let id = self
            .store
            .insert(ItemFields {
                name: input.name,
                description: input.description,
                quantity: input.quantity.unwrap_or(1),
                category: input.category,
                notes: input.notes,
                is_fragile: input.is_fragile,
                last_modified: at,
            })
            .await?;
        info!(%id, "created item");
        self.events.publish(ItemEvent { action: ItemAction::Created, id, at });
        Ok(id)
    }

    /// Sparse update. The existence check is explicit so a missing id is an
    /// observable `NotFound`, never a silent no-op. `last_modified` advances
    /// unconditionally, even for an empty patch.
    pub async fn update(&self, id: Uuid, patch: ItemPatch) -> Result<Uuid, ServiceError> {
        if self.store.get(id).await?.is_none() {
            return Err(ServiceError::not_found("item"));
        }

        let at = now_millis();
        self.store.patch(id, &patch, at).await?;
        info!(%id, "updated item");
        self.events.publish(ItemEvent { action: ItemAction::Updated, id, at });
        Ok(id)
    }

    /// Unconditional delete; removing a missing id succeeds.
    pub async fn remove(&self, id: Uuid) -> Result<(), ServiceError> {
        let existed = self.store.delete(id).await?;
        if existed {
            info!(%id, "deleted item");
            self.events.publish(ItemEvent { action: ItemAction::Deleted, id, at: now_millis() });
        }
        Ok(())
    }

    pub async fn categories(&self) -> Result<Vec<String>, ServiceError> {
        self.store.distinct_categories().await
    }
}
