use std::{collections::HashMap, path::PathBuf, sync::Arc};

use async_trait::async_trait;
use tokio::{fs, sync::RwLock};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::item::repository::{Item, ItemFields, ItemPatch, ItemStore};
use crate::search;

/// JSON file-backed item store.
///
/// Persists the whole item map to a single JSON file and serves reads from
/// memory. The default backend when no database is configured, and the
/// backend the test suites run against. Per-record atomicity comes from the
/// write lock around each mutation.
pub struct ItemFileStore {
    inner: RwLock<HashMap<Uuid, Item>>,
    file_path: PathBuf,
}

impl ItemFileStore {
    /// Initialize the store from a path. Creates the file with an empty map
    /// if missing.
    pub async fn new<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await.ok();
        }

        let map: HashMap<Uuid, Item> = match fs::read(&file_path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_default(),
            Err(_) => {
                let empty: HashMap<Uuid, Item> = HashMap::new();
                fs::write(
                    &file_path,
                    serde_json::to_vec(&empty).map_err(|e| ServiceError::Store(e.to_string()))?,
                )
                .await
                .map_err(|e| ServiceError::Store(e.to_string()))?;
                empty
            }
        };

        Ok(Arc::new(Self { inner: RwLock::new(map), file_path }))
    }

    async fn save(&self) -> Result<(), ServiceError> {
        let map = self.inner.read().await;
        let data = serde_json::to_vec(&*map).map_err(|e| ServiceError::Store(e.to_string()))?;
        fs::write(&self.file_path, data)
            .await
            .map_err(|e| ServiceError::Store(e.to_string()))?;
        Ok(())
    }

    async fn snapshot(&self) -> Vec<Item> {
        let map = self.inner.read().await;
        map.values().cloned().collect()
    }

    fn sort_desc(mut items: Vec<Item>) -> Vec<Item> {
        items.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));
        items
    }
}

#[async_trait]
impl ItemStore for ItemFileStore {
    async fn insert(&self, fields: ItemFields) -> Result<Uuid, ServiceError> {
        let mut map = self.inner.write().await;
        let mut id = Uuid::new_v4();
        // Ids are never reused; regenerate on the astronomically unlikely hit.
        while map.contains_key(&id) {
            id = Uuid::new_v4();
        }
        map.insert(
            id,
            Item {
                id,
                name: fields.name,
                description: fields.description,
                quantity: fields.quantity,
                category: fields.category,
                notes: fields.notes,
                is_fragile: fields.is_fragile,
                last_modified: fields.last_modified,
            },
        );
        drop(map);
        self.save().await?;
        Ok(id)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Item>, ServiceError> {
        let map = self.inner.read().await;
        Ok(map.get(&id).cloned())
    }

    async fn patch(
        &self,
        id: Uuid,
        patch: &ItemPatch,
        last_modified: i64,
    ) -> Result<(), ServiceError> {
        let mut map = self.inner.write().await;
        let existing = map.get_mut(&id).ok_or_else(|| ServiceError::not_found("item"))?;
        if let Some(v) = &patch.name {
            existing.name = v.clone();
        }
        if let Some(v) = &patch.description {
            existing.description = Some(v.clone());
        }
        if let Some(v) = patch.quantity {
            existing.quantity = v;
        }
        if let Some(v) = &patch.category {
            existing.category = Some(v.clone());
        }
        if let Some(v) = &patch.notes {
            existing.notes = Some(v.clone());
        }
        if let Some(v) = patch.is_fragile {
            existing.is_fragile = Some(v);
        }
        existing.last_modified = last_modified;
        drop(map);
        self.save().await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        let mut map = self.inner.write().await;
        let existed = map.remove(&id).is_some();
        drop(map);
        self.save().await?;
        Ok(existed)
    }

    async fn list_all(&self) -> Result<Vec<Item>, ServiceError> {
        Ok(Self::sort_desc(self.snapshot().await))
    }

    async fn list_by_category(&self, category: &str) -> Result<Vec<Item>, ServiceError> {
        let items = self
            .snapshot()
            .await
            .into_iter()
            .filter(|it| it.category.as_deref() == Some(category))
            .collect();
        Ok(Self::sort_desc(items))
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<Item>, ServiceError> {
        let mut items = Self::sort_desc(self.snapshot().await);
        items.truncate(limit);
        Ok(items)
    }

    async fn search_by_name(&self, query: &str, limit: usize) -> Result<Vec<Item>, ServiceError> {
        let tokens = search::tokenize(query);
        if tokens.is_empty() {
            return Ok(Vec::new());
        }
        Ok(search::rank(self.snapshot().await, &tokens, limit))
    }

    async fn distinct_categories(&self) -> Result<Vec<String>, ServiceError> {
        let map = self.inner.read().await;
        let mut set: std::collections::BTreeSet<String> = std::collections::BTreeSet::new();
        for it in map.values() {
            if let Some(c) = &it.category {
                if !c.is_empty() {
                    set.insert(c.clone());
                }
            }
        }
        Ok(set.into_iter().collect())
    }
}
