use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ServiceError;

pub type Item = models::item::Model;

/// Create input as it arrives from a caller. Optional fields that are
/// omitted stay absent; the service does not re-trim optional strings, so
/// empty-string-means-absent is the caller's convention to uphold.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub is_fragile: Option<bool>,
}

/// Sparse update payload. A field left `None` is absent and must not touch
/// the stored value; `Some(0)`, `Some(false)`, and `Some("")` are explicit
/// values and must be written. Never collapse this into a defaulted struct
/// or zero/false updates get dropped.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ItemPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub is_fragile: Option<bool>,
}

/// A fully resolved record, minus the id the store will assign.
/// Produced by the service after validation and defaulting.
#[derive(Clone, Debug)]
pub struct ItemFields {
    pub name: String,
    pub description: Option<String>,
    pub quantity: i64,
    pub category: Option<String>,
    pub notes: Option<String>,
    pub is_fragile: Option<bool>,
    pub last_modified: i64,
}

/// Persistence contract for inventory records, abstracted over the
/// backing engine. Implementations must give per-record atomicity: a
/// `patch` or `delete` on one id is isolated from concurrent operations
/// on the same id.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Append a new record under a fresh, never-reused id.
    async fn insert(&self, fields: ItemFields) -> Result<Uuid, ServiceError>;

    async fn get(&self, id: Uuid) -> Result<Option<Item>, ServiceError>;

    /// Merge the present fields of `patch` plus `last_modified` into the
    /// record; `NotFound` if the id does not exist.
    async fn patch(
        &self,
        id: Uuid,
        patch: &ItemPatch,
        last_modified: i64,
    ) -> Result<(), ServiceError>;

    /// Remove the record, reporting whether it existed. A missing id is
    /// success, not an error.
    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError>;

    /// Full scan, descending by `last_modified`.
    async fn list_all(&self) -> Result<Vec<Item>, ServiceError>;

    /// Exact, case-sensitive category match, descending by `last_modified`.
    async fn list_by_category(&self, category: &str) -> Result<Vec<Item>, ServiceError>;

    async fn list_recent(&self, limit: usize) -> Result<Vec<Item>, ServiceError>;

    /// Token match against `name` only, best matches first, at most
    /// `limit` results.
    async fn search_by_name(&self, query: &str, limit: usize) -> Result<Vec<Item>, ServiceError>;

    /// Sorted, exact-string-deduplicated non-empty categories.
    async fn distinct_categories(&self) -> Result<Vec<String>, ServiceError>;
}
