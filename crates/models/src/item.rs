use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::Expr;
use sea_orm::{
    entity::prelude::*, ActiveModelTrait, Condition, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;

/// A single inventory record. `last_modified` is epoch milliseconds and is
/// stamped by the service layer on every create and update.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "item")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub quantity: i64,
    pub category: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub is_fragile: Option<bool>,
    pub last_modified: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Item names must be non-empty after trimming. The store itself does not
/// enforce this; every service-level create path must.
pub fn validate_name(name: &str) -> Result<(), ModelError> {
    if name.trim().is_empty() {
        return Err(ModelError::Validation("name must not be empty".into()));
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub async fn create(
    db: &DatabaseConnection,
    name: &str,
    description: Option<&str>,
    quantity: i64,
    category: Option<&str>,
    notes: Option<&str>,
    is_fragile: Option<bool>,
    last_modified: i64,
) -> Result<Model, ModelError> {
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        description: Set(description.map(|s| s.to_string())),
        quantity: Set(quantity),
        category: Set(category.map(|s| s.to_string())),
        notes: Set(notes.map(|s| s.to_string())),
        is_fragile: Set(is_fragile),
        last_modified: Set(last_modified),
    };
    am.insert(db).await.map_err(|e| ModelError::Db(e.to_string()))
}

pub async fn get(db: &DatabaseConnection, id: Uuid) -> Result<Option<Model>, ModelError> {
    Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))
}

/// Merge the explicitly present fields into an existing record.
///
/// Absent (`None`) arguments leave the stored value untouched; `Some` with a
/// zero/false value is still an explicit overwrite. `last_modified` is always
/// written, even when every other argument is absent.
#[allow(clippy::too_many_arguments)]
pub async fn update_partial(
    db: &DatabaseConnection,
    id: Uuid,
    name: Option<&str>,
    description: Option<&str>,
    quantity: Option<i64>,
    category: Option<&str>,
    notes: Option<&str>,
    is_fragile: Option<bool>,
    last_modified: i64,
) -> Result<Model, ModelError> {
    let mut found: ActiveModel = Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))?
        .ok_or_else(|| ModelError::NotFound("item not found".into()))?
        .into();

    if let Some(v) = name {
        found.name = Set(v.to_string());
    }
    if let Some(v) = description {
        found.description = Set(Some(v.to_string()));
    }
    if let Some(v) = quantity {
        found.quantity = Set(v);
    }
    if let Some(v) = category {
        found.category = Set(Some(v.to_string()));
    }
    if let Some(v) = notes {
        found.notes = Set(Some(v.to_string()));
    }
    if let Some(v) = is_fragile {
        found.is_fragile = Set(Some(v));
    }
    found.last_modified = Set(last_modified);

    found.update(db).await.map_err(|e| ModelError::Db(e.to_string()))
}

/// Delete by id, reporting whether the record existed. Deleting a missing id
/// is not an error.
pub async fn delete(db: &DatabaseConnection, id: Uuid) -> Result<bool, ModelError> {
    let res = Entity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))?;
    Ok(res.rows_affected > 0)
}

pub async fn list_all(db: &DatabaseConnection) -> Result<Vec<Model>, ModelError> {
    Entity::find()
        .order_by_desc(Column::LastModified)
        .all(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))
}

/// Exact, case-sensitive category match via the category index.
pub async fn list_by_category(
    db: &DatabaseConnection,
    category: &str,
) -> Result<Vec<Model>, ModelError> {
    Entity::find()
        .filter(Column::Category.eq(category))
        .order_by_desc(Column::LastModified)
        .all(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))
}

pub async fn list_recent(db: &DatabaseConnection, limit: u64) -> Result<Vec<Model>, ModelError> {
    Entity::find()
        .order_by_desc(Column::LastModified)
        .limit(limit)
        .all(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))
}

/// Candidate rows for name search: any token appearing in `name`,
/// case-insensitively. Tokens are alphanumeric (the tokenizer strips
/// punctuation), so no LIKE escaping is needed. Ranking happens in the
/// service layer.
pub async fn search_candidates(
    db: &DatabaseConnection,
    tokens: &[String],
) -> Result<Vec<Model>, ModelError> {
    let mut cond = Condition::any();
    for t in tokens {
        cond = cond.add(Expr::col(Column::Name).ilike(format!("%{t}%")));
    }
    Entity::find()
        .filter(cond)
        .order_by_desc(Column::LastModified)
        .all(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))
}

/// Distinct non-empty categories, sorted lexicographically. Exact-string
/// dedup only; "Tools" and "tools" stay separate.
pub async fn distinct_categories(db: &DatabaseConnection) -> Result<Vec<String>, ModelError> {
    let items = Entity::find()
        .all(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))?;
    let mut set: std::collections::BTreeSet<String> = std::collections::BTreeSet::new();
    for it in items {
        if let Some(c) = it.category {
            if !c.is_empty() {
                set.insert(c);
            }
        }
    }
    Ok(set.into_iter().collect())
}
