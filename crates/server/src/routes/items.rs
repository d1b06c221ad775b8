use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use service::item::{CreateItemInput, Item, ItemPatch};
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::JsonApiError;
use crate::state::ServerState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct IdBody {
    pub id: Uuid,
}

/// List all items, optionally filtered by exact category.
pub async fn list(
    State(state): State<ServerState>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Vec<Item>>, JsonApiError> {
    let items = state.items.list(q.category.as_deref()).await?;
    Ok(Json(items))
}

pub async fn recent(
    State(state): State<ServerState>,
    Query(q): Query<RecentQuery>,
) -> Result<Json<Vec<Item>>, JsonApiError> {
    let items = state.items.recent(q.limit).await?;
    Ok(Json(items))
}

pub async fn search(
    State(state): State<ServerState>,
    Query(q): Query<SearchQuery>,
) -> Result<Json<Vec<Item>>, JsonApiError> {
    let items = state.items.search(&q.q).await?;
    Ok(Json(items))
}

pub async fn categories(
    State(state): State<ServerState>,
) -> Result<Json<Vec<String>>, JsonApiError> {
    let cats = state.items.categories().await?;
    Ok(Json(cats))
}

pub async fn get_item(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Item>, StatusCode> {
    match state.items.get_by_id(id).await {
        Ok(Some(item)) => Ok(Json(item)),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            error!(err = %e, "get item failed");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Json(input): Json<CreateItemInput>,
) -> Result<Json<IdBody>, JsonApiError> {
    let id = state.items.create(input).await?;
    info!(%id, "item created");
    Ok(Json(IdBody { id }))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<ItemPatch>,
) -> Result<Json<IdBody>, JsonApiError> {
    let id = state.items.update(id, patch).await?;
    info!(%id, "item updated");
    Ok(Json(IdBody { id }))
}

/// Unconditional delete: 204 whether or not the id existed.
pub async fn remove(State(state): State<ServerState>, Path(id): Path<Uuid>) -> StatusCode {
    match state.items.remove(id).await {
        Ok(()) => StatusCode::NO_CONTENT,
        Err(e) => {
            error!(err = %e, "delete item failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
