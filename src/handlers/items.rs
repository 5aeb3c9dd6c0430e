use axum::extract::State;
use mongodb::bson::{doc, Document};
use serde::Deserialize;
use serde_json::Value;

use crate::api::format::{api_value_to_document, document_to_api_value, documents_to_api_values};
use crate::database::{DeleteOutcome, InsertOutcome, UpdateOutcome};
use crate::middleware::{AdminOnly, ApiResponse, ApiResult, Json, Path};
use crate::state::AppState;
use crate::types::Collection;

#[derive(Debug, Deserialize)]
pub struct QuantityUpdate {
    pub quantity: i64,
}

/// GET /item - list the tools catalog
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Value>> {
    let items = state.resources(Collection::Items).list(Document::new()).await?;
    Ok(ApiResponse::success(documents_to_api_values(items)))
}

/// POST /item - add a catalog item (admin)
pub async fn create(
    State(state): State<AppState>,
    AdminOnly(admin): AdminOnly,
    Json(body): Json<Value>,
) -> ApiResult<InsertOutcome> {
    let document = api_value_to_document(body)?;
    let outcome = state.resources(Collection::Items).create(document).await?;
    tracing::info!("Item {} created by {}", outcome.inserted_id, admin.email);
    Ok(ApiResponse::created(outcome))
}

/// GET /item/:id - show a single item
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Value> {
    let item = state.resources(Collection::Items).get(&id).await?;
    Ok(ApiResponse::success(document_to_api_value(item)))
}

/// PUT /item/:id - set the stock quantity, creating the item if absent
pub async fn update_quantity(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<QuantityUpdate>,
) -> ApiResult<UpdateOutcome> {
    let outcome = state
        .resources(Collection::Items)
        .update_by_id(&id, doc! { "quantity": body.quantity }, true)
        .await?;
    Ok(ApiResponse::success(outcome))
}

/// DELETE /item/:id - remove a catalog item (admin)
pub async fn delete(
    State(state): State<AppState>,
    AdminOnly(admin): AdminOnly,
    Path(id): Path<String>,
) -> ApiResult<DeleteOutcome> {
    let outcome = state.resources(Collection::Items).delete_by_id(&id).await?;
    tracing::info!("Item {} deleted by {} ({} removed)", id, admin.email, outcome.deleted_count);
    Ok(ApiResponse::success(outcome))
}
