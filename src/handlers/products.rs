use axum::extract::State;
use mongodb::bson::{doc, Document};
use serde_json::Value;

use crate::api::format::{api_value_to_document, documents_to_api_values};
use crate::database::{DeleteOutcome, InsertOutcome};
use crate::middleware::{AdminOnly, ApiResponse, ApiResult, Json, Path};
use crate::state::AppState;
use crate::types::Collection;

/// GET /product - list products (admin)
pub async fn list(State(state): State<AppState>, AdminOnly(_admin): AdminOnly) -> ApiResult<Vec<Value>> {
    let products = state.resources(Collection::Products).list(Document::new()).await?;
    Ok(ApiResponse::success(documents_to_api_values(products)))
}

/// POST /product - add a product (admin)
pub async fn create(
    State(state): State<AppState>,
    AdminOnly(_admin): AdminOnly,
    Json(body): Json<Value>,
) -> ApiResult<InsertOutcome> {
    let document = api_value_to_document(body)?;
    let outcome = state.resources(Collection::Products).create(document).await?;
    Ok(ApiResponse::created(outcome))
}

/// DELETE /product/:email - remove the first product keyed by email (admin)
pub async fn delete(
    State(state): State<AppState>,
    AdminOnly(admin): AdminOnly,
    Path(email): Path<String>,
) -> ApiResult<DeleteOutcome> {
    let outcome = state
        .resources(Collection::Products)
        .delete(doc! { "email": email.as_str() })
        .await?;
    tracing::info!("Product {} deleted by {} ({} removed)", email, admin.email, outcome.deleted_count);
    Ok(ApiResponse::success(outcome))
}
