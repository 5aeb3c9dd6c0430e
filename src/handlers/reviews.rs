use axum::extract::State;
use serde_json::Value;

use crate::api::format::{api_value_to_document, documents_to_api_values};
use crate::database::InsertOutcome;
use crate::middleware::{ApiResponse, ApiResult, Json, Query};
use crate::state::AppState;
use crate::types::Collection;

use super::EmailQuery;

/// GET /myreview - list reviews, optionally by author email
pub async fn list(State(state): State<AppState>, Query(query): Query<EmailQuery>) -> ApiResult<Vec<Value>> {
    let reviews = state.resources(Collection::Reviews).list(query.filter()).await?;
    Ok(ApiResponse::success(documents_to_api_values(reviews)))
}

/// POST /myreview - post a review
pub async fn create(State(state): State<AppState>, Json(body): Json<Value>) -> ApiResult<InsertOutcome> {
    let document = api_value_to_document(body)?;
    let outcome = state.resources(Collection::Reviews).create(document).await?;
    Ok(ApiResponse::created(outcome))
}
