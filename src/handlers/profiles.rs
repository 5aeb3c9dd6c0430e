use axum::extract::State;
use mongodb::bson;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::format::{api_value_to_document, documents_to_api_values};
use crate::database::{InsertOutcome, StoreError, UpdateOutcome};
use crate::middleware::{ApiResponse, ApiResult, Json, Path, Query};
use crate::state::AppState;
use crate::types::Collection;

use super::EmailQuery;

/// Editable profile fields; absent fields are left untouched
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub education: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub img: Option<String>,
}

/// GET /myprofile - list profiles, optionally by email
pub async fn list(State(state): State<AppState>, Query(query): Query<EmailQuery>) -> ApiResult<Vec<Value>> {
    let profiles = state.resources(Collection::Profiles).list(query.filter()).await?;
    Ok(ApiResponse::success(documents_to_api_values(profiles)))
}

/// POST /myprofile - create a profile
pub async fn create(State(state): State<AppState>, Json(body): Json<Value>) -> ApiResult<InsertOutcome> {
    let document = api_value_to_document(body)?;
    let outcome = state.resources(Collection::Profiles).create(document).await?;
    Ok(ApiResponse::created(outcome))
}

/// PUT /myprofile/:id - save profile fields, creating the profile if absent
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<ProfileUpdate>,
) -> ApiResult<UpdateOutcome> {
    let patch = bson::to_document(&body).map_err(StoreError::from)?;
    let outcome = state
        .resources(Collection::Profiles)
        .update_by_id(&id, patch, true)
        .await?;
    Ok(ApiResponse::success(outcome))
}
