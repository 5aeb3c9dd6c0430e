use axum::extract::State;
use mongodb::bson::{doc, Document};
use serde::Serialize;
use serde_json::{json, Value};

use crate::api::format::{api_value_to_document, documents_to_api_values};
use crate::auth::{self, Role};
use crate::database::UpdateOutcome;
use crate::error::ApiError;
use crate::middleware::{AdminOnly, ApiResponse, ApiResult, Json, Path};
use crate::state::AppState;
use crate::types::Collection;

/// Fields a user cannot set on their own record
const PROTECTED_USER_FIELDS: &[&str] = &["_id", "email", "role"];

#[derive(Debug, Serialize)]
pub struct UserUpsertResponse {
    pub result: UpdateOutcome,
    pub token: String,
}

/// GET /user - list all users (admin)
pub async fn list(State(state): State<AppState>, AdminOnly(_admin): AdminOnly) -> ApiResult<Vec<Value>> {
    let users = state.resources(Collection::Users).list(Document::new()).await?;
    Ok(ApiResponse::success(documents_to_api_values(users)))
}

/// PUT /user/:email - save the user's profile fields and issue a credential
///
/// Upserts by email so the first sign-in creates the record. `role` in the
/// body is ignored; roles only change through `PUT /user/admin/:email`.
pub async fn upsert(
    State(state): State<AppState>,
    Path(email): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult<UserUpsertResponse> {
    let mut patch = api_value_to_document(body)?;
    for field in PROTECTED_USER_FIELDS {
        patch.remove(*field);
    }
    patch.insert("email", email.as_str());

    let result = state
        .resources(Collection::Users)
        .update(doc! { "email": email.as_str() }, patch, true)
        .await?;
    let token = state.tokens.issue(&email)?;

    Ok(ApiResponse::success(UserUpsertResponse { result, token }))
}

/// PUT /user/admin/:email - grant the admin role (admin)
pub async fn make_admin(
    State(state): State<AppState>,
    AdminOnly(admin): AdminOnly,
    Path(email): Path<String>,
) -> ApiResult<UpdateOutcome> {
    let outcome = state
        .resources(Collection::Users)
        .update(doc! { "email": email.as_str() }, doc! { "role": Role::Admin.as_str() }, false)
        .await?;

    if outcome.matched_count == 0 {
        return Err(ApiError::not_found(format!("user {} not found", email)));
    }

    tracing::info!("{} granted admin role to {}", admin.email, email);
    Ok(ApiResponse::success(outcome))
}

/// GET /admin/:email - whether the user holds the admin role
pub async fn admin_status(State(state): State<AppState>, Path(email): Path<String>) -> ApiResult<Value> {
    let admin = auth::is_admin(state.store.as_ref(), &email).await?;
    Ok(ApiResponse::success(json!({ "admin": admin })))
}
