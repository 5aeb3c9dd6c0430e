use axum::extract::State;
use mongodb::bson::{doc, Document};
use serde::Deserialize;
use serde_json::Value;

use crate::api::format::{api_value_to_document, document_to_api_value, documents_to_api_values};
use crate::auth;
use crate::database::InsertOutcome;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, Authenticated, Json, Path, Query};
use crate::services::PaymentConfirmation;
use crate::state::AppState;
use crate::types::Collection;

#[derive(Debug, Deserialize)]
pub struct BookingQuery {
    /// Restrict to one buyer's bookings; must name the caller
    pub buyer: Option<String>,
}

/// GET /booking - list bookings
///
/// `?buyer=` must match the caller. Without it an admin sees every booking
/// and anyone else sees only their own.
pub async fn list(
    State(state): State<AppState>,
    Authenticated(identity): Authenticated,
    Query(query): Query<BookingQuery>,
) -> ApiResult<Vec<Value>> {
    let filter = match query.buyer {
        Some(buyer) if buyer != identity.email => {
            tracing::warn!("{} attempted to list bookings of {}", identity.email, buyer);
            return Err(ApiError::forbidden("forbidden access"));
        }
        Some(buyer) => doc! { "buyer": buyer },
        None if auth::is_admin(state.store.as_ref(), &identity.email).await? => Document::new(),
        None => doc! { "buyer": identity.email.as_str() },
    };

    let bookings = state.resources(Collection::Bookings).list(filter).await?;
    Ok(ApiResponse::success(documents_to_api_values(bookings)))
}

/// POST /booking - place a booking
pub async fn create(State(state): State<AppState>, Json(body): Json<Value>) -> ApiResult<InsertOutcome> {
    let document = api_value_to_document(body)?;
    let outcome = state.resources(Collection::Bookings).create(document).await?;
    Ok(ApiResponse::created(outcome))
}

/// GET /booking/:id - show a single booking
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Value> {
    let booking = state.resources(Collection::Bookings).get(&id).await?;
    Ok(ApiResponse::success(document_to_api_value(booking)))
}

/// PATCH /booking/:id - confirm payment for the caller's own booking
///
/// Body carries the payment details including `transactionId`.
pub async fn confirm_payment(
    State(state): State<AppState>,
    Authenticated(identity): Authenticated,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult<PaymentConfirmation> {
    let payment = api_value_to_document(body)?;
    tracing::debug!("{} confirming payment for booking {}", identity.email, id);
    let confirmation = state
        .payment_service()
        .confirm_booking_payment(&id, &identity.email, payment)
        .await?;
    Ok(ApiResponse::success(confirmation))
}
