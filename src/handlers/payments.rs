use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::middleware::{ApiResponse, ApiResult, Authenticated, Json};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PaymentIntentRequest {
    /// Decimal price in major units, e.g. 12.50
    pub price: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentResponse {
    pub client_secret: String,
}

/// POST /create-payment-intent - start a card payment for a price
pub async fn create_intent(
    State(state): State<AppState>,
    Authenticated(identity): Authenticated,
    Json(body): Json<PaymentIntentRequest>,
) -> ApiResult<PaymentIntentResponse> {
    let intent = state.payment_service().create_intent(body.price).await?;
    tracing::debug!("Payment intent {} issued to {}", intent.id, identity.email);
    Ok(ApiResponse::success(PaymentIntentResponse {
        client_secret: intent.client_secret,
    }))
}
