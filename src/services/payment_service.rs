use std::sync::Arc;

use mongodb::bson::{doc, Document};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::api::format::parse_object_id;
use crate::database::{DocumentStore, InsertOutcome, UpdateOutcome};
use crate::error::ApiError;
use crate::payments::{to_minor_units, PaymentIntent, PaymentProvider};
use crate::types::Collection;

/// Result of a successful booking payment confirmation
#[derive(Debug, Clone, Serialize)]
pub struct PaymentConfirmation {
    pub payment: InsertOutcome,
    pub booking: UpdateOutcome,
}

/// Payment intents and booking payment confirmation
#[derive(Clone)]
pub struct PaymentService {
    store: Arc<dyn DocumentStore>,
    provider: Arc<dyn PaymentProvider>,
    currency: String,
}

impl PaymentService {
    pub fn new(store: Arc<dyn DocumentStore>, provider: Arc<dyn PaymentProvider>, currency: impl Into<String>) -> Self {
        Self {
            store,
            provider,
            currency: currency.into(),
        }
    }

    /// Create a provider intent for a decimal price in the configured currency
    pub async fn create_intent(&self, price: f64) -> Result<PaymentIntent, ApiError> {
        let amount = to_minor_units(price)?;
        let intent = self.provider.create_intent(amount, &self.currency).await?;
        info!("Created payment intent {} for {} minor units", intent.id, amount);
        Ok(intent)
    }

    /// Record a payment for a booking and mark the booking paid.
    ///
    /// The booking must exist and belong to `payer` before anything is
    /// written. The payment insert
    /// and the booking update are two independent writes: if the second one
    /// fails the payment record stays behind and the error names its id.
    pub async fn confirm_booking_payment(
        &self,
        booking_id: &str,
        payer: &str,
        mut payment: Document,
    ) -> Result<PaymentConfirmation, ApiError> {
        let oid = parse_object_id(booking_id)?;

        let transaction_id = payment
            .get_str("transactionId")
            .map(str::to_string)
            .map_err(|_| ApiError::bad_request("transactionId is required"))?;

        let booking = self
            .store
            .find_one(Collection::Bookings, doc! { "_id": oid })
            .await?
            .ok_or_else(|| ApiError::not_found(format!("booking {} not found", booking_id)))?;

        if booking.get_str("buyer").ok() != Some(payer) {
            warn!("{} attempted to confirm payment for booking {} of another buyer", payer, booking_id);
            return Err(ApiError::forbidden("forbidden access"));
        }

        payment.insert("booking", booking_id);
        let recorded = self.store.insert_one(Collection::Payments, payment).await?;
        let payment_id = recorded.inserted_id.to_hex();

        let update = self
            .store
            .update_one(
                Collection::Bookings,
                doc! { "_id": oid },
                doc! { "paid": true, "transactionId": transaction_id.as_str() },
                false,
            )
            .await;

        match update {
            Ok(outcome) if outcome.matched_count == 1 => {
                info!("Booking {} paid with transaction {}", booking_id, transaction_id);
                Ok(PaymentConfirmation {
                    payment: recorded,
                    booking: outcome,
                })
            }
            Ok(_) => {
                error!(
                    "Partial payment confirmation: payment {} recorded but booking {} vanished before update",
                    payment_id, booking_id
                );
                Err(ApiError::UpstreamUnavailable {
                    message: format!("Payment recorded but booking {} was not updated", booking_id),
                    payment_id: Some(payment_id),
                })
            }
            Err(e) => {
                error!(
                    "Partial payment confirmation: payment {} recorded but booking {} update failed: {}",
                    payment_id, booking_id, e
                );
                Err(ApiError::UpstreamUnavailable {
                    message: format!("Payment recorded but booking {} was not updated", booking_id),
                    payment_id: Some(payment_id),
                })
            }
        }
    }
}
