pub mod stripe;

use async_trait::async_trait;
use thiserror::Error;

pub use stripe::StripeClient;

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("payment provider request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("payment provider rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },
}

/// A created payment intent as returned to clients
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentIntent {
    pub id: String,
    pub client_secret: String,
}

/// External payment provider
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Create an intent for `amount` minor units of `currency`
    async fn create_intent(&self, amount: i64, currency: &str) -> Result<PaymentIntent, PaymentError>;
}

/// Convert a decimal price into minor units (cents)
pub fn to_minor_units(price: f64) -> Result<i64, PaymentError> {
    if !price.is_finite() || price <= 0.0 {
        return Err(PaymentError::InvalidAmount(format!("price must be a positive number, got {}", price)));
    }
    let amount = (price * 100.0).round();
    if amount < 1.0 || amount > i64::MAX as f64 {
        return Err(PaymentError::InvalidAmount(format!("price {} is out of range", price)));
    }
    Ok(amount as i64)
}
