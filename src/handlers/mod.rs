// handlers/mod.rs - one module per storefront resource
//
// Access tiers are expressed by extractor parameters rather than by module:
// no extractor = public, `Authenticated` = valid credential required,
// `AdminOnly` = valid credential and stored admin role required.

pub mod bookings;
pub mod items;
pub mod payments;
pub mod products;
pub mod profiles;
pub mod reviews;
pub mod root;
pub mod users;

use mongodb::bson::{doc, Document};
use serde::Deserialize;

/// Optional `?email=` filter shared by the review and profile listings
#[derive(Debug, Default, Deserialize)]
pub struct EmailQuery {
    pub email: Option<String>,
}

impl EmailQuery {
    pub fn filter(&self) -> Document {
        match &self.email {
            Some(email) => doc! { "email": email.as_str() },
            None => Document::new(),
        }
    }
}
