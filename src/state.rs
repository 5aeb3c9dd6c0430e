use std::sync::Arc;

use crate::auth::TokenService;
use crate::database::DocumentStore;
use crate::payments::PaymentProvider;
use crate::services::{PaymentService, ResourceService};
use crate::types::Collection;

/// Long-lived collaborators shared by every request.
///
/// Built once at startup and handed to the router; handlers receive it
/// through `State` instead of reaching for globals.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub tokens: Arc<TokenService>,
    pub payments: Arc<dyn PaymentProvider>,
    pub currency: String,
}

impl AppState {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        tokens: TokenService,
        payments: Arc<dyn PaymentProvider>,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            store,
            tokens: Arc::new(tokens),
            payments,
            currency: currency.into(),
        }
    }

    pub fn resources(&self, collection: Collection) -> ResourceService {
        ResourceService::new(self.store.clone(), collection)
    }

    pub fn payment_service(&self) -> PaymentService {
        PaymentService::new(self.store.clone(), self.payments.clone(), self.currency.clone())
    }
}
