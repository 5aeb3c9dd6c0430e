pub mod payment_service;
pub mod resource_service;

pub use payment_service::{PaymentConfirmation, PaymentService};
pub use resource_service::ResourceService;
