//! Request authentication and role-gated authorization.
//!
//! Access checks form an ordered pipeline: [`TokenService::verify`] turns an
//! `Authorization` header into an [`Identity`], then [`authorize`] looks the
//! identity up in the user store and admits only admins. Each stage returns a
//! `Result` and the pipeline stops at the first failure.

pub mod role;
pub mod token;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::database::{DocumentStore, StoreError};

pub use role::{authorize, is_admin, Allow, Role};
pub use token::{Claims, TokenService};

/// Decoded identity claim of a verified credential
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub email: String,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing credential")]
    MissingCredential,

    #[error("invalid credential: {0}")]
    InvalidCredential(String),

    #[error("no user record for {0}")]
    UnknownIdentity(String),

    #[error("{0} is not an admin")]
    Forbidden(String),

    #[error("token signing failed: {0}")]
    Signing(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Verify the credential, then authorize its identity as an admin.
///
/// The role is read from storage on every call, so a role change takes effect
/// on the next request made with an already issued token.
pub async fn require_admin(
    tokens: &TokenService,
    store: &dyn DocumentStore,
    header: Option<&str>,
) -> Result<Allow, AuthError> {
    let identity = tokens.verify(header)?;
    authorize(store, identity).await
}
