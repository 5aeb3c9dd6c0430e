use mongodb::bson::{doc, Document};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{AuthError, Identity};
use crate::database::{DocumentStore, StoreError};
use crate::types::Collection;

/// Stored authorization attribute of a user record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    None,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::None => "none",
            Role::Admin => "admin",
        }
    }

    /// Absent or unrecognised values read as `None`
    pub fn of(user: &Document) -> Self {
        match user.get_str("role") {
            Ok("admin") => Role::Admin,
            _ => Role::None,
        }
    }
}

/// Proof that an identity passed the admin check for the current request
#[derive(Debug, Clone)]
pub struct Allow {
    pub identity: Identity,
}

/// Admit `identity` only if its stored role is `admin`
pub async fn authorize(store: &dyn DocumentStore, identity: Identity) -> Result<Allow, AuthError> {
    let user = store
        .find_one(Collection::Users, doc! { "email": identity.email.as_str() })
        .await?
        .ok_or_else(|| {
            warn!("Authorization failed: no user record for '{}'", identity.email);
            AuthError::UnknownIdentity(identity.email.clone())
        })?;

    if Role::of(&user) != Role::Admin {
        warn!("Authorization failed: '{}' is not an admin", identity.email);
        return Err(AuthError::Forbidden(identity.email));
    }

    debug!("Authorized admin '{}'", identity.email);
    Ok(Allow { identity })
}

/// Whether `email` names an admin; unknown emails are not admins
pub async fn is_admin(store: &dyn DocumentStore, email: &str) -> Result<bool, StoreError> {
    let user = store.find_one(Collection::Users, doc! { "email": email }).await?;
    Ok(user.map(|u| Role::of(&u) == Role::Admin).unwrap_or(false))
}
