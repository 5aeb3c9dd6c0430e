use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

use crate::auth::{self, Identity};
use crate::error::ApiError;
use crate::state::AppState;

/// Caller holding a valid, unexpired credential.
///
/// Extracting this runs the token verifier; handlers that take it as a
/// parameter are unreachable without a credential.
#[derive(Clone, Debug)]
pub struct Authenticated(pub Identity);

/// Caller whose credential verified and whose stored role is `admin`.
///
/// Runs verify then authorize, stopping at the first failure. The role is
/// looked up on every request.
#[derive(Clone, Debug)]
pub struct AdminOnly(pub Identity);

/// Raw `Authorization` value. A header that is present but not valid UTF-8
/// still counts as a (malformed) credential.
pub fn authorization_header(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .map(|value| value.to_str().unwrap_or_default())
}

#[async_trait]
impl<S> FromRequestParts<S> for Authenticated
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        let identity = state.tokens.verify(authorization_header(&parts.headers)).map_err(|e| {
            tracing::debug!("Credential rejected: {}", e);
            ApiError::from(e)
        })?;
        Ok(Authenticated(identity))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AdminOnly
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        let allow = auth::require_admin(&state.tokens, state.store.as_ref(), authorization_header(&parts.headers)).await?;
        Ok(AdminOnly(allow.identity))
    }
}
