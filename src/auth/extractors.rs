use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use super::{repo_types::User, services::authenticate};
use crate::{error::ApiError, state::AppState};

/// The authenticated caller, resolved from the `Authorization: Bearer` header.
///
/// This is the only source of "current user" for handlers.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

impl AuthUser {
    pub fn id(&self) -> i64 {
        self.0.id
    }

    pub fn into_inner(self) -> User {
        self.0
    }
}

/// Pulls the token out of a `Bearer <token>` header value. The scheme is case-insensitive.
pub(crate) fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    Some(token.trim())
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(bearer_token);

        let user = authenticate(state.users.as_ref(), &state.tokens, token).await?;
        Ok(AuthUser(user))
    }
}
