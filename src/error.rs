//! API-facing error type and its HTTP mapping.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, warn};

use crate::auth::jwt::TokenError;

/// Why a request failed authentication. Kept for logs only; clients see one 401.
#[derive(Debug, thiserror::Error)]
pub enum AuthFailure {
    #[error("missing bearer token")]
    MissingToken,
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error("token subject does not resolve to a user")]
    UnknownSubject,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Username already taken")]
    DuplicateUsername,

    #[error("Email already registered")]
    DuplicateEmail,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Could not validate credentials")]
    Unauthenticated(#[source] AuthFailure),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl From<AuthFailure> for ApiError {
    fn from(reason: AuthFailure) -> Self {
        ApiError::Unauthenticated(reason)
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::DuplicateUsername | ApiError::DuplicateEmail => StatusCode::CONFLICT,
            ApiError::InvalidCredentials | ApiError::Unauthenticated(_) => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            ApiError::Internal(e) => error!(error = ?e, "internal error"),
            ApiError::Unauthenticated(reason) => warn!(reason = %reason, "unauthenticated"),
            _ => {}
        }

        let body = Json(ErrorBody {
            detail: self.to_string(),
        });
        if matches!(self, ApiError::Unauthenticated(_)) {
            return (status, [(header::WWW_AUTHENTICATE, "Bearer")], body).into_response();
        }
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthenticated_hides_reason() {
        let expired = ApiError::from(AuthFailure::Token(TokenError::Expired));
        let unknown = ApiError::from(AuthFailure::UnknownSubject);
        assert_eq!(expired.to_string(), unknown.to_string());
        assert_eq!(expired.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn unauthenticated_response_carries_challenge() {
        let res = ApiError::from(AuthFailure::MissingToken).into_response();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(res.headers()[header::WWW_AUTHENTICATE], "Bearer");
    }

    #[test]
    fn status_mapping() {
        assert_eq!(ApiError::DuplicateEmail.status_code(), StatusCode::CONFLICT);
        assert_eq!(ApiError::NotFound("Task").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Internal(anyhow::anyhow!("db down")).to_string(),
            "Internal server error"
        );
    }
}
