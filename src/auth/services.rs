use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};

use super::{
    dto::{LoginRequest, SignupRequest},
    jwt::TokenService,
    password::{hash_password_blocking, verify_dummy_blocking, verify_password_blocking},
    repo::UserRepo,
    repo_types::{CreateUserError, NewUser, User},
};
use crate::error::{ApiError, ApiResult, AuthFailure};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub async fn signup(users: &dyn UserRepo, req: SignupRequest) -> ApiResult<User> {
    let username = req.username.trim().to_string();
    if username.is_empty() {
        return Err(ApiError::BadRequest("username must not be empty".into()));
    }
    // Login routes identifiers containing '@' to the email lookup.
    if username.contains('@') {
        return Err(ApiError::BadRequest("username must not contain '@'".into()));
    }
    let email = match req.email.as_deref().map(normalize_email) {
        Some(e) if !is_valid_email(&e) => {
            return Err(ApiError::BadRequest("Invalid email".into()));
        }
        other => other,
    };
    if req.password.is_empty() {
        return Err(ApiError::BadRequest("password must not be empty".into()));
    }

    if let Some(e) = &email {
        if users.find_by_email(e).await?.is_some() {
            warn!("signup rejected: email taken");
            return Err(ApiError::DuplicateEmail);
        }
    }
    if users.find_by_username(&username).await?.is_some() {
        warn!(%username, "signup rejected: username taken");
        return Err(ApiError::DuplicateUsername);
    }

    let password_hash = hash_password_blocking(req.password).await?;
    let user = users
        .create(NewUser {
            username,
            email,
            password_hash,
        })
        .await
        .map_err(|e| match e {
            CreateUserError::DuplicateUsername => ApiError::DuplicateUsername,
            CreateUserError::DuplicateEmail => ApiError::DuplicateEmail,
            CreateUserError::Other(e) => ApiError::Internal(e),
        })?;

    info!(user_id = user.id, username = %user.username, "user registered");
    Ok(user)
}

/// Returns a fresh token and the user it was issued for.
///
/// Unknown identifier and wrong password both yield `InvalidCredentials`
/// after exactly one argon2 verification.
pub async fn login(
    users: &dyn UserRepo,
    tokens: &TokenService,
    req: LoginRequest,
) -> ApiResult<(String, User)> {
    let identifier = req.identifier.trim();
    let found = if identifier.contains('@') {
        users.find_by_email(&normalize_email(identifier)).await?
    } else {
        users.find_by_username(identifier).await?
    };

    let Some(user) = found else {
        verify_dummy_blocking(req.password).await?;
        warn!("login failed");
        return Err(ApiError::InvalidCredentials);
    };

    if !verify_password_blocking(req.password, user.password_hash.clone()).await? {
        warn!("login failed");
        return Err(ApiError::InvalidCredentials);
    }

    let token = tokens
        .issue(&user.username)
        .map_err(|e| ApiError::Internal(e.into()))?;
    info!(user_id = user.id, "user logged in");
    Ok((token, user))
}

/// Resolves a raw bearer token to the user it was issued for.
pub async fn authenticate(
    users: &dyn UserRepo,
    tokens: &TokenService,
    raw_token: Option<&str>,
) -> ApiResult<User> {
    let token = raw_token
        .filter(|t| !t.is_empty())
        .ok_or(AuthFailure::MissingToken)?;
    let subject = tokens.verify(token).map_err(AuthFailure::from)?;
    users
        .find_by_username(&subject)
        .await?
        .ok_or_else(|| AuthFailure::UnknownSubject.into())
}
