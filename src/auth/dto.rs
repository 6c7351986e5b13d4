use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::repo_types::User;

/// Request body for signup. `email` is optional for username-only clients.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    pub password: String,
}

/// Request body for login. Accepts `identifier`, `username` or `email`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(alias = "username", alias = "email")]
    pub identifier: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub username: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String, username: String) -> Self {
        Self {
            access_token,
            token_type: "bearer",
            username,
        }
    }
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: i64,
    pub username: String,
    pub email: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<User> for PublicUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            created_at: u.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_user_never_carries_hash() {
        let user = User {
            id: 1,
            username: "alice".into(),
            email: Some("alice@example.com".into()),
            password_hash: "$argon2id$v=19$secret".into(),
            created_at: OffsetDateTime::UNIX_EPOCH,
        };
        let json = serde_json::to_value(PublicUser::from(user)).unwrap();
        let obj = json.as_object().unwrap();
        assert!(!obj.contains_key("password"));
        assert!(!obj.contains_key("password_hash"));
        assert!(!json.to_string().contains("argon2"));
        assert_eq!(obj["id"], 1);
    }

    #[test]
    fn login_accepts_any_identifier_key() {
        for key in ["identifier", "username", "email"] {
            let body = format!(r#"{{"{key}": "alice", "password": "pw"}}"#);
            let req: LoginRequest = serde_json::from_str(&body).unwrap();
            assert_eq!(req.identifier, "alice");
        }
    }
}
