use serde::{Deserialize, Serialize};

/// JWT payload. `sub` is the user's username, `exp`/`iat` are unix seconds.
///
/// `sub` and `iat` are optional on decode so that a token lacking a subject
/// can be reported as such instead of as a parse failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
}
