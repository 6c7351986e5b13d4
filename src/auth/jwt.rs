use std::sync::Arc;

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use time::Duration;
use tracing::debug;

use crate::{
    auth::claims::Claims,
    clock::{Clock, SystemClock},
    config::JwtConfig,
};

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("token malformed or signature invalid")]
    Malformed,
    #[error("token has no subject")]
    MissingSubject,
    #[error("token expiry is out of range")]
    ExpiryOutOfRange,
    #[error("token encoding failed: {0}")]
    Encode(#[source] jsonwebtoken::errors::Error),
}

/// Issues and verifies HS256 bearer tokens with a fixed TTL.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl TokenService {
    pub fn new(cfg: &JwtConfig) -> Self {
        Self::with_clock(cfg, Arc::new(SystemClock))
    }

    pub fn with_clock(cfg: &JwtConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            ttl: Duration::seconds(cfg.ttl_minutes.saturating_mul(60)),
            clock,
        }
    }

    pub fn issue(&self, subject: &str) -> Result<String, TokenError> {
        let now = self.clock.now();
        let exp = now
            .checked_add(self.ttl)
            .ok_or(TokenError::ExpiryOutOfRange)?;
        let claims = Claims {
            sub: Some(subject.to_owned()),
            exp: exp.unix_timestamp(),
            iat: Some(now.unix_timestamp()),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(TokenError::Encode)?;
        debug!(subject, "jwt signed");
        Ok(token)
    }

    /// Checks signature and expiry, returning the subject claim.
    pub fn verify(&self, token: &str) -> Result<String, TokenError> {
        // Expiry is checked against the injected clock below, not by the library.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        let data = decode::<Claims>(token, &self.decoding, &validation)
            .map_err(|_| TokenError::Malformed)?;
        let claims = data.claims;

        if self.clock.now().unix_timestamp() > claims.exp {
            return Err(TokenError::Expired);
        }

        match claims.sub {
            Some(sub) if !sub.is_empty() => {
                debug!(subject = %sub, "jwt verified");
                Ok(sub)
            }
            _ => Err(TokenError::MissingSubject),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use time::OffsetDateTime;

    struct ManualClock(Mutex<OffsetDateTime>);

    impl ManualClock {
        fn at(t: OffsetDateTime) -> Arc<Self> {
            Arc::new(Self(Mutex::new(t)))
        }
        fn advance(&self, d: Duration) {
            let mut now = self.0.lock().unwrap();
            *now += d;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> OffsetDateTime {
            *self.0.lock().unwrap()
        }
    }

    fn jwt_cfg(secret: &str) -> JwtConfig {
        JwtConfig {
            secret: secret.into(),
            ttl_minutes: 60 * 24,
        }
    }

    #[test]
    fn issue_then_verify_returns_subject() {
        let tokens = TokenService::new(&jwt_cfg("dev-secret"));
        let token = tokens.issue("alice").expect("issue");
        assert_eq!(tokens.verify(&token).expect("verify"), "alice");
    }

    #[test]
    fn verify_just_before_and_after_ttl() {
        let clock = ManualClock::at(OffsetDateTime::now_utc());
        let tokens = TokenService::with_clock(&jwt_cfg("dev-secret"), clock.clone());
        let token = tokens.issue("alice").expect("issue");

        clock.advance(Duration::hours(24));
        assert_eq!(tokens.verify(&token).expect("still valid at exp"), "alice");

        clock.advance(Duration::seconds(1));
        assert!(matches!(tokens.verify(&token), Err(TokenError::Expired)));
    }

    #[test]
    fn oversized_ttl_fails_instead_of_panicking() {
        let tokens = TokenService::new(&JwtConfig {
            secret: "dev-secret".into(),
            ttl_minutes: 10_000_000_000,
        });
        assert!(matches!(
            tokens.issue("alice"),
            Err(TokenError::ExpiryOutOfRange)
        ));
    }

    #[test]
    fn wrong_secret_is_malformed() {
        let token = TokenService::new(&jwt_cfg("secret-a")).issue("alice").unwrap();
        let other = TokenService::new(&jwt_cfg("secret-b"));
        assert!(matches!(other.verify(&token), Err(TokenError::Malformed)));
    }

    #[test]
    fn garbage_and_tampered_tokens_are_malformed() {
        let tokens = TokenService::new(&jwt_cfg("dev-secret"));
        assert!(matches!(tokens.verify("not.a.jwt"), Err(TokenError::Malformed)));
        assert!(matches!(tokens.verify(""), Err(TokenError::Malformed)));

        let mut token = tokens.issue("alice").unwrap();
        token.push('x');
        assert!(matches!(tokens.verify(&token), Err(TokenError::Malformed)));
    }

    #[test]
    fn token_without_subject_is_rejected() {
        let config = jwt_cfg("dev-secret");
        let tokens = TokenService::new(&config);
        let claims = Claims {
            sub: None,
            exp: OffsetDateTime::now_utc().unix_timestamp() + 600,
            iat: None,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap();
        assert!(matches!(tokens.verify(&token), Err(TokenError::MissingSubject)));
    }

    #[test]
    fn token_without_exp_is_malformed() {
        let config = jwt_cfg("dev-secret");
        let tokens = TokenService::new(&config);
        let token = encode(
            &Header::new(Algorithm::HS256),
            &serde_json::json!({ "sub": "alice" }),
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap();
        assert!(matches!(tokens.verify(&token), Err(TokenError::Malformed)));
    }

    #[test]
    fn accepts_minimal_sub_exp_token() {
        let config = jwt_cfg("dev-secret");
        let tokens = TokenService::new(&config);
        let token = encode(
            &Header::new(Algorithm::HS256),
            &serde_json::json!({
                "sub": "bob",
                "exp": OffsetDateTime::now_utc().unix_timestamp() + 60,
            }),
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap();
        assert_eq!(tokens.verify(&token).unwrap(), "bob");
    }
}
