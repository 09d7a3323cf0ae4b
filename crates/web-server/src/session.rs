use crate::{AppState, error::AppError};
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use chrono::{Duration, Utc};
use configuration::Auth;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// The claims carried by a session token: the account it belongs to and the
/// issue/expiry instants. Tokens are stateless; logout is client-side
/// disposal and expiry is enforced on every verification.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: Uuid,
    iat: i64,
    exp: i64,
}

/// Issues and verifies HS256 session tokens.
#[derive(Clone)]
pub struct SessionSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_minutes: i64,
}

impl SessionSigner {
    pub fn new(config: &Auth) -> Self {
        Self {
            encoding: EncodingKey::from_secret(config.token_secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.token_secret.as_bytes()),
            ttl_minutes: config.token_ttl_minutes,
        }
    }

    /// Issues a fresh token for an authenticated account.
    pub fn issue(&self, account_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: account_id,
            iat: now.timestamp(),
            exp: (now + Duration::minutes(self.ttl_minutes)).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AppError::Session(e.to_string()))
    }

    /// Verifies a token and returns the account it was issued to.
    ///
    /// Tampered, mis-signed, and expired tokens all collapse into
    /// `Unauthenticated`; the caller learns nothing about which check failed.
    pub fn verify(&self, token: &str) -> Result<Uuid, AppError> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims.sub)
            .map_err(|_| AppError::Unauthenticated)
    }
}

/// The authenticated session, resolved from the `Authorization` header.
///
/// Adding this extractor to a handler is what gates the route: requests
/// without a valid bearer token are rejected before the handler body runs.
pub struct Session {
    pub account_id: Uuid,
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for Session {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let authorization = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(AppError::Unauthenticated)?;
        let token = authorization
            .strip_prefix("Bearer ")
            .ok_or(AppError::Unauthenticated)?;
        let account_id = state.sessions.verify(token)?;
        Ok(Session { account_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer_with(secret: &str, ttl_minutes: i64) -> SessionSigner {
        SessionSigner::new(&Auth {
            token_secret: secret.to_string(),
            token_ttl_minutes: ttl_minutes,
        })
    }

    #[test]
    fn issue_then_verify_round_trips() {
        let signer = signer_with("top-secret", 60);
        let account_id = Uuid::new_v4();
        let token = signer.issue(account_id).unwrap();
        assert_eq!(signer.verify(&token).unwrap(), account_id);
    }

    #[test]
    fn tokens_from_another_secret_are_rejected() {
        let account_id = Uuid::new_v4();
        let token = signer_with("secret-a", 60).issue(account_id).unwrap();
        assert!(signer_with("secret-b", 60).verify(&token).is_err());
    }

    #[test]
    fn expired_tokens_are_rejected() {
        // A negative TTL puts the expiry well past the default leeway.
        let signer = signer_with("top-secret", -10);
        let token = signer.issue(Uuid::new_v4()).unwrap();
        assert!(signer.verify(&token).is_err());
    }

    #[test]
    fn garbage_tokens_are_rejected() {
        let signer = signer_with("top-secret", 60);
        assert!(signer.verify("not.a.token").is_err());
    }
}
