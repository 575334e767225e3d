//! Bearer token verification.
//!
//! Tokens are issued by the identity service (HS256, claims `{ id, role,
//! exp }`). This server only verifies them and turns the claims into a
//! [`Requester`].
//!
//! ```text
//! Authorization: Bearer <jwt>
//!        │
//!        ▼
//! TokenVerifier::verify ── bad / expired ──► 401 UNAUTHORIZED
//!        │
//!        ▼
//! AuthUser(Requester { id, role })
//! ```

use std::sync::Arc;

use axum::{extract::FromRequestParts, http::header::AUTHORIZATION, http::request::Parts};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use platter_core::{Requester, Role};

use crate::error::ApiError;
use crate::AppState;

/// JWT claims structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub id: String,

    /// `user` or `admin`
    pub role: Role,

    /// Expiration (Unix timestamp)
    pub exp: i64,
}

/// Verifies HS256 tokens with a shared secret.
#[derive(Clone)]
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: &str) -> Self {
        TokenVerifier {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    /// Validate a token and return who sent it.
    pub fn verify(&self, token: &str) -> Result<Requester, ApiError> {
        let data = decode::<Claims>(token, &self.key, &self.validation).map_err(|e| {
            debug!(error = %e, "Rejected bearer token");
            ApiError::unauthorized("Invalid or expired token")
        })?;

        Ok(Requester::new(data.claims.id, data.claims.role))
    }
}

/// Extract bearer token from authorization header.
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// The verified caller of a route.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Requester);

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::unauthorized("Missing bearer token"))?;

        let token = extract_bearer_token(header)
            .ok_or_else(|| ApiError::unauthorized("Missing bearer token"))?;

        state.verifier.verify(token).map(AuthUser)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use jsonwebtoken::{encode, EncodingKey, Header};

    pub const SECRET: &str = "test-secret-for-platter-api";

    pub fn token(id: &str, role: Role, ttl_secs: i64) -> String {
        let claims = Claims {
            id: id.to_string(),
            role,
            exp: (Utc::now() + Duration::seconds(ttl_secs)).timestamp(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_verify_roundtrip() {
        let verifier = TokenVerifier::new(SECRET);
        let requester = verifier.verify(&token("u1", Role::Admin, 3600)).unwrap();
        assert_eq!(requester, Requester::new("u1", Role::Admin));
    }

    #[test]
    fn test_rejects_expired_and_foreign_tokens() {
        let verifier = TokenVerifier::new(SECRET);

        // Past the default 60s leeway.
        let expired = token("u1", Role::User, -600);
        assert!(verifier.verify(&expired).is_err());

        let other = TokenVerifier::new("a-completely-different-secret");
        assert!(other.verify(&token("u1", Role::User, 3600)).is_err());

        assert!(verifier.verify("not.a.jwt").is_err());
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(extract_bearer_token("Bearer "), None);
        assert_eq!(extract_bearer_token("Basic abc"), None);
    }
}
