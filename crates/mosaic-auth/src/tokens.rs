//! JWT session tokens — HS256 signing, access/refresh pairs.
//!
//! Both tokens carry the same claim shape; a `kind` claim keeps them
//! apart so a long-lived refresh token can never be replayed as a bearer
//! credential.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::errors::AuthError;

/// Claim set carried by both token kinds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject — the user's ID.
    pub sub: String,
    /// Username at issue time, for logging and display.
    pub username: String,
    /// Issued at (Unix timestamp).
    pub iat: i64,
    /// Expiry (Unix timestamp).
    pub exp: i64,
    /// `"access"` or `"refresh"`.
    pub kind: String,
}

/// A freshly issued access/refresh pair.
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    /// Short-lived bearer token.
    pub access: String,
    /// Long-lived token exchangeable for new access tokens.
    pub refresh: String,
}

/// Signs and verifies session tokens with a shared HS256 secret.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("access_ttl_secs", &self.access_ttl_secs)
            .field("refresh_ttl_secs", &self.refresh_ttl_secs)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    /// Create a service from a shared secret and per-kind lifetimes.
    #[must_use]
    pub fn new(secret: &str, access_ttl_secs: i64, refresh_ttl_secs: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_ttl_secs,
            refresh_ttl_secs,
        }
    }

    /// Issue an access/refresh pair for a user.
    pub fn issue_pair(&self, user_id: &str, username: &str) -> Result<TokenPair, AuthError> {
        Ok(TokenPair {
            access: self.issue(user_id, username, "access", self.access_ttl_secs)?,
            refresh: self.issue(user_id, username, "refresh", self.refresh_ttl_secs)?,
        })
    }

    /// Issue a lone access token, as the refresh endpoint does.
    pub fn issue_access(&self, user_id: &str, username: &str) -> Result<String, AuthError> {
        self.issue(user_id, username, "access", self.access_ttl_secs)
    }

    /// Verify a bearer credential and return its claims.
    pub fn verify_access(&self, token: &str) -> Result<Claims, AuthError> {
        self.verify(token, "access")
    }

    /// Verify a refresh token and return its claims.
    pub fn verify_refresh(&self, token: &str) -> Result<Claims, AuthError> {
        self.verify(token, "refresh")
    }

    fn issue(
        &self,
        user_id: &str,
        username: &str,
        kind: &str,
        ttl_secs: i64,
    ) -> Result<String, AuthError> {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            iat: now,
            exp: now + ttl_secs,
            kind: kind.to_string(),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Sign {
                reason: e.to_string(),
            })
    }

    fn verify(&self, token: &str, kind: &'static str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Exact expiry; the default 60s leeway would keep freshly expired
        // tokens alive for a minute.
        validation.leeway = 0;

        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| AuthError::Verify {
                reason: e.to_string(),
            })?;

        if data.claims.kind != kind {
            return Err(AuthError::WrongKind {
                expected: kind,
                actual: data.claims.kind,
            });
        }
        Ok(data.claims)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
