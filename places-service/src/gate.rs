//! Access gate guarding the recommendation query.
//!
//! Tokens are HS256 JWTs carrying `sub`, `iat` and `exp`. Expiry is checked
//! with zero leeway.

use std::fmt;
use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Default lifetime of an issued token.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(60);

const COOKIE_NAME: &str = "token";

/// Errors raised by an access gate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateError {
    #[error("No token presented")]
    Missing,

    #[error("Token expired")]
    Expired,

    #[error("Invalid token: {0}")]
    Invalid(String),

    #[error("Cannot sign token: {0}")]
    Signing(String),
}

/// Claims embedded in every token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: usize,
    pub exp: usize,
}

/// Issues and verifies time-limited capability tokens.
pub trait AccessGate: Send + Sync {
    /// Issue a signed token for `subject`.
    fn issue(&self, subject: &str) -> Result<String, GateError>;

    /// Verify a token and return its claims.
    fn verify(&self, token: &str) -> Result<Claims, GateError>;

    /// How long issued tokens stay valid.
    fn token_ttl(&self) -> Duration;
}

/// Configuration for the JWT gate.
#[derive(Clone)]
pub struct GateConfig {
    /// Shared HMAC secret.
    pub secret: String,
    pub token_ttl: Duration,
}

impl GateConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            token_ttl: DEFAULT_TOKEN_TTL,
        }
    }

    pub fn with_token_ttl(mut self, token_ttl: Duration) -> Self {
        self.token_ttl = token_ttl;
        self
    }
}

impl Default for GateConfig {
    fn default() -> Self {
        Self::new(generate_secret())
    }
}

impl fmt::Debug for GateConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GateConfig")
            .field("secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .finish()
    }
}

fn generate_secret() -> String {
    let mut rng = rand::thread_rng();
    let secret: Vec<u8> = (0..32).map(|_| rng.gen()).collect();
    hex::encode(secret)
}

/// HS256 access gate.
pub struct JwtGate {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    token_ttl: Duration,
}

impl JwtGate {
    pub fn new(config: GateConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            token_ttl: config.token_ttl,
        }
    }

    fn claims_for(&self, subject: &str) -> Claims {
        let now = Utc::now().timestamp().max(0) as usize;
        Claims {
            sub: subject.to_string(),
            iat: now,
            exp: now + self.token_ttl.as_secs() as usize,
        }
    }

    fn sign(&self, claims: &Claims) -> Result<String, GateError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| GateError::Signing(e.to_string()))
    }
}

impl AccessGate for JwtGate {
    fn issue(&self, subject: &str) -> Result<String, GateError> {
        self.sign(&self.claims_for(subject))
    }

    fn verify(&self, token: &str) -> Result<Claims, GateError> {
        if token.is_empty() {
            return Err(GateError::Missing);
        }

        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(error = %e, "Token rejected");
                match e.kind() {
                    ErrorKind::ExpiredSignature => GateError::Expired,
                    _ => GateError::Invalid(e.to_string()),
                }
            })
    }

    fn token_ttl(&self) -> Duration {
        self.token_ttl
    }
}

/// `Set-Cookie` value delivering `token` for `ttl`.
pub fn token_cookie(token: &str, ttl: Duration) -> String {
    format!(
        "{}={}; Max-Age={}; Path=/; HttpOnly; Secure",
        COOKIE_NAME,
        token,
        ttl.as_secs()
    )
}

/// Extract the token from a `Cookie` request header.
pub fn token_from_cookie_header(header: &str) -> Option<&str> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == COOKIE_NAME)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
}
