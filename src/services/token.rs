//! Access-token issuance and verification.
//!
//! Tokens are HS256 JWTs carrying [`Claims`]. Verification only ever accepts
//! the HMAC family; anything else in the header (`none`, RSA, EC, ...) is
//! refused before a signature is looked at.

use std::fmt;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::Deserialize;
use thiserror::Error;

use crate::models::auth::Claims;

/// Algorithms accepted by [`TokenCodec::verify`].
const HMAC_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

/// Why a token was refused. Display strings are safe to return to clients.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    #[error("Malformed token")]
    MalformedToken,

    #[error("Unsupported signing algorithm")]
    UnsupportedAlgorithm,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Token has expired")]
    Expired,
}

impl TokenError {
    /// Short label used for logs and metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            TokenError::MalformedToken => "malformed_token",
            TokenError::UnsupportedAlgorithm => "unsupported_algorithm",
            TokenError::InvalidSignature => "invalid_signature",
            TokenError::Expired => "expired",
        }
    }
}

/// Only the `alg` field matters before the signature is checked.
#[derive(Deserialize)]
struct RawHeader {
    alg: String,
}

/// Issues and verifies access tokens with a single shared HMAC key.
///
/// Immutable after construction and safe to share between requests.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("ttl_hours", &self.ttl.num_hours())
            .finish_non_exhaustive()
    }
}

impl TokenCodec {
    pub fn new(signing_key: &[u8], ttl_hours: u32) -> anyhow::Result<Self> {
        if signing_key.is_empty() {
            anyhow::bail!("Signing key must not be empty");
        }
        if ttl_hours == 0 {
            anyhow::bail!("Token TTL must be at least one hour");
        }

        // Expiry is checked by hand in `verify_at` so the boundary is exact
        // and the clock can be injected.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = HMAC_ALGORITHMS.to_vec();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        Ok(Self {
            encoding_key: EncodingKey::from_secret(signing_key),
            decoding_key: DecodingKey::from_secret(signing_key),
            validation,
            ttl: Duration::hours(i64::from(ttl_hours)),
        })
    }

    pub fn issue(&self, subject: i32) -> anyhow::Result<String> {
        self.issue_at(subject, Utc::now())
    }

    /// Issue a token as if the current time were `now`.
    pub fn issue_at(&self, subject: i32, now: DateTime<Utc>) -> anyhow::Result<String> {
        if subject < 0 {
            anyhow::bail!("Token subject must be a non-negative user id");
        }
        let iat = now.timestamp();
        let claims = Claims {
            sub: i64::from(subject),
            iat,
            exp: iat + self.ttl.num_seconds(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;
        Ok(token)
    }

    /// Verify a token and return the user id it was issued for.
    pub fn verify(&self, token: &str) -> Result<i32, TokenError> {
        self.verify_at(token, Utc::now())
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<i32, TokenError> {
        let segments: Vec<&str> = token.split('.').collect();

        let alg = read_algorithm(segments[0])?;
        if !matches!(alg.as_str(), "HS256" | "HS384" | "HS512") {
            return Err(TokenError::UnsupportedAlgorithm);
        }
        if segments.len() != 3 {
            return Err(TokenError::MalformedToken);
        }

        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                    TokenError::UnsupportedAlgorithm
                }
                _ => TokenError::MalformedToken,
            }
        })?;
        let claims = data.claims;

        if claims.sub < 0 {
            return Err(TokenError::MalformedToken);
        }
        let subject = i32::try_from(claims.sub).map_err(|_| TokenError::MalformedToken)?;

        if now.timestamp() >= claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(subject)
    }
}

fn read_algorithm(encoded_header: &str) -> Result<String, TokenError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(encoded_header)
        .map_err(|_| TokenError::MalformedToken)?;
    let header: RawHeader =
        serde_json::from_slice(&bytes).map_err(|_| TokenError::MalformedToken)?;
    Ok(header.alg)
}
