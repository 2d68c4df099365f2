use serde::{Deserialize, Serialize};

/// Claims embedded in the JWT access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64, // user id
    pub iat: i64,
    pub exp: i64,
}

/// Attached to the request by the auth gate — available via Axum extractors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: i32,
}

/// Returned by signup, login and the token check endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub id: i32,
    pub access_token: String,
}
