use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::{
    models::auth::AuthenticatedUser,
    services::{
        metrics::AUTH_REJECTIONS_COUNTER,
        token::{TokenCodec, TokenError},
    },
};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[error("Missing auth token")]
    MissingCredential,

    #[error("Invalid auth header")]
    MalformedHeader,

    #[error(transparent)]
    Token(#[from] TokenError),
}

impl AuthError {
    pub fn reason(&self) -> &'static str {
        match self {
            AuthError::MissingCredential => "missing_credential",
            AuthError::MalformedHeader => "malformed_header",
            AuthError::Token(e) => e.reason(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::MissingCredential => StatusCode::BAD_REQUEST,
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Resolve the user id from the `Authorization` header.
///
/// The header must be exactly `"<scheme> <token>"` with a single space; the
/// scheme itself is not checked.
pub fn authenticate(headers: &HeaderMap, codec: &TokenCodec) -> Result<i32, AuthError> {
    let value = match headers.get(header::AUTHORIZATION) {
        None => return Err(AuthError::MissingCredential),
        Some(v) if v.is_empty() => return Err(AuthError::MissingCredential),
        Some(v) => v.to_str().map_err(|_| AuthError::MalformedHeader)?,
    };

    let parts: Vec<&str> = value.split(' ').collect();
    let token = match parts.as_slice() {
        [scheme, token] if !scheme.is_empty() && !token.is_empty() => *token,
        _ => return Err(AuthError::MalformedHeader),
    };

    Ok(codec.verify(token)?)
}

/// Middleware for routes that require a valid access token. Attaches
/// [`AuthenticatedUser`] to the request extensions.
pub async fn require_auth(
    State(codec): State<Arc<TokenCodec>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    match authenticate(request.headers(), &codec) {
        Ok(user_id) => {
            request
                .extensions_mut()
                .insert(AuthenticatedUser { user_id });
            Ok(next.run(request).await)
        }
        Err(e) => {
            tracing::warn!(
                method = %request.method(),
                path = %request.uri().path(),
                reason = e.reason(),
                "auth gate rejected request"
            );
            AUTH_REJECTIONS_COUNTER.with_label_values(&[e.reason()]).inc();
            Err(e)
        }
    }
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .copied()
            .ok_or((StatusCode::FORBIDDEN, "Not authenticated"))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn codec() -> TokenCodec {
        TokenCodec::new(b"gate-test-key", 1).unwrap()
    }

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_missing_header() {
        assert_eq!(
            authenticate(&HeaderMap::new(), &codec()),
            Err(AuthError::MissingCredential)
        );
    }

    #[test]
    fn test_empty_header() {
        assert_eq!(
            authenticate(&headers_with(""), &codec()),
            Err(AuthError::MissingCredential)
        );
    }

    #[test]
    fn test_single_part_header() {
        assert_eq!(
            authenticate(&headers_with("onlyonepart"), &codec()),
            Err(AuthError::MalformedHeader)
        );
    }

    #[test]
    fn test_extra_whitespace_not_normalized() {
        let codec = codec();
        let token = codec.issue(4).unwrap();
        for value in [
            format!("Bearer  {token}"),
            format!("Bearer {token} extra"),
            format!(" {token}"),
            "Bearer ".to_string(),
        ] {
            assert_eq!(
                authenticate(&headers_with(&value), &codec),
                Err(AuthError::MalformedHeader),
                "{value:?}"
            );
        }
    }

    #[test]
    fn test_valid_bearer() {
        let codec = codec();
        let token = codec.issue(42).unwrap();
        assert_eq!(
            authenticate(&headers_with(&format!("Bearer {token}")), &codec),
            Ok(42)
        );
    }

    #[test]
    fn test_scheme_name_not_checked() {
        let codec = codec();
        let token = codec.issue(42).unwrap();
        assert_eq!(
            authenticate(&headers_with(&format!("Token {token}")), &codec),
            Ok(42)
        );
    }

    #[test]
    fn test_codec_errors_propagate() {
        let codec = codec();
        let other = TokenCodec::new(b"another-key", 1).unwrap();
        let token = other.issue(1).unwrap();
        assert_eq!(
            authenticate(&headers_with(&format!("Bearer {token}")), &codec),
            Err(AuthError::Token(TokenError::InvalidSignature))
        );
        assert_eq!(
            authenticate(&headers_with("Bearer garbage"), &codec),
            Err(AuthError::Token(TokenError::MalformedToken))
        );
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(AuthError::MissingCredential.status(), StatusCode::BAD_REQUEST);
        assert_eq!(AuthError::MalformedHeader.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AuthError::Token(TokenError::Expired).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::Token(TokenError::Expired).to_string(),
            "Token has expired"
        );
    }
}
