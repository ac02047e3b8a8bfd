//! Access-token extraction
//!
//! Sorteo does not manage identities or sessions; callers authenticate
//! with the upstream identity provider and hand us the resulting OAuth
//! access token, which is only ever forwarded to the Graph API.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;

use crate::error::AppError;

fn extract_token_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(ToOwned::to_owned)
}

/// Bearer access token extractor
///
/// # Usage
/// ```ignore
/// async fn handler(
///     AccessToken(token): AccessToken,
/// ) -> impl IntoResponse {
///     // forward `token` upstream
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AccessToken(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for AccessToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = extract_token_from_headers(&parts.headers).ok_or(AppError::Unauthorized)?;
        Ok(AccessToken(token))
    }
}
