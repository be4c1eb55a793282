use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header::COOKIE, request::Parts, HeaderMap},
};

use crate::config::SessionConfig;
use crate::error::ApiError;

/// Name of the cookie holding the API bearer token
pub const TOKEN_COOKIE: &str = "token";

/// Set on logout; same path as the session cookie so the browser drops it
pub const EXPIRED_SESSION_COOKIE: &str =
    "token=; Path=/; HttpOnly; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT";

/// Bearer token read from the `token` cookie.
///
/// Taking this as a handler argument is the session guard: requests without
/// a (non-empty) token are redirected to `/login` before the handler runs.
#[derive(Clone, Debug)]
pub struct SessionToken(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for SessionToken
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match extract_token_from_headers(&parts.headers) {
            Some(token) => Ok(SessionToken(token)),
            None => {
                tracing::debug!(path = %parts.uri.path(), "No session token, redirecting to login");
                Err(ApiError::login_required())
            }
        }
    }
}

/// Extract the session token from every `Cookie` header on the request
pub fn extract_token_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| name.trim() == TOKEN_COOKIE)
        .map(|(_, value)| value.trim().trim_matches('"').to_string())
        .filter(|token| !token.is_empty())
}

/// RFC 6265 `cookie-octet`: visible ASCII minus `"`, `,`, `;` and `\`
fn is_cookie_octet(byte: u8) -> bool {
    matches!(byte, 0x21 | 0x23..=0x2B | 0x2D..=0x3A | 0x3C..=0x5B | 0x5D..=0x7E)
}

/// `Set-Cookie` value storing a freshly issued token.
///
/// `None` when the token is empty or cannot be stored without quoting.
pub fn session_cookie(token: &str, config: &SessionConfig) -> Option<String> {
    if token.is_empty() || !token.bytes().all(is_cookie_octet) {
        return None;
    }

    let mut cookie = format!("{}={}; Path=/; HttpOnly", TOKEN_COOKIE, token);

    if let Some(same_site) = config.same_site {
        cookie.push_str("; SameSite=");
        cookie.push_str(same_site.as_str());
    }
    if let Some(max_age) = config.max_age_secs {
        cookie.push_str(&format!("; Max-Age={}", max_age));
    }
    if config.secure {
        cookie.push_str("; Secure");
    }

    Some(cookie)
}
