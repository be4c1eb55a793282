use std::collections::HashMap;
use std::convert::Infallible;

use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Request},
    http::request::Parts,
};

use crate::error::ApiError;

/// Fields of a submitted `application/x-www-form-urlencoded` form.
///
/// When a name repeats, the first value wins.
#[derive(Debug, Clone, Default)]
pub struct FormFields(HashMap<String, String>);

impl FormFields {
    pub fn parse(body: &[u8]) -> Self {
        let mut fields = HashMap::new();
        for (name, value) in url::form_urlencoded::parse(body) {
            fields.entry(name.into_owned()).or_insert_with(|| value.into_owned());
        }
        Self(fields)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// A present field, or a 400 carrying `message`. Empty strings pass.
    pub fn require(&self, name: &str, message: &str) -> Result<&str, ApiError> {
        self.get(name).ok_or_else(|| {
            tracing::debug!(field = name, "Form field missing");
            ApiError::bad_request(message)
        })
    }
}

#[async_trait]
impl<S> FromRequest<S> for FormFields
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state).await.map_err(|e| {
            tracing::warn!("Failed to read form body: {}", e);
            ApiError::bad_request("Invalid form data")
        })?;
        Ok(Self::parse(&body))
    }
}

/// Which form action a POST targets: `?/createEnv` selects `createEnv`,
/// no selector means `default`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionName(pub String);

impl ActionName {
    pub const DEFAULT: &'static str = "default";

    pub fn from_query(query: Option<&str>) -> Self {
        let name = query
            .and_then(|q| q.split('&').find_map(|part| part.strip_prefix('/')))
            .filter(|name| !name.is_empty())
            .unwrap_or(Self::DEFAULT);
        Self(name.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_default(&self) -> bool {
        self.0 == Self::DEFAULT
    }

    /// For pages that only have a default action
    pub fn require_default(&self) -> Result<(), ApiError> {
        if self.is_default() {
            Ok(())
        } else {
            Err(ApiError::unknown_action(&self.0))
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for ActionName
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_query(parts.uri.query()))
    }
}
