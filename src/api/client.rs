use std::time::Duration;

use reqwest::{header::CONTENT_TYPE, Method, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use thiserror::Error;
use url::Url;

use super::models::{LoginRequest, LoginResponse};
use crate::config::BackendConfig;

/// Errors from talking to the Monji API
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Backend returned {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("Malformed backend response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl BackendError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            BackendError::Status { status, .. } => Some(*status),
            BackendError::Transport(err) => err.status(),
            _ => None,
        }
    }
}

pub type BackendResult<T> = Result<T, BackendError>;

/// Thin bearer-token client for the Monji API.
///
/// Cloning is cheap; the underlying reqwest pool is shared.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: Url,
}

impl BackendClient {
    pub fn new(config: &BackendConfig) -> BackendResult<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| BackendError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(BackendError::InvalidUrl(config.base_url.clone()));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            http: builder.build()?,
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Join path segments onto the base URL, percent-encoding each one.
    /// A segment never introduces extra path levels (`/` is encoded).
    pub fn endpoint(&self, segments: &[&str]) -> BackendResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| BackendError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, token: Option<&str>, segments: &[&str]) -> BackendResult<RequestBuilder> {
        let url = self.endpoint(segments)?;
        tracing::debug!(%method, %url, "Backend request");

        let builder = self.http.request(method, url);
        Ok(match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    /// Send and return the body of a 2xx response
    async fn execute(&self, builder: RequestBuilder) -> BackendResult<String> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(BackendError::Status {
                status,
                message: error_message(&body),
            });
        }

        Ok(body)
    }

    /// GET and decode the JSON body
    pub async fn get<T: DeserializeOwned>(&self, token: &str, segments: &[&str]) -> BackendResult<T> {
        let builder = self.request(Method::GET, Some(token), segments)?;
        let body = self.execute(builder).await?;
        decode(&body)
    }

    /// POST/PUT a serializable body; only the status matters
    pub async fn send_json<B>(&self, method: Method, token: &str, segments: &[&str], body: &B) -> BackendResult<()>
    where
        B: Serialize + ?Sized,
    {
        let builder = self.request(method, Some(token), segments)?.json(body);
        self.execute(builder).await.map(|_| ())
    }

    /// POST/PUT text that is already JSON, forwarded byte for byte
    pub async fn send_raw_json(&self, method: Method, token: &str, segments: &[&str], body: &str) -> BackendResult<()> {
        let builder = self
            .request(method, Some(token), segments)?
            .header(CONTENT_TYPE, "application/json")
            .body(body.to_owned());
        self.execute(builder).await.map(|_| ())
    }

    pub async fn delete(&self, token: &str, segments: &[&str]) -> BackendResult<()> {
        let builder = self.request(Method::DELETE, Some(token), segments)?;
        self.execute(builder).await.map(|_| ())
    }

    /// Exchange credentials for a token. Unauthenticated.
    pub async fn login(&self, credentials: &LoginRequest<'_>) -> BackendResult<LoginResponse> {
        let builder = self.request(Method::POST, None, &["login"])?.json(credentials);
        let body = self.execute(builder).await?;
        decode(&body)
    }

    /// Any HTTP answer from the base URL counts as reachable
    pub async fn ping(&self) -> BackendResult<StatusCode> {
        let response = self.http.get(self.base_url.clone()).send().await?;
        Ok(response.status())
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> BackendResult<T> {
    let body = if body.trim().is_empty() { "null" } else { body };
    Ok(serde_json::from_str(body)?)
}

/// Pull `{"error": "..."}` out of a failure body, falling back to the raw text
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}
