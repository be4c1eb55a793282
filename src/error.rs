// Page and form-action outcomes that short-circuit a handler
use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect},
    Json,
};
use serde_json::{json, Value};

/// Everything a handler can bail out with.
///
/// Read paths only ever produce `Redirect`; form actions produce either a
/// redirect (missing session) or a failure payload the page can display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    // 303 See Other
    Redirect(String),

    // 400 Bad Request
    BadRequest(String),

    // 401 Unauthorized
    Unauthorized(String),

    // 404 Not Found
    NotFound(String),

    // 500 Internal Server Error
    InternalServerError(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::Redirect(_) => 303,
            ApiError::BadRequest(_) => 400,
            ApiError::Unauthorized(_) => 401,
            ApiError::NotFound(_) => 404,
            ApiError::InternalServerError(_) => 500,
        }
    }

    /// Client-safe message; for redirects this is the target path
    pub fn message(&self) -> &str {
        match self {
            ApiError::Redirect(location) => location,
            ApiError::BadRequest(msg) => msg,
            ApiError::Unauthorized(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::InternalServerError(msg) => msg,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Redirect(_) => "REDIRECT",
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    /// Failure payload returned to the form that submitted the action
    pub fn to_json(&self) -> Value {
        json!({
            "error": self.message(),
            "code": self.error_code()
        })
    }
}

impl ApiError {
    pub fn redirect(location: impl Into<String>) -> Self {
        ApiError::Redirect(location.into())
    }

    /// Where every request without a session ends up
    pub fn login_required() -> Self {
        ApiError::Redirect("/login".to_string())
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }

    pub fn unknown_action(name: &str) -> Self {
        ApiError::NotFound(format!("No action with name '{}' found", name))
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Redirect(location) => write!(f, "redirect to {}", location),
            _ => write!(f, "{}", self.message()),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            // Redirect::to answers with 303 See Other
            ApiError::Redirect(location) => Redirect::to(&location).into_response(),
            other => {
                let status = StatusCode::from_u16(other.status_code())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                (status, Json(other.to_json())).into_response()
            }
        }
    }
}
