use axum::{
    extract::State,
    http::{header::SET_COOKIE, HeaderValue},
    response::{IntoResponse, Json, Redirect, Response},
};
use serde_json::{json, Value};

use crate::api::models::LoginRequest;
use crate::error::ApiError;
use crate::middleware::{session_cookie, ActionName, FormFields, EXPIRED_SESSION_COOKIE};
use crate::router::AppState;

fn invalid_credentials() -> ApiError {
    ApiError::unauthorized("Invalid email or password")
}

/// GET /login - the login form needs no data
pub async fn login_page() -> Json<Value> {
    Json(json!({}))
}

/// POST /login - exchange credentials for a token and keep it in the `token` cookie
///
/// Form fields: `email`, `password`. Both are forwarded as-is (missing ones as
/// `null`); the backend decides whether they are acceptable.
pub async fn login(
    State(state): State<AppState>,
    action: ActionName,
    form: FormFields,
) -> Result<Response, ApiError> {
    action.require_default()?;

    let credentials = LoginRequest {
        email: form.get("email"),
        password: form.get("password"),
    };

    let response = state.backend.login(&credentials).await.map_err(|err| {
        tracing::warn!(status = ?err.status(), "Login rejected: {}", err);
        invalid_credentials()
    })?;

    if response.token.is_empty() {
        tracing::warn!("Login response carried no token");
        return Err(invalid_credentials());
    }

    let cookie = session_cookie(&response.token, &state.config.session)
        .and_then(|cookie| HeaderValue::from_str(&cookie).ok())
        .ok_or_else(|| {
            tracing::warn!("Backend issued a token that cannot be stored in a cookie");
            invalid_credentials()
        })?;

    tracing::info!("Login succeeded, session cookie set");
    Ok(([(SET_COOKIE, cookie)], Redirect::to("/environments")).into_response())
}

/// POST /logout - drop the session cookie
pub async fn logout(action: ActionName) -> Result<Response, ApiError> {
    action.require_default()?;

    tracing::info!("Logout, session cookie cleared");
    Ok((
        [(SET_COOKIE, HeaderValue::from_static(EXPIRED_SESSION_COOKIE))],
        Redirect::to("/login"),
    )
        .into_response())
}
