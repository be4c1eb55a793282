use axum::{extract::State, response::Json};
use serde::Serialize;

use crate::api::models::{Permissions, User, WhoAmI};
use crate::error::ApiError;
use crate::handlers::fallback_to;
use crate::middleware::SessionToken;
use crate::router::AppState;

#[derive(Debug, Serialize)]
pub struct SettingsPage {
    pub user: User,
    pub permissions: Permissions,
}

/// GET /settings - the current user and their grants
pub async fn layout(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
) -> Result<Json<SettingsPage>, ApiError> {
    let whoami: WhoAmI = state
        .backend
        .get(&token, &["whoami"])
        .await
        .map_err(|e| fallback_to(e, "/login"))?;

    Ok(Json(SettingsPage {
        user: whoami.user,
        permissions: whoami.permissions,
    }))
}
