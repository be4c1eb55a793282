use axum::{
    extract::{Path, State},
    http::Method,
    response::{Json, Redirect},
};
use serde::Serialize;

use super::{load_navigation, Navigation};
use crate::api::models::{Environment, EnvironmentDetail, EnvironmentRequest, User};
use crate::error::ApiError;
use crate::handlers::{action_failed, fallback_to};
use crate::middleware::{ActionName, FormFields, SessionToken};
use crate::router::AppState;

#[derive(Debug, Serialize)]
pub struct EnvironmentsPage {
    pub user: User,
    pub environments: Vec<Environment>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentPage {
    pub user: User,
    pub environments: Vec<Environment>,
    pub environment: Environment,
    pub my_permission: Option<String>,
    pub current_environment_id: String,
}

/// GET /environments
pub async fn list(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
) -> Result<Json<EnvironmentsPage>, ApiError> {
    let Navigation { user, environments } = load_navigation(&state.backend, &token).await?;
    Ok(Json(EnvironmentsPage { user, environments }))
}

/// GET /environments/:id
pub async fn show(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
    Path(id): Path<String>,
) -> Result<Json<EnvironmentPage>, ApiError> {
    let Navigation { user, environments } = load_navigation(&state.backend, &token).await?;

    let detail: EnvironmentDetail = state
        .backend
        .get(&token, &["environments", &id])
        .await
        .map_err(|e| fallback_to(e, "/environments"))?;

    Ok(Json(EnvironmentPage {
        user,
        environments,
        environment: detail.environment,
        my_permission: detail.my_permission,
        current_environment_id: id,
    }))
}

/// POST /environments?/createEnv | ?/updateEnv | ?/deleteEnv
pub async fn actions(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
    action: ActionName,
    form: FormFields,
) -> Result<Redirect, ApiError> {
    match action.as_str() {
        "createEnv" => create_env(&state, &token, &form).await,
        "updateEnv" => update_env(&state, &token, &form).await,
        "deleteEnv" => delete_env(&state, &token, &form).await,
        other => Err(ApiError::unknown_action(other)),
    }
}

async fn create_env(state: &AppState, token: &str, form: &FormFields) -> Result<Redirect, ApiError> {
    let name = form.require("name", "Invalid form data")?;
    let connection_string = form.require("connection_string", "Invalid form data")?;

    state
        .backend
        .send_json(
            Method::POST,
            token,
            &["environments"],
            &EnvironmentRequest { name, connection_string },
        )
        .await
        .map_err(|e| action_failed(e, "Failed to create environment"))?;

    tracing::info!(name, "Environment created");
    Ok(Redirect::to("/environments"))
}

async fn update_env(state: &AppState, token: &str, form: &FormFields) -> Result<Redirect, ApiError> {
    let id = form.require("id", "Invalid form data")?;
    let name = form.require("name", "Invalid form data")?;
    let connection_string = form.require("connection_string", "Invalid form data")?;

    state
        .backend
        .send_json(
            Method::PUT,
            token,
            &["environments", id],
            &EnvironmentRequest { name, connection_string },
        )
        .await
        .map_err(|e| action_failed(e, "Failed to update environment"))?;

    tracing::info!(id, "Environment updated");
    Ok(Redirect::to("/environments"))
}

async fn delete_env(state: &AppState, token: &str, form: &FormFields) -> Result<Redirect, ApiError> {
    let id = form.require("id", "Invalid environment ID")?;

    state
        .backend
        .delete(token, &["environments", id])
        .await
        .map_err(|e| action_failed(e, "Failed to delete environment"))?;

    tracing::info!(id, "Environment deleted");
    Ok(Redirect::to("/environments"))
}
