use axum::{
    extract::{Path, State},
    http::Method,
    response::{Json, Redirect},
};
use serde::Serialize;
use serde_json::Value;

use super::{load_navigation, Navigation};
use crate::api::models::{
    CreateDatabaseRequest, DatabaseDetail, DatabaseList, DatabaseSummary, Environment, RenameDatabaseRequest, User,
};
use crate::error::ApiError;
use crate::handlers::{action_failed, fallback_to, page_path};
use crate::middleware::{ActionName, FormFields, SessionToken};
use crate::router::AppState;

/// Databases keep the backend's `{Name, SizeOnDisk, Empty}` entries; only the
/// envelope is renamed.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabasesPage {
    pub databases: Vec<DatabaseSummary>,
    pub total_size: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabasePage {
    pub user: User,
    pub environments: Vec<Environment>,
    pub database: String,
    pub stats: Value,
    pub collections: Vec<String>,
    pub my_permission: Option<String>,
    pub current_environment_id: String,
    pub current_database: String,
}

/// GET /environments/:id/databases
pub async fn list(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
    Path(id): Path<String>,
) -> Result<Json<DatabasesPage>, ApiError> {
    let list: DatabaseList = state
        .backend
        .get(&token, &["environments", &id, "databases"])
        .await
        .map_err(|e| fallback_to(e, "/environments"))?;

    Ok(Json(DatabasesPage {
        databases: list.databases,
        total_size: list.total_size,
    }))
}

/// GET /environments/:id/databases/:db_name
pub async fn show(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
    Path((id, db_name)): Path<(String, String)>,
) -> Result<Json<DatabasePage>, ApiError> {
    let Navigation { user, environments } = load_navigation(&state.backend, &token).await?;

    let detail: DatabaseDetail = state
        .backend
        .get(&token, &["environments", &id, "databases", &db_name])
        .await
        .map_err(|e| fallback_to(e, page_path(&["environments", &id, "databases"])))?;

    Ok(Json(DatabasePage {
        user,
        environments,
        database: detail.database,
        stats: detail.stats,
        collections: detail.collections,
        my_permission: detail.my_permission,
        current_environment_id: id,
        current_database: db_name,
    }))
}

/// POST /environments/:id/databases?/createDb | ?/updateDb | ?/deleteDb
pub async fn actions(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
    Path(id): Path<String>,
    action: ActionName,
    form: FormFields,
) -> Result<Redirect, ApiError> {
    match action.as_str() {
        "createDb" => create_db(&state, &token, &id, &form).await,
        "updateDb" => update_db(&state, &token, &id, &form).await,
        "deleteDb" => delete_db(&state, &token, &id, &form).await,
        other => Err(ApiError::unknown_action(other)),
    }
}

fn listing(id: &str) -> Redirect {
    Redirect::to(&page_path(&["environments", id, "databases"]))
}

async fn create_db(state: &AppState, token: &str, id: &str, form: &FormFields) -> Result<Redirect, ApiError> {
    let db_name = form.require("dbName", "Invalid form data")?;
    let initial_collection = form.require("initialCollection", "Invalid form data")?;

    state
        .backend
        .send_json(
            Method::POST,
            token,
            &["environments", id, "databases"],
            &CreateDatabaseRequest { db_name, initial_collection },
        )
        .await
        .map_err(|e| action_failed(e, "Failed to create database"))?;

    tracing::info!(environment = id, database = db_name, "Database created");
    Ok(listing(id))
}

async fn update_db(state: &AppState, token: &str, id: &str, form: &FormFields) -> Result<Redirect, ApiError> {
    let old_db_name = form.require("oldDbName", "Invalid form data")?;
    let new_db_name = form.require("newDbName", "Invalid form data")?;

    state
        .backend
        .send_json(
            Method::PUT,
            token,
            &["environments", id, "databases", old_db_name],
            &RenameDatabaseRequest { new_db_name },
        )
        .await
        .map_err(|e| action_failed(e, "Failed to rename database"))?;

    tracing::info!(environment = id, from = old_db_name, to = new_db_name, "Database renamed");
    Ok(listing(id))
}

async fn delete_db(state: &AppState, token: &str, id: &str, form: &FormFields) -> Result<Redirect, ApiError> {
    let db_name = form.require("dbName", "Invalid database name")?;

    state
        .backend
        .delete(token, &["environments", id, "databases", db_name])
        .await
        .map_err(|e| action_failed(e, "Failed to delete database"))?;

    tracing::info!(environment = id, database = db_name, "Database deleted");
    Ok(listing(id))
}
