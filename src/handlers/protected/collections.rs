use axum::{
    extract::{Path, State},
    http::Method,
    response::{Json, Redirect},
};
use serde::Serialize;

use super::{load_navigation, Navigation};
use crate::api::models::{
    CollectionList, CollectionSummary, CreateCollectionRequest, Environment, RenameCollectionRequest, User,
};
use crate::error::ApiError;
use crate::handlers::{action_failed, fallback_to, page_path};
use crate::middleware::{ActionName, FormFields, SessionToken};
use crate::router::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionsPage {
    pub user: User,
    pub environments: Vec<Environment>,
    pub collections: Vec<CollectionSummary>,
    pub database: Option<String>,
    pub my_permission: Option<String>,
    pub current_environment_id: String,
    pub current_database: String,
}

/// GET /environments/:id/databases/:db_name/collections
pub async fn list(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
    Path((id, db_name)): Path<(String, String)>,
) -> Result<Json<CollectionsPage>, ApiError> {
    let Navigation { user, environments } = load_navigation(&state.backend, &token).await?;

    let list: CollectionList = state
        .backend
        .get(&token, &["environments", &id, "databases", &db_name, "collections"])
        .await
        .map_err(|e| fallback_to(e, page_path(&["environments", &id, "databases"])))?;

    Ok(Json(CollectionsPage {
        user,
        environments,
        collections: list.collections,
        database: list.database,
        my_permission: list.my_permission,
        current_environment_id: id,
        current_database: db_name,
    }))
}

/// POST .../collections?/createCollection | ?/updateCollection | ?/deleteCollection
pub async fn actions(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
    Path((id, db_name)): Path<(String, String)>,
    action: ActionName,
    form: FormFields,
) -> Result<Redirect, ApiError> {
    let scope = DatabaseScope { id: &id, db_name: &db_name };
    match action.as_str() {
        "createCollection" => create_collection(&state, &token, scope, &form).await,
        "updateCollection" => update_collection(&state, &token, scope, &form).await,
        "deleteCollection" => delete_collection(&state, &token, scope, &form).await,
        other => Err(ApiError::unknown_action(other)),
    }
}

#[derive(Clone, Copy)]
struct DatabaseScope<'a> {
    id: &'a str,
    db_name: &'a str,
}

impl<'a> DatabaseScope<'a> {
    fn collections(&self) -> [&'a str; 5] {
        ["environments", self.id, "databases", self.db_name, "collections"]
    }

    fn listing(&self) -> Redirect {
        Redirect::to(&page_path(&self.collections()))
    }
}

async fn create_collection(
    state: &AppState,
    token: &str,
    scope: DatabaseScope<'_>,
    form: &FormFields,
) -> Result<Redirect, ApiError> {
    let collection_name = form.require("collectionName", "Invalid collection name")?;

    state
        .backend
        .send_json(
            Method::POST,
            token,
            &scope.collections(),
            &CreateCollectionRequest { collection_name },
        )
        .await
        .map_err(|e| action_failed(e, "Failed to create collection"))?;

    tracing::info!(database = scope.db_name, collection = collection_name, "Collection created");
    Ok(scope.listing())
}

async fn update_collection(
    state: &AppState,
    token: &str,
    scope: DatabaseScope<'_>,
    form: &FormFields,
) -> Result<Redirect, ApiError> {
    let old_collection_name = form.require("oldCollectionName", "Invalid form data")?;
    let new_collection_name = form.require("newCollectionName", "Invalid form data")?;

    let mut segments = scope.collections().to_vec();
    segments.push(old_collection_name);

    state
        .backend
        .send_json(
            Method::PUT,
            token,
            &segments,
            &RenameCollectionRequest { new_collection_name },
        )
        .await
        .map_err(|e| action_failed(e, "Failed to rename collection"))?;

    tracing::info!(
        database = scope.db_name,
        from = old_collection_name,
        to = new_collection_name,
        "Collection renamed"
    );
    Ok(scope.listing())
}

async fn delete_collection(
    state: &AppState,
    token: &str,
    scope: DatabaseScope<'_>,
    form: &FormFields,
) -> Result<Redirect, ApiError> {
    let collection_name = form.require("collectionName", "Invalid collection name")?;

    let mut segments = scope.collections().to_vec();
    segments.push(collection_name);

    state
        .backend
        .delete(token, &segments)
        .await
        .map_err(|e| action_failed(e, "Failed to delete collection"))?;

    tracing::info!(database = scope.db_name, collection = collection_name, "Collection deleted");
    Ok(scope.listing())
}
