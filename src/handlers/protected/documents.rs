use axum::{
    extract::{Path, State},
    http::Method,
    response::{Json, Redirect},
};
use serde::Serialize;
use serde_json::Value;

use super::{load_navigation, Navigation};
use crate::api::models::{DocumentDetail, DocumentList, Environment, User};
use crate::error::ApiError;
use crate::handlers::{action_failed, fallback_to, page_path};
use crate::middleware::{ActionName, FormFields, SessionToken};
use crate::router::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentsPage {
    pub user: User,
    pub environments: Vec<Environment>,
    pub documents: Vec<Value>,
    pub database: Option<String>,
    pub collection: Option<String>,
    pub current_environment_id: String,
    pub current_database: String,
    pub current_collection: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentPage {
    pub user: User,
    pub environments: Vec<Environment>,
    pub document: Value,
    pub database: Option<String>,
    pub collection: Option<String>,
    pub current_environment_id: String,
    pub current_database: String,
    pub current_collection: String,
    #[serde(rename = "docID")]
    pub doc_id: String,
}

/// Path params shared by every documents route
struct CollectionScope {
    id: String,
    db_name: String,
    collection_name: String,
}

impl CollectionScope {
    fn documents(&self) -> [&str; 7] {
        [
            "environments",
            &self.id,
            "databases",
            &self.db_name,
            "collections",
            &self.collection_name,
            "documents",
        ]
    }

    fn document<'a>(&'a self, doc_id: &'a str) -> Vec<&'a str> {
        let mut segments = self.documents().to_vec();
        segments.push(doc_id);
        segments
    }

    fn listing(&self) -> Redirect {
        Redirect::to(&page_path(&self.documents()))
    }
}

/// The `document` field, checked to be JSON. The text itself is what gets sent.
fn document_text(form: &FormFields) -> Result<&str, ApiError> {
    let text = form.require("document", "Invalid document data")?;
    if let Err(e) = serde_json::from_str::<Value>(text) {
        tracing::debug!("Rejected document JSON: {}", e);
        return Err(ApiError::bad_request("Invalid JSON format"));
    }
    Ok(text)
}

/// GET /environments/:id/databases/:db_name/collections/:collection_name/documents
pub async fn list(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
    Path((id, db_name, collection_name)): Path<(String, String, String)>,
) -> Result<Json<DocumentsPage>, ApiError> {
    let Navigation { user, environments } = load_navigation(&state.backend, &token).await?;
    let scope = CollectionScope { id, db_name, collection_name };

    let list: DocumentList = state
        .backend
        .get(&token, &scope.documents())
        .await
        .map_err(|e| fallback_to(e, page_path(&["environments", &scope.id, "databases", &scope.db_name])))?;

    Ok(Json(DocumentsPage {
        user,
        environments,
        documents: list.documents,
        database: list.database,
        collection: list.collection,
        current_environment_id: scope.id,
        current_database: scope.db_name,
        current_collection: scope.collection_name,
    }))
}

/// POST .../documents?/createDocument | ?/deleteDocument
pub async fn actions(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
    Path((id, db_name, collection_name)): Path<(String, String, String)>,
    action: ActionName,
    form: FormFields,
) -> Result<Redirect, ApiError> {
    let scope = CollectionScope { id, db_name, collection_name };
    match action.as_str() {
        "createDocument" => create_document(&state, &token, &scope, &form).await,
        "deleteDocument" => delete_document(&state, &token, &scope, &form).await,
        other => Err(ApiError::unknown_action(other)),
    }
}

async fn create_document(
    state: &AppState,
    token: &str,
    scope: &CollectionScope,
    form: &FormFields,
) -> Result<Redirect, ApiError> {
    let document = document_text(form)?;

    state
        .backend
        .send_raw_json(Method::POST, token, &scope.documents(), document)
        .await
        .map_err(|e| action_failed(e, "Failed to create document"))?;

    tracing::info!(collection = %scope.collection_name, "Document created");
    Ok(scope.listing())
}

async fn delete_document(
    state: &AppState,
    token: &str,
    scope: &CollectionScope,
    form: &FormFields,
) -> Result<Redirect, ApiError> {
    let doc_id = form.require("docID", "Invalid document ID")?;

    state
        .backend
        .delete(token, &scope.document(doc_id))
        .await
        .map_err(|e| action_failed(e, "Failed to delete document"))?;

    tracing::info!(collection = %scope.collection_name, doc_id, "Document deleted");
    Ok(scope.listing())
}

/// GET .../documents/:doc_id
pub async fn show(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
    Path((id, db_name, collection_name, doc_id)): Path<(String, String, String, String)>,
) -> Result<Json<DocumentPage>, ApiError> {
    let Navigation { user, environments } = load_navigation(&state.backend, &token).await?;
    let scope = CollectionScope { id, db_name, collection_name };

    let detail: DocumentDetail = state
        .backend
        .get(&token, &scope.document(&doc_id))
        .await
        .map_err(|e| fallback_to(e, page_path(&scope.documents())))?;

    Ok(Json(DocumentPage {
        user,
        environments,
        document: detail.document,
        database: detail.database,
        collection: detail.collection,
        current_environment_id: scope.id,
        current_database: scope.db_name,
        current_collection: scope.collection_name,
        doc_id,
    }))
}

/// POST .../documents/:doc_id - replace the document with the submitted JSON
pub async fn update(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
    Path((id, db_name, collection_name, doc_id)): Path<(String, String, String, String)>,
    action: ActionName,
    form: FormFields,
) -> Result<Redirect, ApiError> {
    action.require_default()?;
    let scope = CollectionScope { id, db_name, collection_name };
    let document = document_text(&form)?;

    state
        .backend
        .send_raw_json(Method::PUT, &token, &scope.document(&doc_id), document)
        .await
        .map_err(|e| action_failed(e, "Failed to update document"))?;

    tracing::info!(collection = %scope.collection_name, doc_id = %doc_id, "Document updated");
    Ok(scope.listing())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_text_requires_json() {
        let form = FormFields::parse(b"document=%7B%22name%22%3A%22x%22%7D");
        assert_eq!(document_text(&form), Ok(r#"{"name":"x"}"#));

        let form = FormFields::parse(b"document=%7Bname");
        assert_eq!(document_text(&form), Err(ApiError::bad_request("Invalid JSON format")));

        let form = FormFields::parse(b"other=1");
        assert_eq!(document_text(&form), Err(ApiError::bad_request("Invalid document data")));
    }

    #[test]
    fn test_document_segments_encode_as_one() {
        let scope = CollectionScope {
            id: "1".to_string(),
            db_name: "shop".to_string(),
            collection_name: "orders".to_string(),
        };
        assert_eq!(
            page_path(&scope.document("a/b")),
            "/environments/1/databases/shop/collections/orders/documents/a%2Fb"
        );
    }
}
