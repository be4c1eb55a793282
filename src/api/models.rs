//! Shapes exchanged with the Monji API.
//!
//! Everything here is pass-through: fields are renamed where the page wants a
//! different spelling, and null or missing collections read as empty.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};

/// Go encodes empty slices as `null`; treat that like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default)]
    pub role: String,
    /// Cleared by the API before it answers; never forwarded to a page
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
    /// Fields this crate does not know about yet, passed through as-is
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Permissions {
    #[serde(default, deserialize_with = "null_as_default")]
    pub environments: Vec<EnvironmentPermission>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub databases: Vec<DatabasePermission>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnvironmentPermission {
    pub environment_id: i64,
    #[serde(default)]
    pub environment_name: String,
    pub permission: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatabasePermission {
    pub environment_id: i64,
    #[serde(default)]
    pub environment_name: String,
    pub db_name: String,
    pub permission: String,
}

/// `GET /whoami`
#[derive(Debug, Clone, Deserialize)]
pub struct WhoAmI {
    pub user: User,
    #[serde(default, deserialize_with = "null_as_default")]
    pub permissions: Permissions,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Environment {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub connection_string: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<i64>,
    #[serde(rename = "myPermission", default, skip_serializing_if = "Option::is_none")]
    pub my_permission: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `GET /environments`
#[derive(Debug, Clone, Deserialize)]
pub struct EnvironmentList {
    #[serde(default, deserialize_with = "null_as_default")]
    pub environments: Vec<Environment>,
}

/// `GET /environments/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct EnvironmentDetail {
    pub environment: Environment,
    #[serde(rename = "myPermission", default)]
    pub my_permission: Option<String>,
}

/// One entry of `listDatabases`, kept in the backend's spelling
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatabaseSummary {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "SizeOnDisk", default)]
    pub size_on_disk: i64,
    #[serde(rename = "Empty", default)]
    pub empty: bool,
    #[serde(rename = "myPermission", default, skip_serializing_if = "Option::is_none")]
    pub my_permission: Option<String>,
}

/// `GET /environments/{id}/databases`
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseList {
    #[serde(rename = "Databases", default, deserialize_with = "null_as_default")]
    pub databases: Vec<DatabaseSummary>,
    #[serde(rename = "TotalSize", default, deserialize_with = "null_as_default")]
    pub total_size: i64,
}

/// `GET /environments/{id}/databases/{dbName}`
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseDetail {
    pub database: String,
    #[serde(default)]
    pub stats: Value,
    #[serde(default, deserialize_with = "null_as_default")]
    pub collections: Vec<String>,
    #[serde(rename = "myPermission", default)]
    pub my_permission: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSummary {
    pub name: String,
    #[serde(default)]
    pub count: Option<Number>,
    #[serde(default)]
    pub size: Option<Number>,
    #[serde(default)]
    pub storage_size: Option<Number>,
    #[serde(default)]
    pub total_index_size: Option<Number>,
}

/// `GET .../collections`
#[derive(Debug, Clone, Deserialize)]
pub struct CollectionList {
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub collections: Vec<CollectionSummary>,
    #[serde(rename = "myPermission", default)]
    pub my_permission: Option<String>,
}

/// `GET .../documents`
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentList {
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default)]
    pub collection: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub documents: Vec<Value>,
}

/// `GET .../documents/{docID}`
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentDetail {
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default)]
    pub collection: Option<String>,
    #[serde(default)]
    pub document: Value,
}

/// `POST /login`. Absent form fields go out as `null`.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: Option<&'a str>,
    pub password: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct EnvironmentRequest<'a> {
    pub name: &'a str,
    pub connection_string: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDatabaseRequest<'a> {
    pub db_name: &'a str,
    pub initial_collection: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameDatabaseRequest<'a> {
    pub new_db_name: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCollectionRequest<'a> {
    pub collection_name: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameCollectionRequest<'a> {
    pub new_collection_name: &'a str,
}
