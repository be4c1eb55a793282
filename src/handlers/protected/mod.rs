// handlers/protected/mod.rs - handlers behind the session cookie
//
// Every handler here takes `SessionToken` first, so a request without a
// session is redirected to /login before any form parsing or backend call.
// Page loaders return their page data as JSON; form actions answer with a
// 303 on success or a `{error}` payload on failure.
pub mod collections;
pub mod databases;
pub mod documents;
pub mod environments;
pub mod settings;

use crate::api::models::{Environment, EnvironmentList, User, WhoAmI};
use crate::api::BackendClient;
use crate::error::ApiError;

use super::fallback_to;

/// Data every page with a navbar needs: who is logged in and which
/// environments they can pick from.
#[derive(Debug, Clone)]
pub struct Navigation {
    pub user: User,
    pub environments: Vec<Environment>,
}

/// `GET /whoami` then `GET /environments`; either failing ends the session at /login
pub async fn load_navigation(backend: &BackendClient, token: &str) -> Result<Navigation, ApiError> {
    let whoami: WhoAmI = backend
        .get(token, &["whoami"])
        .await
        .map_err(|e| fallback_to(e, "/login"))?;

    let list: EnvironmentList = backend
        .get(token, &["environments"])
        .await
        .map_err(|e| fallback_to(e, "/login"))?;

    Ok(Navigation {
        user: whoami.user,
        environments: list.environments,
    })
}
