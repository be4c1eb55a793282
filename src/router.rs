use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::api::{BackendClient, BackendError};
use crate::config::AppConfig;
use crate::handlers::{protected, public};

/// Shared by every handler: the effective config and one pooled API client
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub backend: BackendClient,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self, BackendError> {
        let backend = BackendClient::new(&config.backend)?;
        Ok(Self {
            config: Arc::new(config),
            backend,
        })
    }
}

pub fn app(state: AppState) -> Router {
    let enable_request_logging = state.config.server.enable_request_logging;

    let router = Router::new()
        // Public
        .merge(public_routes())
        // Protected (session cookie required)
        .merge(environment_routes())
        .merge(database_routes())
        .merge(collection_routes())
        .merge(document_routes())
        .merge(settings_routes())
        .with_state(state);

    if enable_request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

fn public_routes() -> Router<AppState> {
    use public::{auth, health, root};

    Router::new()
        .route("/", get(root::index))
        .route("/health", get(health::health))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", post(auth::logout))
}

fn environment_routes() -> Router<AppState> {
    use protected::environments;

    Router::new()
        .route("/environments", get(environments::list).post(environments::actions))
        .route("/environments/:id", get(environments::show))
}

fn database_routes() -> Router<AppState> {
    use protected::databases;

    Router::new()
        .route(
            "/environments/:id/databases",
            get(databases::list).post(databases::actions),
        )
        .route("/environments/:id/databases/:db_name", get(databases::show))
}

fn collection_routes() -> Router<AppState> {
    use protected::collections;

    Router::new().route(
        "/environments/:id/databases/:db_name/collections",
        get(collections::list).post(collections::actions),
    )
}

fn document_routes() -> Router<AppState> {
    use protected::documents;

    Router::new()
        .route(
            "/environments/:id/databases/:db_name/collections/:collection_name/documents",
            get(documents::list).post(documents::actions),
        )
        .route(
            "/environments/:id/databases/:db_name/collections/:collection_name/documents/:doc_id",
            get(documents::show).post(documents::update),
        )
}

fn settings_routes() -> Router<AppState> {
    use protected::settings;

    Router::new().route("/settings", get(settings::layout))
}
