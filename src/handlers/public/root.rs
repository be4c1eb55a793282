use axum::response::Redirect;

use crate::middleware::SessionToken;

/// GET / - send visitors to the environments list, or to login without a session
pub async fn index(session: Option<SessionToken>) -> Redirect {
    match session {
        Some(_) => Redirect::to("/environments"),
        None => Redirect::to("/login"),
    }
}
