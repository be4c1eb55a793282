// handlers/mod.rs - two tiers of page handlers
//
// Public (no session) → Protected (session cookie required)
pub mod protected;
pub mod public;

use url::Url;

use crate::api::BackendError;
use crate::error::ApiError;

/// Build a page path from raw segments, percent-encoding each one so names
/// with spaces or slashes survive the round trip through `Location`.
pub fn page_path(segments: &[&str]) -> String {
    let mut url = match Url::parse("http://monji.invalid/") {
        Ok(url) => url,
        Err(_) => return format!("/{}", segments.join("/")),
    };
    if let Ok(mut path) = url.path_segments_mut() {
        path.clear().extend(segments);
    }
    url.path().to_string()
}

/// Read paths never surface backend failures; they navigate away instead
pub fn fallback_to(err: BackendError, location: impl Into<String>) -> ApiError {
    let location = location.into();
    tracing::warn!(status = ?err.status(), "Backend read failed ({}), redirecting to {}", err, location);
    ApiError::redirect(location)
}

/// Form actions report backend failures back to the form
pub fn action_failed(err: BackendError, message: &str) -> ApiError {
    tracing::warn!(status = ?err.status(), "{}: {}", message, err);
    ApiError::bad_request(message)
}
