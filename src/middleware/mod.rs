pub mod form;
pub mod session;

pub use form::{ActionName, FormFields};
pub use session::{extract_token_from_headers, session_cookie, SessionToken, EXPIRED_SESSION_COOKIE, TOKEN_COOKIE};
