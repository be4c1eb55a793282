// handlers/public/mod.rs - handlers reachable without a session
//
// These either establish the session (login), end it (logout), or route the
// visitor based on whether one exists.
pub mod auth;
pub mod health;
pub mod root;
