//! Authentication routes

use axum::{routing::get, Router};

use super::handlers;

/// Creates and returns the authentication router
///
/// # Routes
/// - `GET /login` - Redirect to the provider's authorization endpoint
/// - `GET /callback` - Complete the authorization-code flow
/// - `GET /logout` - Clear the session and redirect to provider logout
pub fn auth_routes() -> Router {
    Router::new()
        .route("/login", get(handlers::login))
        .route("/callback", get(handlers::callback))
        .route("/logout", get(handlers::logout))
}
