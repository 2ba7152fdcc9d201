//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                    - Liveness
//! GET  /health/ready              - Readiness
//!
//! # Auth
//! POST /auth/login                - Log in
//! POST /auth/signup               - Create a customer account and log in
//! POST /auth/logout               - Log out
//! GET  /auth/session              - Current session user
//! POST /auth/password             - Change own password
//!
//! # Any logged-in user
//! GET  /api/profile               - Own details and submitted ratings
//! GET  /api/stores                - Store directory (?search=)
//!
//! # Customer
//! POST /api/stores/{id}/rating    - Submit or replace a rating
//!
//! # Store owner
//! GET  /api/owner/dashboard       - Own store and its raters
//!
//! # Admin
//! GET  /api/admin/dashboard       - Totals and non-admin users
//! GET  /api/admin/users           - List (?search=&role=&sort=&direction=)
//! POST /api/admin/users           - Create
//! GET|PATCH|DELETE /api/admin/users/{id}
//! GET  /api/admin/stores          - List (?search=&sort=&direction=)
//! POST /api/admin/stores          - Create
//! GET|PATCH|DELETE /api/admin/stores/{id}
//! GET  /api/admin/ratings         - List
//! GET|DELETE /api/admin/ratings/{id}
//! ```

pub mod admin;
pub mod auth;
pub mod extract;
pub mod owner;
pub mod profile;
pub mod stores;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/signup", post(auth::signup))
        .route("/logout", post(auth::logout))
        .route("/session", get(auth::current_session))
        .route("/password", post(auth::change_password))
}

/// Create the JSON API router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(profile::show))
        .route("/stores", get(stores::index))
        .route("/stores/{id}/rating", post(stores::rate))
        .route("/owner/dashboard", get(owner::dashboard))
        .nest("/admin", admin::routes())
}

/// Create all application routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/api", api_routes())
}
