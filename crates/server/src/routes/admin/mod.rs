//! Administrator routes.
//!
//! Every handler takes [`RequireAdmin`](crate::middleware::RequireAdmin), so
//! anonymous callers get 401 and other roles get 403.

pub mod dashboard;
pub mod ratings;
pub mod stores;
pub mod users;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Create the admin routes router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard::show))
        .route("/users", get(users::index).post(users::create))
        .route(
            "/users/{id}",
            get(users::show).patch(users::update).delete(users::delete),
        )
        .route("/stores", get(stores::index).post(stores::create))
        .route(
            "/stores/{id}",
            get(stores::show).patch(stores::update).delete(stores::delete),
        )
        .route("/ratings", get(ratings::index))
        .route("/ratings/{id}", get(ratings::show).delete(ratings::delete))
}
