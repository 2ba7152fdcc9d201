//! Simulated latency for mutating requests.
//!
//! Demo deployments can slow down writes to make loading states visible.
//! The delay runs before the handler and never while the Data Store is
//! locked.

use axum::{
    extract::{Request, State},
    http::Method,
    middleware::Next,
    response::Response,
};

use crate::state::AppState;

/// Sleep for the configured delay before non-`GET`/`HEAD` requests.
pub async fn simulated_latency_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let delay = state.config().simulated_latency;
    let is_read = matches!(*request.method(), Method::GET | Method::HEAD);

    if !is_read && !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    next.run(request).await
}
