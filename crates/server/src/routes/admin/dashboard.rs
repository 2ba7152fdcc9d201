//! Admin dashboard.

use axum::extract::State;

use crate::routes::extract::Json;

use crate::middleware::RequireAdmin;
use crate::services::directory::{AdminDashboard, DirectoryService};
use crate::state::AppState;

/// Totals plus the non-admin users.
pub async fn show(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Json<AdminDashboard> {
    Json(DirectoryService::new(state.store()).admin_dashboard().await)
}
