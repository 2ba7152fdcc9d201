//! Store owner dashboard.

use axum::extract::State;

use super::extract::Json;

use crate::middleware::RequireStoreOwner;
use crate::services::directory::{DirectoryService, OwnerDashboard};
use crate::state::AppState;

/// The caller's store and the users who rated it.
///
/// An owner without a store gets `"store": null`.
pub async fn dashboard(
    State(state): State<AppState>,
    RequireStoreOwner(user): RequireStoreOwner,
) -> Json<OwnerDashboard> {
    Json(
        DirectoryService::new(state.store())
            .owner_dashboard(user.id)
            .await,
    )
}
