//! Profile of the logged-in user.

use axum::extract::State;

use super::extract::Json;

use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::services::directory::{DirectoryService, Profile};
use crate::state::AppState;

/// The session user and the ratings they submitted.
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Profile>> {
    let profile = DirectoryService::new(state.store())
        .profile(user.id)
        .await?;
    Ok(Json(profile))
}
