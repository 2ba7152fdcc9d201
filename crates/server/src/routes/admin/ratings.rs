//! Rating moderation.

use axum::extract::State;

use store_ratings_core::RatingId;

use crate::error::Result;
use crate::routes::extract::{Json, Path};
use crate::middleware::RequireAdmin;
use crate::models::Rating;
use crate::services::directory::{DirectoryService, RatingByUser};
use crate::services::ratings::RatingService;
use crate::state::AppState;

/// Every rating with its author.
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Json<Vec<RatingByUser>> {
    Json(DirectoryService::new(state.store()).list_ratings().await)
}

/// One rating with its author.
pub async fn show(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<RatingId>,
) -> Result<Json<RatingByUser>> {
    Ok(Json(DirectoryService::new(state.store()).rating(id).await?))
}

/// Delete a rating; its store's average is recomputed.
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<RatingId>,
) -> Result<Json<Rating>> {
    let rating = RatingService::new(state.store()).delete(id).await?;

    tracing::info!(
        admin_id = %admin.id,
        rating_id = %rating.id,
        store_id = %rating.store_id,
        "Rating deleted"
    );
    Ok(Json(rating))
}
