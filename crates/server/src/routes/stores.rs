//! Store directory and rating submission.

use axum::{extract::State, http::StatusCode};
use serde::Deserialize;

use store_ratings_core::StoreId;

use super::extract::{Json, Path, Query};
use crate::error::{Result, add_breadcrumb};
use crate::middleware::{RequireAuth, RequireCustomer};
use crate::services::directory::{DirectoryEntry, DirectoryService};
use crate::services::ratings::{RatingService, Submission};
use crate::state::AppState;

/// Query parameters of the store directory.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DirectoryQuery {
    pub search: Option<String>,
}

/// Rating submission body.
#[derive(Debug, Deserialize)]
pub struct RatingRequest {
    pub value: i64,
}

/// List stores matching the search, each with the caller's own rating.
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(query): Query<DirectoryQuery>,
) -> Json<Vec<DirectoryEntry>> {
    Json(
        DirectoryService::new(state.store())
            .store_directory(user.id, query.search.as_deref())
            .await,
    )
}

/// Submit or replace the caller's rating of a store.
///
/// Answers 201 for a first rating and 200 when an existing one was updated.
pub async fn rate(
    State(state): State<AppState>,
    RequireCustomer(user): RequireCustomer,
    Path(store_id): Path<StoreId>,
    Json(form): Json<RatingRequest>,
) -> Result<(StatusCode, Json<Submission>)> {
    let submission = RatingService::new(state.store())
        .submit(user.id, store_id, form.value)
        .await?;

    let store_id = store_id.to_string();
    add_breadcrumb("rating", "Submitted rating", Some(&[("store_id", &store_id)]));
    tracing::info!(
        user_id = %user.id,
        store_id = %submission.store.id,
        value = submission.rating.value.get(),
        average = submission.store.average_rating,
        created = submission.created,
        "Rating submitted"
    );

    let status = if submission.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(submission)))
}
