//! Store management.

use axum::{extract::State, http::StatusCode};

use store_ratings_core::StoreId;

use crate::error::Result;
use crate::routes::extract::{Json, Path, Query};
use crate::middleware::RequireAdmin;
use crate::models::Store;
use crate::services::admin::{AdminService, CreateStore, UpdateStore};
use crate::services::directory::{DirectoryService, StoreDetails, StoreListQuery, StoreRow};
use crate::state::AppState;

/// Search and sort stores.
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(query): Query<StoreListQuery>,
) -> Json<Vec<StoreRow>> {
    Json(DirectoryService::new(state.store()).list_stores(&query).await)
}

/// One store with its owner, raters and star distribution.
pub async fn show(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<StoreId>,
) -> Result<Json<StoreDetails>> {
    Ok(Json(
        DirectoryService::new(state.store()).store_details(id).await?,
    ))
}

/// Add a store for an existing store owner.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(form): Json<CreateStore>,
) -> Result<(StatusCode, Json<Store>)> {
    let store = AdminService::new(state.store()).create_store(form).await?;

    tracing::info!(admin_id = %admin.id, store_id = %store.id, owner_id = %store.owner_id, "Store created");
    Ok((StatusCode::CREATED, Json(store)))
}

/// Edit a store.
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<StoreId>,
    Json(form): Json<UpdateStore>,
) -> Result<Json<Store>> {
    let store = AdminService::new(state.store())
        .update_store(id, form)
        .await?;

    tracing::info!(admin_id = %admin.id, store_id = %store.id, "Store updated");
    Ok(Json(store))
}

/// Delete a store and clear its owner's reference to it.
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<StoreId>,
) -> Result<Json<Store>> {
    let store = AdminService::new(state.store()).delete_store(id).await?;

    tracing::info!(admin_id = %admin.id, store_id = %store.id, "Store deleted");
    Ok(Json(store))
}
