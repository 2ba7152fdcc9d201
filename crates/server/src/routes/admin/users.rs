//! User management.

use axum::{extract::State, http::StatusCode};

use store_ratings_core::UserId;

use crate::error::Result;
use crate::routes::extract::{Json, Path, Query};
use crate::middleware::RequireAdmin;
use crate::models::SessionUser;
use crate::services::admin::{AdminService, CreateUser, UpdateUser};
use crate::services::directory::{DirectoryService, UserDetails, UserListQuery, UserRow};
use crate::state::AppState;

/// Search, filter and sort users.
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(query): Query<UserListQuery>,
) -> Json<Vec<UserRow>> {
    Json(DirectoryService::new(state.store()).list_users(&query).await)
}

/// One user with their store and ratings.
pub async fn show(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<UserId>,
) -> Result<Json<UserDetails>> {
    Ok(Json(
        DirectoryService::new(state.store()).user_details(id).await?,
    ))
}

/// Add a user with any role.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(form): Json<CreateUser>,
) -> Result<(StatusCode, Json<SessionUser>)> {
    let user = AdminService::new(state.store()).create_user(form).await?;

    tracing::info!(admin_id = %admin.id, user_id = %user.id, role = %user.role, "User created");
    Ok((StatusCode::CREATED, Json(user)))
}

/// Edit a user.
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<UserId>,
    Json(form): Json<UpdateUser>,
) -> Result<Json<SessionUser>> {
    let user = AdminService::new(state.store()).update_user(id, form).await?;

    tracing::info!(admin_id = %admin.id, user_id = %user.id, "User updated");
    Ok(Json(user))
}

/// Delete a user. Their ratings are kept.
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<UserId>,
) -> Result<Json<SessionUser>> {
    let user = AdminService::new(state.store()).delete_user(id).await?;

    tracing::info!(admin_id = %admin.id, user_id = %user.id, "User deleted");
    Ok(Json(user))
}
