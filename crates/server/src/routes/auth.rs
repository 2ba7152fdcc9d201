//! Authentication route handlers.
//!
//! Login, signup, logout, session refresh and password change. The session
//! holds a password-stripped [`SessionUser`] under `current_user`.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use super::extract::Json;
use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{
    AuthRejection, OptionalAuth, RequireAuth, clear_current_user, set_current_user,
};
use crate::models::{SessionUser, session_keys};
use crate::services::auth::{AuthService, Signup};
use crate::state::AppState;

// =============================================================================
// Request Types
// =============================================================================

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Signup request body.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub password: String,
}

/// Password change request body.
#[derive(Debug, Deserialize)]
pub struct PasswordRequest {
    #[serde(default)]
    pub new_password: String,
    #[serde(default)]
    pub confirm_password: String,
}

async fn start_session(session: &Session, user: &SessionUser) -> Result<()> {
    set_current_user(session, user).await?;
    set_sentry_user(&user.id, Some(user.email.as_str()));
    Ok(())
}

// =============================================================================
// Handlers
// =============================================================================

/// Log in with email and password.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<LoginRequest>,
) -> Result<Json<SessionUser>> {
    let user = match AuthService::new(state.store())
        .login(&form.email, &form.password)
        .await
    {
        Ok(user) => user,
        Err(e) => {
            tracing::warn!(error = %e, "Login failed");
            return Err(e.into());
        }
    };

    start_session(&session, &user).await?;
    tracing::info!(user_id = %user.id, role = %user.role, "User logged in");

    Ok(Json(user))
}

/// Create a customer account and log it in.
pub async fn signup(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<SignupRequest>,
) -> Result<(StatusCode, Json<SessionUser>)> {
    let user = AuthService::new(state.store())
        .signup(Signup {
            name: &form.name,
            email: &form.email,
            address: &form.address,
            password: &form.password,
        })
        .await?;

    start_session(&session, &user).await?;
    tracing::info!(user_id = %user.id, "User signed up");

    Ok((StatusCode::CREATED, Json(user)))
}

/// Log out. Succeeds whether or not anyone was logged in.
pub async fn logout(session: Session, OptionalAuth(user): OptionalAuth) -> Result<StatusCode> {
    clear_current_user(&session).await?;
    clear_sentry_user();

    if let Some(user) = user {
        tracing::info!(user_id = %user.id, "User logged out");
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Return the logged-in user as currently stored.
///
/// The session copy is rewritten so it follows profile and role edits. A
/// session whose user has been deleted was already cleared by the extractor
/// and is answered with 401.
pub async fn current_session(
    session: Session,
    OptionalAuth(user): OptionalAuth,
) -> Result<Response> {
    let Some(user) = user else {
        clear_sentry_user();
        return Ok(AuthRejection::Unauthorized.into_response());
    };

    session.insert(session_keys::CURRENT_USER, &user).await?;
    Ok(Json(user).into_response())
}

/// Change the logged-in user's password.
pub async fn change_password(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(form): Json<PasswordRequest>,
) -> Result<StatusCode> {
    AuthService::new(state.store())
        .change_password(user.id, &form.new_password, &form.confirm_password)
        .await?;

    tracing::info!(user_id = %user.id, "Password changed");
    Ok(StatusCode::NO_CONTENT)
}
