//! Authentication extractors and session helpers.
//!
//! The logged-in user lives in the session under
//! [`session_keys::CURRENT_USER`]. Every extractor re-reads that user from the
//! Data Store, so role changes and deletions apply to sessions that already
//! exist. Extractors reject with `401` when nobody is logged in (or the
//! account is gone) and `403` when the user has the wrong role.

use axum::{
    Json,
    extract::{FromRef, FromRequestParts},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tower_sessions::Session;

use store_ratings_core::Role;

use crate::models::{SessionUser, session_keys};
use crate::state::AppState;

/// Error returned when an extractor cannot authorize the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    /// Nobody is logged in.
    Unauthorized,
    /// Logged in with a role that may not use this endpoint.
    Forbidden,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, "Please log in to continue"),
            Self::Forbidden => (
                StatusCode::FORBIDDEN,
                "You do not have permission to access this resource",
            ),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// The session's user as currently stored in the Data Store.
///
/// A session whose user has been deleted is logged out.
async fn current_user(parts: &Parts, state: &AppState) -> Option<SessionUser> {
    let session = parts.extensions.get::<Session>()?;
    let stored = session
        .get::<SessionUser>(session_keys::CURRENT_USER)
        .await
        .ok()
        .flatten()?;

    let fresh = state
        .store()
        .read()
        .await
        .users
        .find_by_id(stored.id)
        .map(SessionUser::from);

    if fresh.is_none() {
        tracing::warn!(user_id = %stored.id, "Session user no longer exists");
        if let Err(e) = clear_current_user(session).await {
            tracing::error!(error = %e, "Failed to clear stale session");
        }
    }
    fresh
}

/// Extractor that requires a logged-in user of any role.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.name)
/// }
/// ```
pub struct RequireAuth(pub SessionUser);

impl<S> FromRequestParts<S> for RequireAuth
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        current_user(parts, &AppState::from_ref(state))
            .await
            .map(Self)
            .ok_or(AuthRejection::Unauthorized)
    }
}

/// Defines an extractor that requires a logged-in user with one role.
macro_rules! require_role {
    ($(#[$meta:meta])* $name:ident, $role:path) => {
        $(#[$meta])*
        pub struct $name(pub SessionUser);

        impl<S> FromRequestParts<S> for $name
        where
            AppState: FromRef<S>,
            S: Send + Sync,
        {
            type Rejection = AuthRejection;

            async fn from_request_parts(
                parts: &mut Parts,
                state: &S,
            ) -> Result<Self, Self::Rejection> {
                let user = current_user(parts, &AppState::from_ref(state))
                    .await
                    .ok_or(AuthRejection::Unauthorized)?;

                if user.role != $role {
                    tracing::warn!(
                        user_id = %user.id,
                        role = %user.role,
                        path = %parts.uri.path(),
                        "Rejected request for wrong role"
                    );
                    return Err(AuthRejection::Forbidden);
                }

                Ok(Self(user))
            }
        }
    };
}

require_role!(
    /// Extractor that requires an administrator.
    RequireAdmin,
    Role::Admin
);

require_role!(
    /// Extractor that requires a store owner.
    RequireStoreOwner,
    Role::StoreOwner
);

require_role!(
    /// Extractor that requires a customer (the `user` role).
    RequireCustomer,
    Role::Customer
);

/// Extractor that optionally gets the current user.
///
/// Unlike `RequireAuth`, this does not reject the request if nobody is
/// logged in.
pub struct OptionalAuth(pub Option<SessionUser>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(current_user(parts, &AppState::from_ref(state)).await))
    }
}

/// Helper to set the current user in the session.
///
/// The session ID is cycled first so a login never reuses an earlier ID.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &SessionUser,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_USER, user).await
}

/// Helper to clear the current user from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<SessionUser>(session_keys::CURRENT_USER)
        .await?;
    Ok(())
}
