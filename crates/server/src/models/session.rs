//! Session-related types.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use store_ratings_core::{Email, Role, StoreId, UserId};

use super::User;

/// Session-stored user identity.
///
/// Every field of [`User`] except the password. Also used as the public
/// representation of a user in responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub address: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_id: Option<StoreId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl From<&User> for SessionUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            address: user.address.clone(),
            role: user.role,
            store_id: user.store_id,
            avatar: user.avatar.clone(),
        }
    }
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_session_user_strips_password() {
        let user = User {
            id: UserId::new(2),
            name: "John Smith Regular User".to_owned(),
            email: Email::parse("john@example.com").unwrap(),
            address: "456 User Avenue".to_owned(),
            password_hash: Some("$argon2id$secret".to_owned()),
            role: Role::Customer,
            store_id: None,
            avatar: None,
        };

        let json = serde_json::to_value(SessionUser::from(&user)).unwrap();
        assert_eq!(json["id"], 2);
        assert_eq!(json["role"], "user");
        assert!(json.get("password").is_none());
        assert!(json.get("password_hash").is_none());
        assert!(!json.to_string().contains("argon2"));
    }

    #[test]
    fn test_session_user_roundtrips_through_session_store() {
        let raw = r#"{"id":3,"name":"Store Owner Mike Johnson","email":"mike@store.com","address":"789 Store Boulevard","role":"store_owner","store_id":1}"#;
        let user: SessionUser = serde_json::from_str(raw).unwrap();
        assert_eq!(user.store_id, Some(StoreId::new(1)));
        assert_eq!(user.role, Role::StoreOwner);
        assert!(user.avatar.is_none());
    }
}
