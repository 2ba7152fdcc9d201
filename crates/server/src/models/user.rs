//! User domain types.

use store_ratings_core::{Email, Role, StoreId, UserId};

/// A user account.
///
/// Deliberately not `Serialize`: responses go through
/// [`SessionUser`](super::SessionUser), which has no password field.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Login email, unique across users.
    pub email: Email,
    /// Postal address.
    pub address: String,
    /// Argon2 PHC string. `None` means the account cannot log in.
    pub password_hash: Option<String>,
    /// Role of the user.
    pub role: Role,
    /// Owned store (store owners only).
    pub store_id: Option<StoreId>,
    /// Avatar image reference.
    pub avatar: Option<String>,
}

impl User {
    /// Whether `needle_lower` occurs in the name, email or address.
    #[must_use]
    pub fn matches_search(&self, needle_lower: &str) -> bool {
        needle_lower.is_empty()
            || self.name.to_lowercase().contains(needle_lower)
            || self.email.contains_ignore_case(needle_lower)
            || self.address.to_lowercase().contains(needle_lower)
    }
}

/// Fields of a user about to be inserted. The ID is assigned on insert.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: Email,
    pub address: String,
    pub password_hash: Option<String>,
    pub role: Role,
    pub store_id: Option<StoreId>,
    pub avatar: Option<String>,
}

impl NewUser {
    /// Build the stored record once an ID has been allocated.
    #[must_use]
    pub fn into_user(self, id: UserId) -> User {
        User {
            id,
            name: self.name,
            email: self.email,
            address: self.address,
            password_hash: self.password_hash,
            role: self.role,
            store_id: self.store_id,
            avatar: self.avatar,
        }
    }
}

/// Partial update of a user. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<Email>,
    pub address: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<Role>,
    pub store_id: Option<Option<StoreId>>,
    pub avatar: Option<Option<String>>,
}

impl UserPatch {
    /// Merge the present fields into `user`.
    pub fn apply(self, user: &mut User) {
        if let Some(name) = self.name {
            user.name = name;
        }
        if let Some(email) = self.email {
            user.email = email;
        }
        if let Some(address) = self.address {
            user.address = address;
        }
        if let Some(hash) = self.password_hash {
            user.password_hash = Some(hash);
        }
        if let Some(role) = self.role {
            user.role = role;
        }
        if let Some(store_id) = self.store_id {
            user.store_id = store_id;
        }
        if let Some(avatar) = self.avatar {
            user.avatar = avatar;
        }
    }
}
