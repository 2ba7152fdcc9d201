//! User and store management for administrators.
//!
//! Admin forms use the strict rules: 20-60 character names, the bounded
//! password rule and addresses of at most 400 characters.

use serde::Deserialize;
use tracing::warn;

use store_ratings_core::validation::{
    address_check, bounded_password_check, parse_email, required, store_name_check,
    strict_name_check,
};
use store_ratings_core::{Field, Role, StoreId, UserId, ValidationError};

use super::ServiceError;
use super::auth::hash_password;
use crate::db::stores::{delete_store, insert_store, update_store};
use crate::db::users::{insert_user, update_user};
use crate::db::{DataStore, RepositoryError, Tables, UserRepository};
use crate::models::{NewStore, NewUser, SessionUser, Store, StorePatch, UserPatch};

// =============================================================================
// Input Types
// =============================================================================

/// Admin "add user" form.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub address: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<Role>,
}

/// Partial user edit. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
}

/// Admin "add store" form.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateStore {
    pub name: String,
    pub email: String,
    pub address: String,
    #[serde(default)]
    pub owner_id: Option<UserId>,
    #[serde(default)]
    pub image: Option<String>,
}

/// Partial store edit. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateStore {
    pub name: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub owner_id: Option<UserId>,
    pub image: Option<String>,
}

// =============================================================================
// Service
// =============================================================================

/// The owner must exist and have the store owner role.
fn check_store_owner(tables: &Tables, owner_id: UserId) -> Result<(), ServiceError> {
    match tables.users.find_by_id(owner_id) {
        Some(user) if user.role == Role::StoreOwner => Ok(()),
        _ => Err(ValidationError::OwnerRequired.into()),
    }
}

/// Admin management service.
pub struct AdminService<'a> {
    store: &'a DataStore,
}

impl<'a> AdminService<'a> {
    /// Create a new admin service.
    #[must_use]
    pub const fn new(store: &'a DataStore) -> Self {
        Self { store }
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// Create a user of any role.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Validation` for the first failing field.
    /// Returns `ServiceError::Duplicate` if the email is already registered.
    pub async fn create_user(&self, form: CreateUser) -> Result<SessionUser, ServiceError> {
        strict_name_check(&form.name)?;
        required(Field::Email, &form.email)?;
        let email = parse_email(&form.email)?;
        address_check(&form.address)?;
        bounded_password_check(&form.password)?;
        let role = form.role.ok_or(ValidationError::RoleRequired)?;

        if UserRepository::new(self.store)
            .get_by_email(&email)
            .await
            .is_some()
        {
            return Err(duplicate_email());
        }

        let password_hash = hash_password(&form.password).map_err(|_| ServiceError::PasswordHash)?;

        let user = insert_user(
            &mut *self.store.write().await,
            NewUser {
                name: form.name,
                email,
                address: form.address,
                password_hash: Some(password_hash),
                role,
                store_id: None,
                avatar: None,
            },
        )
        .map_err(|e| match e {
            RepositoryError::Conflict(_) => duplicate_email(),
            other => ServiceError::from_repository(other, "user"),
        })?;

        Ok(SessionUser::from(&user))
    }

    /// Apply a partial edit to a user.
    ///
    /// A user who owns a store keeps the store owner role until the store is
    /// reassigned or deleted.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Validation` for the first failing field.
    /// Returns `ServiceError::NotFound` if the user does not exist.
    /// Returns `ServiceError::Duplicate` if the email belongs to another user.
    /// Returns `ServiceError::Forbidden` when demoting a store's owner.
    pub async fn update_user(
        &self,
        id: UserId,
        update: UpdateUser,
    ) -> Result<SessionUser, ServiceError> {
        if let Some(name) = &update.name {
            strict_name_check(name)?;
        }
        let email = update
            .email
            .as_deref()
            .map(|email| {
                required(Field::Email, email)?;
                parse_email(email)
            })
            .transpose()?;
        if let Some(address) = &update.address {
            address_check(address)?;
        }
        let password_hash = match update.password.as_deref() {
            Some(password) => {
                bounded_password_check(password)?;
                Some(hash_password(password).map_err(|_| ServiceError::PasswordHash)?)
            }
            None => None,
        };

        let mut tables = self.store.write().await;

        if let Some(role) = update.role
            && role != Role::StoreOwner
            && tables.stores.find_one(|s| s.owner_id == id).is_some()
        {
            return Err(ServiceError::Forbidden(
                "Reassign this user's store before changing their role",
            ));
        }

        let patch = UserPatch {
            name: update.name,
            email,
            address: update.address,
            password_hash,
            role: update.role,
            ..UserPatch::default()
        };

        let user = update_user(&mut tables, id, patch)
            .map_err(|e| ServiceError::from_repository(e, "user"))?;

        Ok(SessionUser::from(&user))
    }

    /// Delete a user. Their ratings are kept.
    ///
    /// A store the user owned keeps its now dangling `owner_id`.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the user does not exist.
    /// Returns `ServiceError::Forbidden` for administrators.
    pub async fn delete_user(&self, id: UserId) -> Result<SessionUser, ServiceError> {
        let mut tables = self.store.write().await;

        let user = tables
            .users
            .find_by_id(id)
            .ok_or(ServiceError::NotFound("user"))?;
        if user.role == Role::Admin {
            return Err(ServiceError::Forbidden("Administrators cannot be deleted"));
        }

        if let Some(store) = tables.stores.find_one(|s| s.owner_id == id) {
            warn!(user_id = %id, store_id = %store.id, "Deleting owner of an existing store");
        }

        let user = tables
            .users
            .remove(id)
            .ok_or(ServiceError::NotFound("user"))?;

        Ok(SessionUser::from(&user))
    }

    // =========================================================================
    // Stores
    // =========================================================================

    /// Create a store and point its owner at it.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Validation` for the first failing field, or
    /// `OwnerRequired` if the owner is missing or not a store owner.
    pub async fn create_store(&self, form: CreateStore) -> Result<Store, ServiceError> {
        store_name_check(&form.name)?;
        required(Field::Email, &form.email)?;
        let email = parse_email(&form.email)?;
        address_check(&form.address)?;
        let owner_id = form.owner_id.ok_or(ValidationError::OwnerRequired)?;

        let mut tables = self.store.write().await;
        check_store_owner(&tables, owner_id)?;

        insert_store(
            &mut tables,
            NewStore {
                name: form.name,
                email,
                address: form.address,
                owner_id,
                image: form.image,
            },
        )
        .map_err(|e| ServiceError::from_repository(e, "store"))
    }

    /// Apply a partial edit to a store. An owner change moves the owner
    /// back-reference.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Validation` for the first failing field.
    /// Returns `ServiceError::NotFound` if the store does not exist.
    pub async fn update_store(
        &self,
        id: StoreId,
        update: UpdateStore,
    ) -> Result<Store, ServiceError> {
        if let Some(name) = &update.name {
            store_name_check(name)?;
        }
        let email = update
            .email
            .as_deref()
            .map(|email| {
                required(Field::Email, email)?;
                parse_email(email)
            })
            .transpose()?;
        if let Some(address) = &update.address {
            address_check(address)?;
        }

        let mut tables = self.store.write().await;

        if tables.stores.find_by_id(id).is_none() {
            return Err(ServiceError::NotFound("store"));
        }
        if let Some(owner_id) = update.owner_id {
            check_store_owner(&tables, owner_id)?;
        }

        let patch = StorePatch {
            name: update.name,
            email,
            address: update.address,
            owner_id: update.owner_id,
            image: update.image.map(Some),
        };

        update_store(&mut tables, id, patch).map_err(|e| ServiceError::from_repository(e, "store"))
    }

    /// Delete a store and clear its owner's back-reference.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the store does not exist.
    pub async fn delete_store(&self, id: StoreId) -> Result<Store, ServiceError> {
        delete_store(&mut *self.store.write().await, id)
            .map_err(|e| ServiceError::from_repository(e, "store"))
    }
}

fn duplicate_email() -> ServiceError {
    ServiceError::Duplicate("Email already exists. Please use a different email.".to_owned())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use store_ratings_core::RatingId;

    use super::*;
    use crate::db::SeedData;

    const JOHN: UserId = UserId::new(2);
    const MIKE: UserId = UserId::new(3);
    const MIKES: StoreId = StoreId::new(1);

    fn demo_store() -> DataStore {
        DataStore::from_seed(SeedData::demo().unwrap()).unwrap()
    }

    fn new_owner_form() -> CreateUser {
        CreateUser {
            name: "Second Store Owner Person".to_owned(),
            email: "owner2@example.com".to_owned(),
            address: "2 Owner Street".to_owned(),
            password: "Owner123!".to_owned(),
            role: Some(Role::StoreOwner),
        }
    }

    fn store_form(owner_id: Option<UserId>) -> CreateStore {
        CreateStore {
            name: "Corner Shop".to_owned(),
            email: "corner@shop.com".to_owned(),
            address: "1 Corner".to_owned(),
            owner_id,
            image: None,
        }
    }

    #[tokio::test]
    async fn test_create_user_rules() {
        let data = demo_store();
        let admin = AdminService::new(&data);

        let short_name = CreateUser {
            name: "Too Short".to_owned(),
            ..new_owner_form()
        };
        assert!(matches!(
            admin.create_user(short_name).await,
            Err(ServiceError::Validation(ValidationError::NameLength { .. }))
        ));

        let no_role = CreateUser {
            role: None,
            ..new_owner_form()
        };
        assert!(matches!(
            admin.create_user(no_role).await,
            Err(ServiceError::Validation(ValidationError::RoleRequired))
        ));

        let weak = CreateUser {
            password: "nouppercase1!".to_owned(),
            ..new_owner_form()
        };
        assert!(matches!(
            admin.create_user(weak).await,
            Err(ServiceError::Validation(
                ValidationError::PasswordMissingUppercase
            ))
        ));

        let taken = CreateUser {
            email: "john@example.com".to_owned(),
            ..new_owner_form()
        };
        assert!(matches!(
            admin.create_user(taken).await,
            Err(ServiceError::Duplicate(_))
        ));

        let created = admin.create_user(new_owner_form()).await.unwrap();
        assert_eq!(created.role, Role::StoreOwner);
        assert_eq!(created.store_id, None);
    }

    #[tokio::test]
    async fn test_create_store_links_owner() {
        let data = demo_store();
        let admin = AdminService::new(&data);

        let owner = admin.create_user(new_owner_form()).await.unwrap();
        let store = admin.create_store(store_form(Some(owner.id))).await.unwrap();

        assert!(store.ratings.is_empty());
        let tables = data.read().await;
        assert_eq!(
            tables.users.find_by_id(owner.id).unwrap().store_id,
            Some(store.id)
        );
    }

    #[tokio::test]
    async fn test_create_store_owner_checks() {
        let data = demo_store();
        let admin = AdminService::new(&data);

        for owner in [None, Some(JOHN), Some(UserId::new(99))] {
            assert!(matches!(
                admin.create_store(store_form(owner)).await,
                Err(ServiceError::Validation(ValidationError::OwnerRequired))
            ));
        }

        let short = CreateStore {
            name: "AB".to_owned(),
            ..store_form(Some(MIKE))
        };
        assert!(matches!(
            admin.create_store(short).await,
            Err(ServiceError::Validation(
                ValidationError::StoreNameTooShort { .. }
            ))
        ));
        assert_eq!(data.read().await.stores.len(), 2);
    }

    #[tokio::test]
    async fn test_delete_store_clears_owner_and_keeps_ratings() {
        let data = demo_store();
        let admin = AdminService::new(&data);

        crate::services::ratings::RatingService::new(&data)
            .submit(JOHN, MIKES, 5)
            .await
            .unwrap();
        admin.delete_store(MIKES).await.unwrap();

        let tables = data.read().await;
        assert_eq!(tables.users.find_by_id(MIKE).unwrap().store_id, None);
        assert!(tables.stores.find_by_id(MIKES).is_none());
        assert_eq!(tables.ratings.find_all(|r| r.store_id == MIKES).count(), 1);
        drop(tables);

        assert!(matches!(
            admin.delete_store(MIKES).await,
            Err(ServiceError::NotFound("store"))
        ));
    }

    #[tokio::test]
    async fn test_delete_user_keeps_ratings() {
        let data = demo_store();
        let admin = AdminService::new(&data);

        admin.delete_user(JOHN).await.unwrap();

        let tables = data.read().await;
        assert!(tables.users.find_by_id(JOHN).is_none());
        assert!(tables.ratings.find_by_id(RatingId::new(1)).is_some());
    }

    #[tokio::test]
    async fn test_admins_cannot_be_deleted() {
        let data = demo_store();
        assert!(matches!(
            AdminService::new(&data).delete_user(UserId::new(1)).await,
            Err(ServiceError::Forbidden(_))
        ));
        assert_eq!(data.read().await.users.len(), 3);
    }

    #[tokio::test]
    async fn test_update_store_moves_owner() {
        let data = demo_store();
        let admin = AdminService::new(&data);

        let owner = admin.create_user(new_owner_form()).await.unwrap();
        let store = admin
            .update_store(
                MIKES,
                UpdateStore {
                    owner_id: Some(owner.id),
                    name: Some("Renamed Store".to_owned()),
                    ..UpdateStore::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(store.name, "Renamed Store");

        let tables = data.read().await;
        assert_eq!(tables.users.find_by_id(MIKE).unwrap().store_id, None);
        assert_eq!(
            tables.users.find_by_id(owner.id).unwrap().store_id,
            Some(MIKES)
        );
    }

    #[tokio::test]
    async fn test_update_user() {
        let data = demo_store();
        let admin = AdminService::new(&data);

        let updated = admin
            .update_user(
                JOHN,
                UpdateUser {
                    address: Some("99 New Address Lane".to_owned()),
                    ..UpdateUser::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.address, "99 New Address Lane");

        assert!(matches!(
            admin
                .update_user(
                    JOHN,
                    UpdateUser {
                        email: Some("mike@store.com".to_owned()),
                        ..UpdateUser::default()
                    },
                )
                .await,
            Err(ServiceError::Duplicate(_))
        ));

        assert!(matches!(
            admin
                .update_user(
                    MIKE,
                    UpdateUser {
                        role: Some(Role::Customer),
                        ..UpdateUser::default()
                    },
                )
                .await,
            Err(ServiceError::Forbidden(_))
        ));

        assert!(matches!(
            admin
                .update_user(UserId::new(99), UpdateUser::default())
                .await,
            Err(ServiceError::NotFound("user"))
        ));
    }
}
