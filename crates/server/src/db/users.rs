//! User repository.
//!
//! Email addresses are unique across the Users collection; every write that
//! can introduce an email checks it under the write guard.

use store_ratings_core::{Email, UserId};

use super::{DataStore, RepositoryError, Tables};
use crate::models::{NewUser, User, UserPatch};

fn email_taken(tables: &Tables, email: &Email, except: Option<UserId>) -> bool {
    tables
        .users
        .find_one(|u| u.email == *email && Some(u.id) != except)
        .is_some()
}

/// Insert a user into already-locked tables.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` if the email already exists.
pub fn insert_user(tables: &mut Tables, user: NewUser) -> Result<User, RepositoryError> {
    if email_taken(tables, &user.email, None) {
        return Err(RepositoryError::Conflict("email already exists".to_owned()));
    }
    tables.users.insert_with(|id| user.into_user(id))
}

/// Merge a patch into a user in already-locked tables.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the user does not exist.
/// Returns `RepositoryError::Conflict` if the new email belongs to another user.
pub fn update_user(tables: &mut Tables, id: UserId, patch: UserPatch) -> Result<User, RepositoryError> {
    if tables.users.find_by_id(id).is_none() {
        return Err(RepositoryError::NotFound);
    }
    if let Some(email) = &patch.email
        && email_taken(tables, email, Some(id))
    {
        return Err(RepositoryError::Conflict("email already exists".to_owned()));
    }

    tables
        .users
        .update(id, |user| patch.apply(user))
        .cloned()
        .ok_or(RepositoryError::NotFound)
}

/// Repository for the Users collection.
pub struct UserRepository<'a> {
    store: &'a DataStore,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(store: &'a DataStore) -> Self {
        Self { store }
    }

    /// Get a user by their email address. Matching is exact.
    pub async fn get_by_email(&self, email: &Email) -> Option<User> {
        self.store
            .read()
            .await
            .users
            .find_one(|u| u.email == *email)
            .cloned()
    }

    /// Get a user by their ID.
    pub async fn get_by_id(&self, id: UserId) -> Option<User> {
        self.store.read().await.users.find_by_id(id).cloned()
    }

    /// Snapshot of every user in insertion order.
    pub async fn list(&self) -> Vec<User> {
        self.store.read().await.users.list().to_vec()
    }

    /// Snapshot of the users matching `predicate`.
    pub async fn find_all(&self, predicate: impl Fn(&User) -> bool) -> Vec<User> {
        self.store
            .read()
            .await
            .users
            .find_all(predicate)
            .cloned()
            .collect()
    }

    /// Create a new user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    pub async fn create(&self, user: NewUser) -> Result<User, RepositoryError> {
        insert_user(&mut *self.store.write().await, user)
    }

    /// Merge a patch into an existing user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    /// Returns `RepositoryError::Conflict` if the new email belongs to another user.
    pub async fn update(&self, id: UserId, patch: UserPatch) -> Result<User, RepositoryError> {
        update_user(&mut *self.store.write().await, id, patch)
    }

    /// Replace a user's password hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    pub async fn set_password_hash(
        &self,
        id: UserId,
        password_hash: String,
    ) -> Result<(), RepositoryError> {
        self.store
            .write()
            .await
            .users
            .update(id, |user| user.password_hash = Some(password_hash))
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    /// Delete a user. Their ratings are kept.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    pub async fn delete(&self, id: UserId) -> Result<User, RepositoryError> {
        self.store
            .write()
            .await
            .users
            .remove(id)
            .ok_or(RepositoryError::NotFound)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use store_ratings_core::Role;

    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "A Sufficiently Long User Name".to_owned(),
            email: Email::parse(email).unwrap(),
            address: "1 Test Street".to_owned(),
            password_hash: None,
            role: Role::Customer,
            store_id: None,
            avatar: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_lookup() {
        let data = DataStore::new();
        let repo = UserRepository::new(&data);

        let user = repo.create(new_user("a@example.com")).await.unwrap();
        assert_eq!(user.id, UserId::new(1));

        let by_email = repo
            .get_by_email(&Email::parse("a@example.com").unwrap())
            .await
            .unwrap();
        assert_eq!(by_email.id, user.id);
        assert!(repo.get_by_id(UserId::new(2)).await.is_none());
    }

    #[tokio::test]
    async fn test_create_duplicate_email() {
        let data = DataStore::new();
        let repo = UserRepository::new(&data);

        repo.create(new_user("a@example.com")).await.unwrap();
        let err = repo.create(new_user("a@example.com")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
        assert_eq!(repo.list().await.len(), 1);
    }

    #[tokio::test]
    async fn test_email_match_is_case_sensitive() {
        let data = DataStore::new();
        let repo = UserRepository::new(&data);

        repo.create(new_user("a@example.com")).await.unwrap();
        assert!(repo.create(new_user("A@example.com")).await.is_ok());
    }

    #[tokio::test]
    async fn test_update_email_uniqueness() {
        let data = DataStore::new();
        let repo = UserRepository::new(&data);

        let a = repo.create(new_user("a@example.com")).await.unwrap();
        repo.create(new_user("b@example.com")).await.unwrap();

        let taken = UserPatch {
            email: Some(Email::parse("b@example.com").unwrap()),
            ..UserPatch::default()
        };
        assert!(matches!(
            repo.update(a.id, taken).await,
            Err(RepositoryError::Conflict(_))
        ));

        // Re-saving one's own email is fine.
        let own = UserPatch {
            email: Some(Email::parse("a@example.com").unwrap()),
            name: Some("Renamed But Still Long Enough".to_owned()),
            ..UserPatch::default()
        };
        let updated = repo.update(a.id, own).await.unwrap();
        assert_eq!(updated.name, "Renamed But Still Long Enough");

        assert_eq!(
            repo.update(UserId::new(99), UserPatch::default())
                .await
                .unwrap_err(),
            RepositoryError::NotFound
        );
    }

    #[tokio::test]
    async fn test_delete() {
        let data = DataStore::new();
        let repo = UserRepository::new(&data);

        let user = repo.create(new_user("a@example.com")).await.unwrap();
        repo.delete(user.id).await.unwrap();
        assert!(repo.get_by_id(user.id).await.is_none());
        assert_eq!(repo.delete(user.id).await.unwrap_err(), RepositoryError::NotFound);
    }

    #[tokio::test]
    async fn test_set_password_hash() {
        let data = DataStore::new();
        let repo = UserRepository::new(&data);

        let user = repo.create(new_user("a@example.com")).await.unwrap();
        repo.set_password_hash(user.id, "hash".to_owned())
            .await
            .unwrap();
        assert_eq!(
            repo.get_by_id(user.id).await.unwrap().password_hash.as_deref(),
            Some("hash")
        );
    }
}
