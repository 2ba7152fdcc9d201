//! Store repository.
//!
//! Keeps the owner back-reference (`User::store_id`) pointing at the store
//! whose `owner_id` names that user.

use store_ratings_core::{StoreId, UserId};

use super::{DataStore, RepositoryError, Tables};
use crate::models::{NewStore, Store, StorePatch};

fn link_owner(tables: &mut Tables, owner_id: UserId, store_id: StoreId) {
    tables
        .users
        .update(owner_id, |user| user.store_id = Some(store_id));
}

fn unlink_owner(tables: &mut Tables, owner_id: UserId, store_id: StoreId) {
    tables.users.update(owner_id, |user| {
        if user.store_id == Some(store_id) {
            user.store_id = None;
        }
    });
}

/// Insert a store into already-locked tables and point its owner at it.
///
/// A missing owner is tolerated; the store then has no back-reference.
///
/// # Errors
///
/// Returns `RepositoryError::IdsExhausted` if no store ID is left.
pub fn insert_store(tables: &mut Tables, store: NewStore) -> Result<Store, RepositoryError> {
    let store = tables.stores.insert_with(|id| store.into_store(id))?;
    link_owner(tables, store.owner_id, store.id);
    Ok(store)
}

/// Merge a patch into a store in already-locked tables.
///
/// On an owner change the previous owner's back-reference is cleared and
/// the new owner's is set.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the store does not exist.
pub fn update_store(
    tables: &mut Tables,
    id: StoreId,
    patch: StorePatch,
) -> Result<Store, RepositoryError> {
    let previous_owner = tables
        .stores
        .find_by_id(id)
        .map(|s| s.owner_id)
        .ok_or(RepositoryError::NotFound)?;

    let store = tables
        .stores
        .update(id, |store| patch.apply(store))
        .cloned()
        .ok_or(RepositoryError::NotFound)?;

    if store.owner_id != previous_owner {
        unlink_owner(tables, previous_owner, id);
        link_owner(tables, store.owner_id, id);
    }

    Ok(store)
}

/// Delete a store from already-locked tables and clear its owner's
/// back-reference. Ratings of the store are kept.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the store does not exist.
pub fn delete_store(tables: &mut Tables, id: StoreId) -> Result<Store, RepositoryError> {
    let store = tables.stores.remove(id).ok_or(RepositoryError::NotFound)?;
    unlink_owner(tables, store.owner_id, id);
    Ok(store)
}

/// Repository for the Stores collection.
pub struct StoreRepository<'a> {
    store: &'a DataStore,
}

impl<'a> StoreRepository<'a> {
    /// Create a new store repository.
    #[must_use]
    pub const fn new(store: &'a DataStore) -> Self {
        Self { store }
    }

    /// Get a store by its ID.
    pub async fn get_by_id(&self, id: StoreId) -> Option<Store> {
        self.store.read().await.stores.find_by_id(id).cloned()
    }

    /// Get the store owned by a user.
    pub async fn get_by_owner(&self, owner_id: UserId) -> Option<Store> {
        self.store
            .read()
            .await
            .stores
            .find_one(|s| s.owner_id == owner_id)
            .cloned()
    }

    /// Snapshot of every store in insertion order.
    pub async fn list(&self) -> Vec<Store> {
        self.store.read().await.stores.list().to_vec()
    }

    /// Create a store with no ratings and link its owner.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::IdsExhausted` if no store ID is left.
    pub async fn create(&self, store: NewStore) -> Result<Store, RepositoryError> {
        insert_store(&mut *self.store.write().await, store)
    }

    /// Merge a patch into an existing store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the store does not exist.
    pub async fn update(&self, id: StoreId, patch: StorePatch) -> Result<Store, RepositoryError> {
        update_store(&mut *self.store.write().await, id, patch)
    }

    /// Delete a store and clear its owner's back-reference.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the store does not exist.
    pub async fn delete(&self, id: StoreId) -> Result<Store, RepositoryError> {
        delete_store(&mut *self.store.write().await, id)
    }
}
