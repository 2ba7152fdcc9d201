//! In-memory Data Store.
//!
//! # Collections
//!
//! - `users` - accounts of every role
//! - `stores` - rated stores, each carrying its derived rating aggregate
//! - `ratings` - at most one rating per `(user, store)` pair
//!
//! # Concurrency
//!
//! All three collections sit behind one [`tokio::sync::RwLock`]. Every
//! mutating operation holds the write guard for its whole
//! read-modify-write sequence, so operations touching several collections
//! (store deletion, rating aggregation) are atomic. Readers share the read
//! guard and always see a consistent snapshot. Guards are never held across
//! password hashing or any other slow work.
//!
//! # Repositories
//!
//! [`UserRepository`], [`StoreRepository`] and [`RatingRepository`] expose the
//! create/get/list/update/delete API per collection and keep cross-collection
//! references consistent.

pub mod ratings;
pub mod seed;
pub mod stores;
pub mod users;

use thiserror::Error;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::models::{Rating, Store, User};

pub use ratings::RatingRepository;
pub use seed::{SeedData, SeedError, SeedUser};
pub use stores::StoreRepository;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepositoryError {
    /// Requested record was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// The collection has handed out its largest ID.
    #[error("no IDs left to allocate")]
    IdsExhausted,
}

/// A record stored in a [`Collection`].
pub trait Record: Clone {
    /// Type-safe ID of the record.
    type Id: Copy + Eq + std::fmt::Debug + From<i32> + Into<i32>;

    /// The record's ID.
    fn id(&self) -> Self::Id;
}

impl Record for User {
    type Id = store_ratings_core::UserId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

impl Record for Store {
    type Id = store_ratings_core::StoreId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

impl Record for Rating {
    type Id = store_ratings_core::RatingId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

/// An ordered collection of records with a monotonic ID allocator.
///
/// Lookups are linear scans; the datasets this serves are small.
#[derive(Debug, Clone)]
pub struct Collection<T: Record> {
    records: Vec<T>,
    last_id: i32,
}

impl<T: Record> Default for Collection<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            last_id: 0,
        }
    }
}

impl<T: Record> Collection<T> {
    /// All records in insertion order.
    #[must_use]
    pub fn list(&self) -> &[T] {
        &self.records
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Find a record by ID.
    #[must_use]
    pub fn find_by_id(&self, id: T::Id) -> Option<&T> {
        self.records.iter().find(|r| r.id() == id)
    }

    /// First record matching `predicate`.
    pub fn find_one(&self, predicate: impl Fn(&T) -> bool) -> Option<&T> {
        self.records.iter().find(|r| predicate(r))
    }

    /// Every record matching `predicate`, in insertion order.
    pub fn find_all<'a>(
        &'a self,
        predicate: impl Fn(&T) -> bool + 'a,
    ) -> impl Iterator<Item = &'a T> + 'a {
        self.records.iter().filter(move |r| predicate(r))
    }

    /// Mutable access to a record by ID.
    pub fn find_by_id_mut(&mut self, id: T::Id) -> Option<&mut T> {
        self.records.iter_mut().find(|r| r.id() == id)
    }

    /// Highest ID allocated or reserved so far.
    #[must_use]
    pub const fn last_id(&self) -> i32 {
        self.last_id
    }

    /// Allocate a fresh ID. IDs are never reused, even after removal.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::IdsExhausted` once `i32::MAX` has been used.
    pub fn next_id(&mut self) -> Result<T::Id, RepositoryError> {
        self.last_id = self
            .last_id
            .checked_add(1)
            .ok_or(RepositoryError::IdsExhausted)?;
        Ok(T::Id::from(self.last_id))
    }

    /// Keep `id` and every lower ID from being allocated.
    pub fn reserve(&mut self, id: T::Id) {
        self.last_id = self.last_id.max(id.into());
    }

    /// Append a record that already carries an ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if a record with the same ID exists.
    pub fn insert(&mut self, record: T) -> Result<T::Id, RepositoryError> {
        let id = record.id();
        if self.find_by_id(id).is_some() {
            return Err(RepositoryError::Conflict(format!("duplicate id {id:?}")));
        }
        self.last_id = self.last_id.max(id.into());
        self.records.push(record);
        Ok(id)
    }

    /// Allocate an ID and append the record built from it.
    ///
    /// Returns a copy of the stored record.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::IdsExhausted` if no ID is left.
    pub fn insert_with(&mut self, build: impl FnOnce(T::Id) -> T) -> Result<T, RepositoryError> {
        let record = build(self.next_id()?);
        self.records.push(record.clone());
        Ok(record)
    }

    /// Remove a record by ID, returning it.
    pub fn remove(&mut self, id: T::Id) -> Option<T> {
        let index = self.records.iter().position(|r| r.id() == id)?;
        Some(self.records.remove(index))
    }

    /// Merge changes into a record in place.
    pub fn update(&mut self, id: T::Id, merge: impl FnOnce(&mut T)) -> Option<&T> {
        let record = self.find_by_id_mut(id)?;
        merge(&mut *record);
        Some(&*record)
    }
}

/// The three collections guarded together.
#[derive(Debug, Clone, Default)]
pub struct Tables {
    pub users: Collection<User>,
    pub stores: Collection<Store>,
    pub ratings: Collection<Rating>,
}

/// The process-wide Data Store.
///
/// Cheap to share behind `AppState`'s `Arc`; all access goes through the
/// guards returned by [`read`](Self::read) and [`write`](Self::write).
#[derive(Debug, Default)]
pub struct DataStore {
    tables: RwLock<Tables>,
}

impl DataStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated from seed data.
    ///
    /// # Errors
    ///
    /// Returns `SeedError` if the seed data has duplicate IDs or emails, or a
    /// password cannot be hashed.
    pub fn from_seed(seed: SeedData) -> Result<Self, SeedError> {
        Ok(Self {
            tables: RwLock::new(seed.into_tables()?),
        })
    }

    /// Shared access for a consistent read.
    pub async fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().await
    }

    /// Exclusive access for one atomic read-modify-write sequence.
    pub async fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use store_ratings_core::{RatingId, Stars, StoreId, UserId};

    use super::*;

    fn rating(id: i32, user: i32) -> Rating {
        Rating {
            id: RatingId::new(id),
            user_id: UserId::new(user),
            store_id: StoreId::new(1),
            value: Stars::new(3).unwrap(),
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_insert_with_allocates_increasing_ids() {
        let mut ratings = Collection::<Rating>::default();
        let first = ratings.insert_with(|id| rating(id.as_i32(), 1)).unwrap().id;
        let second = ratings.insert_with(|id| rating(id.as_i32(), 2)).unwrap().id;
        assert_eq!(first, RatingId::new(1));
        assert_eq!(second, RatingId::new(2));
    }

    #[test]
    fn test_ids_not_reused_after_remove() {
        let mut ratings = Collection::<Rating>::default();
        let id = ratings.insert_with(|id| rating(id.as_i32(), 1)).unwrap().id;
        ratings.remove(id).unwrap();
        let next = ratings.insert_with(|id| rating(id.as_i32(), 1)).unwrap().id;
        assert_ne!(id, next);
    }

    #[test]
    fn test_reserve_skips_ids() {
        let mut ratings = Collection::<Rating>::default();
        ratings.reserve(RatingId::new(4));
        ratings.reserve(RatingId::new(2));
        assert_eq!(ratings.next_id(), Ok(RatingId::new(5)));
        assert!(ratings.is_empty());
    }

    #[test]
    fn test_allocation_stops_at_max_id() {
        let mut ratings = Collection::<Rating>::default();
        ratings.insert(rating(i32::MAX, 1)).unwrap();

        assert_eq!(ratings.next_id(), Err(RepositoryError::IdsExhausted));
        assert_eq!(
            ratings.insert_with(|id| rating(id.as_i32(), 2)).unwrap_err(),
            RepositoryError::IdsExhausted
        );
        assert_eq!(ratings.len(), 1);
        assert_eq!(ratings.last_id(), i32::MAX);
    }

    #[test]
    fn test_insert_tracks_explicit_ids() {
        let mut ratings = Collection::<Rating>::default();
        ratings.insert(rating(10, 1)).unwrap();
        assert!(matches!(
            ratings.insert(rating(10, 2)),
            Err(RepositoryError::Conflict(_))
        ));
        assert_eq!(ratings.next_id(), Ok(RatingId::new(11)));
    }

    #[test]
    fn test_find_and_update() {
        let mut ratings = Collection::<Rating>::default();
        ratings.insert(rating(1, 1)).unwrap();
        ratings.insert(rating(2, 2)).unwrap();

        assert_eq!(
            ratings.find_one(|r| r.user_id == UserId::new(2)).unwrap().id,
            RatingId::new(2)
        );
        assert_eq!(ratings.find_all(|r| r.store_id == StoreId::new(1)).count(), 2);

        let updated = ratings
            .update(RatingId::new(1), |r| r.value = Stars::new(5).unwrap())
            .unwrap();
        assert_eq!(updated.value.get(), 5);
        assert!(ratings.update(RatingId::new(99), |_| {}).is_none());
    }

    #[test]
    fn test_remove_missing() {
        let mut ratings = Collection::<Rating>::default();
        assert!(ratings.remove(RatingId::new(1)).is_none());
        assert!(ratings.is_empty());
    }
}
