//! Rating repository and store aggregate maintenance.
//!
//! Every change to the Ratings collection made here is followed by
//! [`recompute_store_aggregate`] under the same write guard, so a store's
//! `ratings` and `average_rating` never disagree with the collection.

use chrono::{DateTime, Utc};

use store_ratings_core::{RatingId, Stars, StoreId, UserId};

use super::{DataStore, RepositoryError, Tables};
use crate::models::{Rating, Store};

/// Arithmetic mean of star values, `0.0` for none.
pub fn average_rating(values: impl IntoIterator<Item = Stars>) -> f64 {
    let (sum, count) = values
        .into_iter()
        .fold((0_u32, 0_u32), |(sum, count), v| {
            (sum + u32::from(v.get()), count + 1)
        });
    if count == 0 {
        return 0.0;
    }
    f64::from(sum) / f64::from(count)
}

/// Rebuild a store's rating list and average from the Ratings collection.
///
/// Returns the updated store, or `None` if the store no longer exists.
pub fn recompute_store_aggregate(tables: &mut Tables, store_id: StoreId) -> Option<Store> {
    let current: Vec<(RatingId, Stars)> = tables
        .ratings
        .find_all(|r| r.store_id == store_id)
        .map(|r| (r.id, r.value))
        .collect();
    let average = average_rating(current.iter().map(|(_, v)| *v));
    let ids = current.into_iter().map(|(id, _)| id).collect();

    tables
        .stores
        .update(store_id, |store| {
            store.ratings = ids;
            store.average_rating = average;
        })
        .cloned()
}

/// Find the rating a user gave a store.
#[must_use]
pub fn find_for_pair(tables: &Tables, user_id: UserId, store_id: StoreId) -> Option<&Rating> {
    tables
        .ratings
        .find_one(|r| r.user_id == user_id && r.store_id == store_id)
}

/// Repository for the Ratings collection.
pub struct RatingRepository<'a> {
    store: &'a DataStore,
}

impl<'a> RatingRepository<'a> {
    /// Create a new rating repository.
    #[must_use]
    pub const fn new(store: &'a DataStore) -> Self {
        Self { store }
    }

    /// Insert a rating and refresh the store aggregate.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the store does not exist.
    /// Returns `RepositoryError::Conflict` if the user already rated the store.
    pub async fn create(
        &self,
        user_id: UserId,
        store_id: StoreId,
        value: Stars,
        created_at: DateTime<Utc>,
    ) -> Result<Rating, RepositoryError> {
        let mut tables = self.store.write().await;

        if tables.stores.find_by_id(store_id).is_none() {
            return Err(RepositoryError::NotFound);
        }
        if find_for_pair(&tables, user_id, store_id).is_some() {
            return Err(RepositoryError::Conflict(
                "user already rated this store".to_owned(),
            ));
        }

        let rating = tables.ratings.insert_with(|id| Rating {
            id,
            user_id,
            store_id,
            value,
            created_at,
        })?;
        recompute_store_aggregate(&mut tables, store_id);

        Ok(rating)
    }

    /// Get a rating by ID.
    pub async fn get_by_id(&self, id: RatingId) -> Option<Rating> {
        self.store.read().await.ratings.find_by_id(id).cloned()
    }

    /// Get the rating a user gave a store.
    pub async fn get_for_pair(&self, user_id: UserId, store_id: StoreId) -> Option<Rating> {
        find_for_pair(&*self.store.read().await, user_id, store_id).cloned()
    }

    /// Snapshot of every rating.
    pub async fn list(&self) -> Vec<Rating> {
        self.store.read().await.ratings.list().to_vec()
    }

    /// Ratings of one store, oldest first.
    pub async fn list_for_store(&self, store_id: StoreId) -> Vec<Rating> {
        self.store
            .read()
            .await
            .ratings
            .find_all(|r| r.store_id == store_id)
            .cloned()
            .collect()
    }

    /// Ratings submitted by one user.
    pub async fn list_for_user(&self, user_id: UserId) -> Vec<Rating> {
        self.store
            .read()
            .await
            .ratings
            .find_all(|r| r.user_id == user_id)
            .cloned()
            .collect()
    }

    /// Overwrite a rating's value and timestamp and refresh the store aggregate.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the rating does not exist.
    pub async fn update(
        &self,
        id: RatingId,
        value: Stars,
        created_at: DateTime<Utc>,
    ) -> Result<Rating, RepositoryError> {
        let mut tables = self.store.write().await;

        let rating = tables
            .ratings
            .update(id, |r| {
                r.value = value;
                r.created_at = created_at;
            })
            .cloned()
            .ok_or(RepositoryError::NotFound)?;
        recompute_store_aggregate(&mut tables, rating.store_id);

        Ok(rating)
    }

    /// Delete a rating and refresh the store aggregate.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the rating does not exist.
    pub async fn delete(&self, id: RatingId) -> Result<Rating, RepositoryError> {
        let mut tables = self.store.write().await;

        let rating = tables.ratings.remove(id).ok_or(RepositoryError::NotFound)?;
        recompute_store_aggregate(&mut tables, rating.store_id);

        Ok(rating)
    }
}
