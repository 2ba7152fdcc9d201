//! Rating submission.
//!
//! A submission is an upsert on the `(user, store)` pair followed by a
//! recomputation of the store aggregate, both under one write guard.

use chrono::Utc;
use serde::Serialize;

use store_ratings_core::{RatingId, Stars, StoreId, UserId};

use super::ServiceError;
use crate::db::ratings::{find_for_pair, recompute_store_aggregate};
use crate::db::{DataStore, RatingRepository};
use crate::models::{Rating, Store};

/// Result of [`RatingService::submit`].
#[derive(Debug, Clone, Serialize)]
pub struct Submission {
    pub rating: Rating,
    /// The store with its refreshed aggregate.
    pub store: Store,
    /// `true` for a first rating, `false` when an existing one was overwritten.
    pub created: bool,
}

/// Rating service.
pub struct RatingService<'a> {
    store: &'a DataStore,
}

impl<'a> RatingService<'a> {
    /// Create a new rating service.
    #[must_use]
    pub const fn new(store: &'a DataStore) -> Self {
        Self { store }
    }

    /// Submit or replace a user's rating of a store.
    ///
    /// An existing rating for the pair gets the new value and the current
    /// time; otherwise a new rating is inserted. The store's rating list and
    /// average are then rebuilt.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Validation` unless `1 <= value <= 5`.
    /// Returns `ServiceError::NotFound` if the user or the store does not exist.
    pub async fn submit(
        &self,
        user_id: UserId,
        store_id: StoreId,
        value: i64,
    ) -> Result<Submission, ServiceError> {
        let value = Stars::new(value)?;
        let now = Utc::now();

        let mut tables = self.store.write().await;

        if tables.users.find_by_id(user_id).is_none() {
            return Err(ServiceError::NotFound("user"));
        }
        if tables.stores.find_by_id(store_id).is_none() {
            return Err(ServiceError::NotFound("store"));
        }

        let existing = find_for_pair(&tables, user_id, store_id).map(|r| r.id);
        let rating = match existing {
            Some(id) => tables
                .ratings
                .update(id, |r| {
                    r.value = value;
                    r.created_at = now;
                })
                .cloned()
                .ok_or(ServiceError::NotFound("rating"))?,
            None => tables.ratings.insert_with(|id| Rating {
                id,
                user_id,
                store_id,
                value,
                created_at: now,
            })
            .map_err(|e| ServiceError::from_repository(e, "rating"))?,
        };

        let store =
            recompute_store_aggregate(&mut tables, store_id).ok_or(ServiceError::NotFound("store"))?;

        Ok(Submission {
            rating,
            store,
            created: existing.is_none(),
        })
    }

    /// Delete a rating and refresh its store's aggregate.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the rating does not exist.
    pub async fn delete(&self, id: RatingId) -> Result<Rating, ServiceError> {
        RatingRepository::new(self.store)
            .delete(id)
            .await
            .map_err(|e| ServiceError::from_repository(e, "rating"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use store_ratings_core::{Email, Role, ValidationError};

    use super::*;
    use crate::db::SeedData;
    use crate::db::users::insert_user;
    use crate::models::NewUser;

    const MIKES: StoreId = StoreId::new(1);
    const JOHN: UserId = UserId::new(2);

    fn demo_store() -> DataStore {
        DataStore::from_seed(SeedData::demo().unwrap()).unwrap()
    }

    async fn store(data: &DataStore, id: StoreId) -> Store {
        data.read().await.stores.find_by_id(id).cloned().unwrap()
    }

    #[tokio::test]
    async fn test_first_rating_then_rerate() {
        let data = demo_store();
        let service = RatingService::new(&data);

        let before = store(&data, MIKES).await;
        assert!(before.ratings.is_empty());
        assert!(before.average_rating.abs() < f64::EPSILON);

        let first = service.submit(JOHN, MIKES, 4).await.unwrap();
        assert!(first.created);
        assert_eq!(first.store.ratings.len(), 1);
        assert!((first.store.average_rating - 4.0).abs() < f64::EPSILON);

        let second = service.submit(JOHN, MIKES, 2).await.unwrap();
        assert!(!second.created);
        assert_eq!(second.rating.id, first.rating.id);
        assert_eq!(second.rating.value.get(), 2);
        assert!(second.rating.created_at >= first.rating.created_at);
        assert_eq!(second.store.ratings.len(), 1);
        assert!((second.store.average_rating - 2.0).abs() < f64::EPSILON);

        let tables = data.read().await;
        assert_eq!(
            tables
                .ratings
                .find_all(|r| r.user_id == JOHN && r.store_id == MIKES)
                .count(),
            1
        );
    }

    #[tokio::test]
    async fn test_average_over_several_users() {
        let data = demo_store();
        let service = RatingService::new(&data);

        service.submit(UserId::new(1), MIKES, 5).await.unwrap();
        service.submit(UserId::new(2), MIKES, 4).await.unwrap();
        let last = service.submit(UserId::new(3), MIKES, 2).await.unwrap();

        assert_eq!(last.store.ratings.len(), 3);
        assert!((last.store.average_rating - 11.0 / 3.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_rejects_out_of_range_without_mutation() {
        let data = demo_store();
        let service = RatingService::new(&data);

        for value in [0, 6, -1] {
            assert!(matches!(
                service.submit(JOHN, MIKES, value).await,
                Err(ServiceError::Validation(
                    ValidationError::RatingOutOfRange { .. }
                ))
            ));
        }
        assert_eq!(data.read().await.ratings.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_store() {
        let data = demo_store();
        assert!(matches!(
            RatingService::new(&data)
                .submit(JOHN, StoreId::new(99), 3)
                .await,
            Err(ServiceError::NotFound("store"))
        ));
    }

    #[tokio::test]
    async fn test_deleted_user_cannot_rate() {
        let data = demo_store();
        data.write().await.users.remove(JOHN).unwrap();

        assert!(matches!(
            RatingService::new(&data).submit(JOHN, MIKES, 5).await,
            Err(ServiceError::NotFound("user"))
        ));

        let mikes = store(&data, MIKES).await;
        assert!(mikes.ratings.is_empty());
        assert!(mikes.average_rating.abs() < f64::EPSILON);
        assert_eq!(data.read().await.ratings.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_recomputes() {
        let data = demo_store();
        let service = RatingService::new(&data);

        let best_buy = StoreId::new(2);
        service.delete(RatingId::new(1)).await.unwrap();
        let after = store(&data, best_buy).await;
        assert!(after.ratings.is_empty());
        assert!(after.average_rating.abs() < f64::EPSILON);

        assert!(matches!(
            service.delete(RatingId::new(1)).await,
            Err(ServiceError::NotFound("rating"))
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_submissions_stay_consistent() {
        let data = Arc::new(demo_store());

        let mut raters = Vec::new();
        {
            let mut tables = data.write().await;
            for i in 0..40 {
                let user = insert_user(
                    &mut tables,
                    NewUser {
                        name: format!("Concurrent Rater Number {i:02}"),
                        email: Email::parse(&format!("rater{i}@example.com")).unwrap(),
                        address: "1 Parallel Street".to_owned(),
                        password_hash: None,
                        role: Role::Customer,
                        store_id: None,
                        avatar: None,
                    },
                )
                .unwrap();
                raters.push(user.id);
            }
        }

        let handles: Vec<_> = raters
            .into_iter()
            .zip(0..40)
            .map(|(user_id, i)| {
                let data = Arc::clone(&data);
                tokio::spawn(async move {
                    let value = i64::from(i % 5 + 1);
                    RatingService::new(&data)
                        .submit(user_id, MIKES, value)
                        .await
                        .unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        let tables = data.read().await;
        let store = tables.stores.find_by_id(MIKES).unwrap();
        assert_eq!(store.ratings.len(), 40);
        // Eight of each value 1..=5.
        assert!((store.average_rating - 3.0).abs() < 1e-9);

        let mut ids: Vec<_> = tables.ratings.list().iter().map(|r| r.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), tables.ratings.len());
    }
}
