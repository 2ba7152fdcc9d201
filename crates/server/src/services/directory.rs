//! Read-only views over the Data Store: lists, details and dashboards.
//!
//! Every view is built from one read guard, so it reflects a single
//! consistent snapshot. Dangling references (a store whose owner was
//! deleted, a rating whose rater was deleted) are rendered with fallbacks
//! and never fail the request.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use store_ratings_core::{RatingId, Role, Stars, StoreId, UserId};

use super::ServiceError;
use crate::db::ratings::average_rating;
use crate::db::{DataStore, Tables};
use crate::models::{Rating, SessionUser, Store};

/// Shown when a rating's author no longer exists.
pub const UNKNOWN_USER: &str = "Unknown User";
/// Shown when a rating's author no longer exists.
pub const UNKNOWN_EMAIL: &str = "Unknown Email";
/// Shown when a rated store no longer exists.
pub const UNKNOWN_STORE: &str = "Unknown Store";

// =============================================================================
// Query Types
// =============================================================================

/// Sort order of a list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
    /// Keep insertion order.
    None,
}

/// Role filter of the user list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleFilter {
    #[default]
    All,
    Admin,
    #[serde(alias = "customer")]
    User,
    StoreOwner,
}

impl RoleFilter {
    const fn matches(self, role: Role) -> bool {
        matches!(
            (self, role),
            (Self::All, _)
                | (Self::Admin, Role::Admin)
                | (Self::User, Role::Customer)
                | (Self::StoreOwner, Role::StoreOwner)
        )
    }
}

/// Sortable columns of the user list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserSortKey {
    Name,
    Email,
    Address,
    Role,
}

/// Sortable columns of the store list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreSortKey {
    Name,
    Email,
    Address,
    #[serde(alias = "averageRating")]
    AverageRating,
}

/// Filters for the admin user list.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserListQuery {
    pub search: Option<String>,
    pub role: RoleFilter,
    pub sort: Option<UserSortKey>,
    pub direction: SortDirection,
}

/// Filters for the admin store list.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StoreListQuery {
    pub search: Option<String>,
    pub sort: Option<StoreSortKey>,
    pub direction: SortDirection,
}

// =============================================================================
// View Types
// =============================================================================

/// Headline numbers of the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AdminStats {
    /// Users other than administrators.
    pub total_users: usize,
    pub total_stores: usize,
    pub total_ratings: usize,
}

/// Admin dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct AdminDashboard {
    pub stats: AdminStats,
    /// Every non-admin user.
    pub users: Vec<SessionUser>,
    pub stores: Vec<Store>,
}

/// One row of the admin user list.
#[derive(Debug, Clone, Serialize)]
pub struct UserRow {
    #[serde(flatten)]
    pub user: SessionUser,
    /// Average rating of the owned store (store owners only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_rating: Option<f64>,
}

/// One row of the admin store list.
#[derive(Debug, Clone, Serialize)]
pub struct StoreRow {
    #[serde(flatten)]
    pub store: Store,
    /// `None` when the owner no longer exists.
    pub owner: Option<SessionUser>,
}

/// One store as seen by a customer.
#[derive(Debug, Clone, Serialize)]
pub struct DirectoryEntry {
    #[serde(flatten)]
    pub store: Store,
    /// The caller's own rating of the store, if any.
    pub my_rating: Option<Rating>,
}

/// A rating with the name and email of its author.
#[derive(Debug, Clone, Serialize)]
pub struct RatingByUser {
    #[serde(flatten)]
    pub rating: Rating,
    pub user_name: String,
    pub user_email: String,
}

/// A rating with the name of the rated store.
#[derive(Debug, Clone, Serialize)]
pub struct RatingOfStore {
    #[serde(flatten)]
    pub rating: Rating,
    pub store_name: String,
}

/// Number of ratings with one star value.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct StarCount {
    pub stars: Stars,
    pub count: usize,
    /// Share of all ratings of the store, 0-100.
    pub percentage: f64,
}

/// Store details page.
#[derive(Debug, Clone, Serialize)]
pub struct StoreDetails {
    pub store: Store,
    pub owner: Option<SessionUser>,
    pub ratings: Vec<RatingByUser>,
    /// From five stars down to one.
    pub distribution: Vec<StarCount>,
    pub latest_rating_at: Option<DateTime<Utc>>,
}

/// User details page.
#[derive(Debug, Clone, Serialize)]
pub struct UserDetails {
    pub user: SessionUser,
    /// The owned store; `None` when absent or dangling.
    pub store: Option<Store>,
    /// Ratings the user submitted.
    pub ratings_given: Vec<RatingOfStore>,
    /// Ratings of the owned store.
    pub ratings_received: Vec<RatingByUser>,
}

/// Store owner dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct OwnerDashboard {
    /// `None` means no store is assigned to the owner.
    pub store: Option<Store>,
    pub raters: Vec<RatingByUser>,
}

/// Profile of the session user.
#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    pub user: SessionUser,
    pub ratings: Vec<RatingOfStore>,
    /// Mean of the ratings the user gave, `None` if they gave none.
    pub average_given: Option<f64>,
}

// =============================================================================
// Helpers
// =============================================================================

fn sort_rows<T>(rows: &mut [T], direction: SortDirection, compare: impl Fn(&T, &T) -> Ordering) {
    match direction {
        SortDirection::Asc => rows.sort_by(|a, b| compare(a, b)),
        SortDirection::Desc => rows.sort_by(|a, b| compare(b, a)),
        SortDirection::None => {}
    }
}

fn by_lowercase(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

fn needle(search: Option<&str>) -> String {
    search.map(str::trim).unwrap_or_default().to_lowercase()
}

#[allow(clippy::cast_precision_loss)]
fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64 * 100.0
}

fn session_user(tables: &Tables, id: UserId) -> Option<SessionUser> {
    tables.users.find_by_id(id).map(SessionUser::from)
}

fn by_user(tables: &Tables, rating: &Rating) -> RatingByUser {
    let user = tables.users.find_by_id(rating.user_id);
    RatingByUser {
        rating: rating.clone(),
        user_name: user.map_or_else(|| UNKNOWN_USER.to_owned(), |u| u.name.clone()),
        user_email: user.map_or_else(|| UNKNOWN_EMAIL.to_owned(), |u| u.email.to_string()),
    }
}

fn of_store(tables: &Tables, rating: &Rating) -> RatingOfStore {
    RatingOfStore {
        rating: rating.clone(),
        store_name: tables
            .stores
            .find_by_id(rating.store_id)
            .map_or_else(|| UNKNOWN_STORE.to_owned(), |s| s.name.clone()),
    }
}

fn ratings_of_store(tables: &Tables, store_id: StoreId) -> Vec<RatingByUser> {
    tables
        .ratings
        .find_all(|r| r.store_id == store_id)
        .map(|r| by_user(tables, r))
        .collect()
}

fn ratings_by_user(tables: &Tables, user_id: UserId) -> Vec<RatingOfStore> {
    tables
        .ratings
        .find_all(|r| r.user_id == user_id)
        .map(|r| of_store(tables, r))
        .collect()
}

/// Star distribution from five stars down to one.
#[must_use]
pub fn distribution(ratings: &[Rating]) -> Vec<StarCount> {
    Stars::descending()
        .map(|stars| {
            let count = ratings.iter().filter(|r| r.value == stars).count();
            StarCount {
                stars,
                count,
                percentage: percentage(count, ratings.len()),
            }
        })
        .collect()
}

// =============================================================================
// Service
// =============================================================================

/// Directory and dashboard views.
pub struct DirectoryService<'a> {
    store: &'a DataStore,
}

impl<'a> DirectoryService<'a> {
    /// Create a new directory service.
    #[must_use]
    pub const fn new(store: &'a DataStore) -> Self {
        Self { store }
    }

    /// Totals and the non-admin users for the admin dashboard.
    pub async fn admin_dashboard(&self) -> AdminDashboard {
        let tables = self.store.read().await;

        let users: Vec<SessionUser> = tables
            .users
            .find_all(|u| u.role != Role::Admin)
            .map(SessionUser::from)
            .collect();

        AdminDashboard {
            stats: AdminStats {
                total_users: users.len(),
                total_stores: tables.stores.len(),
                total_ratings: tables.ratings.len(),
            },
            users,
            stores: tables.stores.list().to_vec(),
        }
    }

    /// Searchable, filterable, sortable user list.
    pub async fn list_users(&self, query: &UserListQuery) -> Vec<UserRow> {
        let tables = self.store.read().await;
        let needle = needle(query.search.as_deref());

        let mut rows: Vec<UserRow> = tables
            .users
            .find_all(|u| query.role.matches(u.role) && u.matches_search(&needle))
            .map(|user| UserRow {
                user: SessionUser::from(user),
                store_rating: (user.role == Role::StoreOwner)
                    .then_some(user.store_id)
                    .flatten()
                    .and_then(|id| tables.stores.find_by_id(id))
                    .map(|s| s.average_rating),
            })
            .collect();
        drop(tables);

        if let Some(key) = query.sort {
            sort_rows(&mut rows, query.direction, |a, b| match key {
                UserSortKey::Name => by_lowercase(&a.user.name, &b.user.name),
                UserSortKey::Email => by_lowercase(a.user.email.as_str(), b.user.email.as_str()),
                UserSortKey::Address => by_lowercase(&a.user.address, &b.user.address),
                UserSortKey::Role => a.user.role.as_str().cmp(b.user.role.as_str()),
            });
        }

        rows
    }

    /// Searchable, sortable store list with owners.
    pub async fn list_stores(&self, query: &StoreListQuery) -> Vec<StoreRow> {
        let tables = self.store.read().await;
        let needle = needle(query.search.as_deref());

        let mut rows: Vec<StoreRow> = tables
            .stores
            .find_all(|s| s.matches_search(&needle))
            .map(|store| StoreRow {
                store: store.clone(),
                owner: session_user(&tables, store.owner_id),
            })
            .collect();
        drop(tables);

        if let Some(key) = query.sort {
            sort_rows(&mut rows, query.direction, |a, b| match key {
                StoreSortKey::Name => by_lowercase(&a.store.name, &b.store.name),
                StoreSortKey::Email => {
                    by_lowercase(a.store.email.as_str(), b.store.email.as_str())
                }
                StoreSortKey::Address => by_lowercase(&a.store.address, &b.store.address),
                StoreSortKey::AverageRating => a
                    .store
                    .average_rating
                    .total_cmp(&b.store.average_rating),
            });
        }

        rows
    }

    /// Stores matching `search` by name or address, each with the caller's
    /// own rating.
    pub async fn store_directory(
        &self,
        user_id: UserId,
        search: Option<&str>,
    ) -> Vec<DirectoryEntry> {
        let tables = self.store.read().await;
        let needle = needle(search);

        tables
            .stores
            .find_all(|s| s.matches_directory_search(&needle))
            .map(|store| DirectoryEntry {
                store: store.clone(),
                my_rating: tables
                    .ratings
                    .find_one(|r| r.user_id == user_id && r.store_id == store.id)
                    .cloned(),
            })
            .collect()
    }

    /// Store with owner, rated-by list and star distribution.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the store does not exist.
    pub async fn store_details(&self, id: StoreId) -> Result<StoreDetails, ServiceError> {
        let tables = self.store.read().await;

        let store = tables
            .stores
            .find_by_id(id)
            .cloned()
            .ok_or(ServiceError::NotFound("store"))?;
        let ratings: Vec<Rating> = tables
            .ratings
            .find_all(|r| r.store_id == id)
            .cloned()
            .collect();

        Ok(StoreDetails {
            owner: session_user(&tables, store.owner_id),
            distribution: distribution(&ratings),
            latest_rating_at: ratings.iter().map(|r| r.created_at).max(),
            ratings: ratings.iter().map(|r| by_user(&tables, r)).collect(),
            store,
        })
    }

    /// User with owned store and ratings.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the user does not exist.
    pub async fn user_details(&self, id: UserId) -> Result<UserDetails, ServiceError> {
        let tables = self.store.read().await;

        let user = tables
            .users
            .find_by_id(id)
            .ok_or(ServiceError::NotFound("user"))?;
        let store = (user.role == Role::StoreOwner)
            .then_some(user.store_id)
            .flatten()
            .and_then(|store_id| tables.stores.find_by_id(store_id))
            .cloned();

        Ok(UserDetails {
            user: SessionUser::from(user),
            ratings_given: ratings_by_user(&tables, id),
            ratings_received: store
                .as_ref()
                .map(|s| ratings_of_store(&tables, s.id))
                .unwrap_or_default(),
            store,
        })
    }

    /// The caller's store and who rated it.
    pub async fn owner_dashboard(&self, owner_id: UserId) -> OwnerDashboard {
        let tables = self.store.read().await;

        let store = tables
            .stores
            .find_one(|s| s.owner_id == owner_id)
            .cloned();
        let raters = store
            .as_ref()
            .map(|s| ratings_of_store(&tables, s.id))
            .unwrap_or_default();

        OwnerDashboard { store, raters }
    }

    /// The session user's profile and submitted ratings.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the user has been deleted.
    pub async fn profile(&self, user_id: UserId) -> Result<Profile, ServiceError> {
        let tables = self.store.read().await;

        let user = session_user(&tables, user_id).ok_or(ServiceError::NotFound("user"))?;
        let ratings = ratings_by_user(&tables, user_id);
        let average_given = (!ratings.is_empty())
            .then(|| average_rating(ratings.iter().map(|r| r.rating.value)));

        Ok(Profile {
            user,
            ratings,
            average_given,
        })
    }

    /// Snapshot of every rating.
    pub async fn list_ratings(&self) -> Vec<RatingByUser> {
        let tables = self.store.read().await;
        tables.ratings.list().iter().map(|r| by_user(&tables, r)).collect()
    }

    /// One rating with its author.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the rating does not exist.
    pub async fn rating(&self, id: RatingId) -> Result<RatingByUser, ServiceError> {
        let tables = self.store.read().await;
        tables
            .ratings
            .find_by_id(id)
            .map(|r| by_user(&tables, r))
            .ok_or(ServiceError::NotFound("rating"))
    }
}
