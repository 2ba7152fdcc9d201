//! Seed datasets for the Data Store.
//!
//! The server starts from [`SeedData::demo`] unless a JSON file is
//! configured. Seed users carry plaintext passwords, which are hashed while
//! the tables are built.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use store_ratings_core::{Email, Role, StoreId, UserId};

use super::ratings::{find_for_pair, recompute_store_aggregate};
use super::{RepositoryError, Tables};
use crate::models::{Rating, Store, User};
use crate::services::auth::hash_password;

/// The built-in demo dataset.
const DEMO_JSON: &str = include_str!("../../seed/demo.json");

/// Errors that can occur while loading seed data.
#[derive(Debug, Error)]
pub enum SeedError {
    /// The seed file could not be read.
    #[error("failed to read seed file: {0}")]
    Io(#[from] std::io::Error),

    /// The seed data is not valid JSON for [`SeedData`].
    #[error("invalid seed data: {0}")]
    Json(#[from] serde_json::Error),

    /// Two records of one collection share an ID.
    #[error("duplicate id in seed data: {0}")]
    DuplicateId(#[from] RepositoryError),

    /// Two users share an email.
    #[error("duplicate email in seed data: {0}")]
    DuplicateEmail(Email),

    /// A user rated the same store twice.
    #[error("user {user_id} rated store {store_id} more than once")]
    DuplicateRating { user_id: UserId, store_id: StoreId },

    /// A seed record uses or points at the largest possible ID, leaving
    /// nothing to allocate.
    #[error("seed {collection} use the largest possible id")]
    IdOutOfRange { collection: &'static str },

    /// A seed password could not be hashed.
    #[error("failed to hash seed password")]
    PasswordHash,
}

/// A user as written in a seed file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedUser {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub address: String,
    /// Plaintext password; omitted for accounts that cannot log in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_id: Option<StoreId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// A complete dataset for all three collections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub users: Vec<SeedUser>,
    #[serde(default)]
    pub stores: Vec<Store>,
    #[serde(default)]
    pub ratings: Vec<Rating>,
}

impl SeedData {
    /// The demo dataset: one user of each role, two stores and one rating.
    ///
    /// Store 2 names an owner (user 4) that does not exist. The dangling
    /// reference is kept.
    ///
    /// # Errors
    ///
    /// Returns `SeedError::Json` if the embedded dataset does not parse.
    pub fn demo() -> Result<Self, SeedError> {
        Self::from_json(DEMO_JSON)
    }

    /// Parse a dataset from JSON text.
    ///
    /// # Errors
    ///
    /// Returns `SeedError::Json` if the text does not parse.
    pub fn from_json(raw: &str) -> Result<Self, SeedError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Load a dataset from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `SeedError::Io` if the file cannot be read and
    /// `SeedError::Json` if it does not parse.
    pub fn from_file(path: &Path) -> Result<Self, SeedError> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    /// Build the collections: hash passwords, check uniqueness and
    /// recompute every store aggregate from the ratings.
    ///
    /// # Errors
    ///
    /// Returns `SeedError` on duplicate IDs, emails or rating pairs, on an ID
    /// of `i32::MAX`, or if a password cannot be hashed.
    pub fn into_tables(self) -> Result<Tables, SeedError> {
        let mut tables = Tables::default();

        for seed in self.users {
            if tables.users.find_one(|u| u.email == seed.email).is_some() {
                return Err(SeedError::DuplicateEmail(seed.email));
            }
            let password_hash = seed
                .password
                .as_deref()
                .map(hash_password)
                .transpose()
                .map_err(|_| SeedError::PasswordHash)?;

            tables.users.insert(User {
                id: seed.id,
                name: seed.name,
                email: seed.email,
                address: seed.address,
                password_hash,
                role: seed.role,
                store_id: seed.store_id,
                avatar: seed.avatar,
            })?;
        }

        for store in self.stores {
            tables.stores.insert(store)?;
        }

        for rating in self.ratings {
            if find_for_pair(&tables, rating.user_id, rating.store_id).is_some() {
                return Err(SeedError::DuplicateRating {
                    user_id: rating.user_id,
                    store_id: rating.store_id,
                });
            }
            tables.ratings.insert(rating)?;
        }

        // Dangling references must stay dangling: a new record may not
        // take an ID that an existing record already points at.
        let owners: Vec<UserId> = tables.stores.list().iter().map(|s| s.owner_id).collect();
        let raters: Vec<UserId> = tables.ratings.list().iter().map(|r| r.user_id).collect();
        for id in owners.into_iter().chain(raters) {
            tables.users.reserve(id);
        }
        let owned: Vec<StoreId> = tables.users.list().iter().filter_map(|u| u.store_id).collect();
        let rated: Vec<StoreId> = tables.ratings.list().iter().map(|r| r.store_id).collect();
        for id in owned.into_iter().chain(rated) {
            tables.stores.reserve(id);
        }
        for (collection, last_id) in [
            ("users", tables.users.last_id()),
            ("stores", tables.stores.last_id()),
            ("ratings", tables.ratings.last_id()),
        ] {
            if last_id == i32::MAX {
                return Err(SeedError::IdOutOfRange { collection });
            }
        }

        let seeded: Vec<(StoreId, f64)> = tables
            .stores
            .list()
            .iter()
            .map(|s| (s.id, s.average_rating))
            .collect();
        for (store_id, seeded_average) in seeded {
            if let Some(store) = recompute_store_aggregate(&mut tables, store_id)
                && (store.average_rating - seeded_average).abs() > f64::EPSILON
            {
                warn!(
                    store_id = %store_id,
                    seeded = seeded_average,
                    actual = store.average_rating,
                    "Normalised stale store aggregate"
                );
            }
        }

        Ok(tables)
    }
}
