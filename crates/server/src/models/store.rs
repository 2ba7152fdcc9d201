//! Store domain types.

use serde::{Deserialize, Serialize};

use store_ratings_core::{Email, RatingId, StoreId, UserId};

/// A rated store.
///
/// `ratings` and `average_rating` are derived from the Ratings collection
/// and only change through rating aggregation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Store {
    pub id: StoreId,
    pub name: String,
    pub email: Email,
    pub address: String,
    pub owner_id: UserId,
    /// IDs of the store's current ratings, oldest first.
    #[serde(default)]
    pub ratings: Vec<RatingId>,
    /// Mean of the current rating values, `0.0` when there are none.
    #[serde(default)]
    pub average_rating: f64,
    #[serde(default)]
    pub image: Option<String>,
}

impl Store {
    /// Whether `needle_lower` occurs in the name, email or address.
    #[must_use]
    pub fn matches_search(&self, needle_lower: &str) -> bool {
        needle_lower.is_empty()
            || self.name.to_lowercase().contains(needle_lower)
            || self.email.contains_ignore_case(needle_lower)
            || self.address.to_lowercase().contains(needle_lower)
    }

    /// Directory search: name or address only.
    #[must_use]
    pub fn matches_directory_search(&self, needle_lower: &str) -> bool {
        needle_lower.is_empty()
            || self.name.to_lowercase().contains(needle_lower)
            || self.address.to_lowercase().contains(needle_lower)
    }
}

/// Fields of a store about to be inserted. Starts with no ratings.
#[derive(Debug, Clone)]
pub struct NewStore {
    pub name: String,
    pub email: Email,
    pub address: String,
    pub owner_id: UserId,
    pub image: Option<String>,
}

impl NewStore {
    /// Build the stored record once an ID has been allocated.
    #[must_use]
    pub fn into_store(self, id: StoreId) -> Store {
        Store {
            id,
            name: self.name,
            email: self.email,
            address: self.address,
            owner_id: self.owner_id,
            ratings: Vec::new(),
            average_rating: 0.0,
            image: self.image,
        }
    }
}

/// Partial update of a store's own fields.
#[derive(Debug, Clone, Default)]
pub struct StorePatch {
    pub name: Option<String>,
    pub email: Option<Email>,
    pub address: Option<String>,
    pub owner_id: Option<UserId>,
    pub image: Option<Option<String>>,
}

impl StorePatch {
    /// Merge the present fields into `store`.
    pub fn apply(self, store: &mut Store) {
        if let Some(name) = self.name {
            store.name = name;
        }
        if let Some(email) = self.email {
            store.email = email;
        }
        if let Some(address) = self.address {
            store.address = address;
        }
        if let Some(owner_id) = self.owner_id {
            store.owner_id = owner_id;
        }
        if let Some(image) = self.image {
            store.image = image;
        }
    }
}
