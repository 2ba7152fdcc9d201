//! Rating domain type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use store_ratings_core::{RatingId, Stars, StoreId, UserId};

/// One user's rating of one store. At most one exists per `(user_id, store_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    pub id: RatingId,
    pub user_id: UserId,
    pub store_id: StoreId,
    pub value: Stars,
    /// Time of the latest submission (re-rating moves it forward).
    pub created_at: DateTime<Utc>,
}
