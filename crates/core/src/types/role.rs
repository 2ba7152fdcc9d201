//! User roles.

use serde::{Deserialize, Serialize};

/// Role of a user, deciding which parts of the application they can reach.
///
/// Serialized as `admin`, `user` and `store_owner`. `customer` is accepted
/// as an alias for [`Role::Customer`] when parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    /// Manages users, stores and ratings.
    #[serde(rename = "admin")]
    Admin,
    /// Browses stores and submits ratings.
    #[serde(rename = "user", alias = "customer")]
    Customer,
    /// Views the ratings of the one store they own.
    #[serde(rename = "store_owner")]
    StoreOwner,
}

impl Role {
    /// All roles, in display order.
    pub const ALL: [Self; 3] = [Self::Admin, Self::Customer, Self::StoreOwner];

    /// Wire name of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Customer => "user",
            Self::StoreOwner => "store_owner",
        }
    }

    /// Human-readable label (`store owner`).
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Customer => "user",
            Self::StoreOwner => "store owner",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "user" | "customer" => Ok(Self::Customer),
            "store_owner" => Ok(Self::StoreOwner),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names() {
        assert_eq!(serde_json::to_string(&Role::Customer).unwrap(), "\"user\"");
        assert_eq!(
            serde_json::to_string(&Role::StoreOwner).unwrap(),
            "\"store_owner\""
        );
        let alias: Role = serde_json::from_str("\"customer\"").unwrap();
        assert_eq!(alias, Role::Customer);
    }

    #[test]
    fn test_from_str_round_trips_display() {
        for role in Role::ALL {
            assert_eq!(role.to_string().parse::<Role>().unwrap(), role);
        }
        assert!("owner".parse::<Role>().is_err());
    }

    #[test]
    fn test_label() {
        assert_eq!(Role::StoreOwner.label(), "store owner");
    }
}
