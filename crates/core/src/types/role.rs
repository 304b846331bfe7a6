//! Marketplace account roles.

use serde::{Deserialize, Serialize};

/// What a user account is allowed to do on the marketplace.
///
/// Buyers only purchase; sellers only list products; `both` does both.
/// Accounts that sell (`seller` or `both`) must carry a business name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Buyer,
    Seller,
    Both,
}

impl Role {
    /// Whether accounts with this role must provide a business name.
    #[must_use]
    pub const fn requires_business_name(self) -> bool {
        matches!(self, Self::Seller | Self::Both)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buyer => write!(f, "buyer"),
            Self::Seller => write!(f, "seller"),
            Self::Both => write!(f, "both"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "buyer" => Ok(Self::Buyer),
            "seller" => Ok(Self::Seller),
            "both" => Ok(Self::Both),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}
