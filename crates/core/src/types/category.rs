//! Product categories.

use serde::{Deserialize, Serialize};

/// The fixed set of product categories a listing can belong to.
///
/// The wire strings are the market's own labels (a mix of Filipino and
/// English) and are load-bearing: they appear verbatim in request bodies,
/// stored records and search filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "gulay")]
    Gulay,
    #[serde(rename = "prutas")]
    Prutas,
    #[serde(rename = "dairy & eggs")]
    DairyAndEggs,
    #[serde(rename = "herbs & spices")]
    HerbsAndSpices,
    #[serde(rename = "organic snacks")]
    OrganicSnacks,
    #[serde(rename = "meat")]
    Meat,
    #[serde(rename = "fish")]
    Fish,
    #[serde(rename = "clothes")]
    Clothes,
    #[serde(rename = "household items")]
    HouseholdItems,
}

impl Category {
    /// All categories, in display order.
    pub const ALL: [Self; 9] = [
        Self::Gulay,
        Self::Prutas,
        Self::DairyAndEggs,
        Self::HerbsAndSpices,
        Self::OrganicSnacks,
        Self::Meat,
        Self::Fish,
        Self::Clothes,
        Self::HouseholdItems,
    ];

    /// The wire label for this category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Gulay => "gulay",
            Self::Prutas => "prutas",
            Self::DairyAndEggs => "dairy & eggs",
            Self::HerbsAndSpices => "herbs & spices",
            Self::OrganicSnacks => "organic snacks",
            Self::Meat => "meat",
            Self::Fish => "fish",
            Self::Clothes => "clothes",
            Self::HouseholdItems => "household items",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("invalid category: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_all() {
        for category in Category::ALL {
            let parsed: Category = category.as_str().parse().expect("valid category");
            assert_eq!(parsed, category);
        }
    }

    #[test]
    fn test_wire_labels() {
        assert_eq!(Category::DairyAndEggs.as_str(), "dairy & eggs");
        assert_eq!(Category::HouseholdItems.as_str(), "household items");
    }

    #[test]
    fn test_rejects_unknown() {
        assert!("electronics".parse::<Category>().is_err());
    }
}
