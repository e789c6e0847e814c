//! Product categories.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when a string is not a known category.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown category: {0}")]
pub struct CategoryError(pub String);

/// The fixed set of categories a product can be listed under.
///
/// Serialized with the human-readable label, e.g. `"Home & Garden"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Electronics")]
    Electronics,
    #[serde(rename = "Clothing & Fashion")]
    ClothingFashion,
    #[serde(rename = "Home & Garden")]
    HomeGarden,
    #[serde(rename = "Sports & Outdoors")]
    SportsOutdoors,
    #[serde(rename = "Books & Media")]
    BooksMedia,
    #[serde(rename = "Health & Beauty")]
    HealthBeauty,
    #[serde(rename = "Toys & Games")]
    ToysGames,
    #[serde(rename = "Automotive")]
    Automotive,
    #[serde(rename = "Food & Beverages")]
    FoodBeverages,
    #[serde(rename = "Other")]
    Other,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Self; 10] = [
        Self::Electronics,
        Self::ClothingFashion,
        Self::HomeGarden,
        Self::SportsOutdoors,
        Self::BooksMedia,
        Self::HealthBeauty,
        Self::ToysGames,
        Self::Automotive,
        Self::FoodBeverages,
        Self::Other,
    ];

    /// Human-readable label, identical to the serialized form.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Electronics => "Electronics",
            Self::ClothingFashion => "Clothing & Fashion",
            Self::HomeGarden => "Home & Garden",
            Self::SportsOutdoors => "Sports & Outdoors",
            Self::BooksMedia => "Books & Media",
            Self::HealthBeauty => "Health & Beauty",
            Self::ToysGames => "Toys & Games",
            Self::Automotive => "Automotive",
            Self::FoodBeverages => "Food & Beverages",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Category {
    type Err = CategoryError;

    /// Parses a label. Matching ignores ASCII case so CLI input like
    /// `"home & garden"` is accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CategoryError(s.to_owned()))
    }
}
