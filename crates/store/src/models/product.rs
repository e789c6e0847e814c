//! Product records and marketplace queries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use marketplace_core::{Category, Price, ProductId, ProductImages, VendorId};

/// A product listed by a vendor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Owning vendor. Not checked against the vendor collection.
    pub vendor_id: VendorId,
    /// Product name.
    pub name: String,
    /// Product description.
    pub description: String,
    /// Unit price.
    pub price: Price,
    /// Listing category.
    pub category: Category,
    /// Inline images, at most five.
    pub images: ProductImages,
    /// Units in stock.
    pub stock: u32,
    /// When the product was first listed.
    pub created_at: DateTime<Utc>,
    /// Last write time; stamped by the store on every upsert.
    pub updated_at: DateTime<Utc>,
}

/// Marketplace browse filter.
///
/// An empty query matches every product.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    /// Case-insensitive substring of the name or description.
    pub term: Option<String>,
    /// Exact category.
    pub category: Option<Category>,
}

impl ProductQuery {
    /// Returns true if `product` passes both filters.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        let term_ok = self
            .term
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .is_none_or(|term| {
                let term = term.to_lowercase();
                product.name.to_lowercase().contains(&term)
                    || product.description.to_lowercase().contains(&term)
            });

        let category_ok = self.category.is_none_or(|c| c == product.category);

        term_ok && category_ok
    }
}
