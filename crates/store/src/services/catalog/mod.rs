//! Catalog service.
//!
//! Product management for the logged-in vendor plus the public marketplace
//! views. Every mutating operation takes the caller's session explicitly and
//! checks that the product belongs to that vendor.

mod error;

pub use error::CatalogError;

use chrono::Utc;
use rust_decimal::Decimal;

use marketplace_core::{Category, Price, ProductId, ProductImage, ProductImages, VendorId};

use crate::db::{LocalStore, Medium};
use crate::models::{Product, ProductQuery, Session};

/// Product form input, before validation.
#[derive(Debug, Clone)]
pub struct ProductDraft {
    /// Product name.
    pub name: String,
    /// Product description.
    pub description: String,
    /// Unit price; must be positive.
    pub price: Decimal,
    /// Listing category.
    pub category: Category,
    /// Images in display order, at most five.
    pub images: Vec<ProductImage>,
    /// Units in stock.
    pub stock: u32,
}

/// A draft that passed validation.
struct ValidDraft {
    name: String,
    description: String,
    price: Price,
    category: Category,
    images: ProductImages,
    stock: u32,
}

impl ProductDraft {
    fn validate(self) -> Result<ValidDraft, CatalogError> {
        let name = self.name.trim();
        let description = self.description.trim();
        if name.is_empty() || description.is_empty() {
            return Err(CatalogError::Validation(
                "name and description are required".to_owned(),
            ));
        }

        Ok(ValidDraft {
            name: name.to_owned(),
            description: description.to_owned(),
            price: Price::new(self.price)?,
            category: self.category,
            images: ProductImages::new(self.images)?,
            stock: self.stock,
        })
    }
}

/// Summary figures for a vendor's dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorDashboard {
    /// The vendor's products, in stored order.
    pub products: Vec<Product>,
    /// Number of products.
    pub total_products: usize,
    /// Sum of stock over all products.
    pub total_stock: u64,
    /// Sum of price times stock over all products.
    pub total_value: Decimal,
}

impl VendorDashboard {
    fn from_products(products: Vec<Product>) -> Self {
        let total_stock = products.iter().map(|p| u64::from(p.stock)).sum();
        let total_value = products
            .iter()
            .map(|p| p.price.amount() * Decimal::from(p.stock))
            .sum();
        Self {
            total_products: products.len(),
            total_stock,
            total_value,
            products,
        }
    }
}

/// Catalog service.
pub struct CatalogService<'a, M> {
    store: &'a mut LocalStore<M>,
}

impl<'a, M: Medium> CatalogService<'a, M> {
    /// Create a new catalog service.
    pub fn new(store: &'a mut LocalStore<M>) -> Self {
        Self { store }
    }

    /// List a new product for the logged-in vendor.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Unauthorized` without a vendor session and
    /// `CatalogError::Validation` for bad input; nothing is written then.
    pub fn add_product(
        &mut self,
        session: Option<&Session>,
        draft: ProductDraft,
    ) -> Result<Product, CatalogError> {
        let vendor_id = require_vendor(session)?;
        let draft = draft.validate()?;
        let now = Utc::now();

        let product = self.store.upsert_product(Product {
            id: ProductId::generate(),
            vendor_id,
            name: draft.name,
            description: draft.description,
            price: draft.price,
            category: draft.category,
            images: draft.images,
            stock: draft.stock,
            created_at: now,
            updated_at: now,
        })?;

        tracing::info!(product_id = %product.id, vendor_id = %product.vendor_id, "product added");
        Ok(product)
    }

    /// Replace the editable fields of one of the vendor's products.
    ///
    /// `id`, `vendor_id` and `created_at` are kept.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Unauthorized`, `CatalogError::ProductNotFound`,
    /// `CatalogError::NotOwner` or `CatalogError::Validation`.
    pub fn update_product(
        &mut self,
        session: Option<&Session>,
        id: &ProductId,
        draft: ProductDraft,
    ) -> Result<Product, CatalogError> {
        let vendor_id = require_vendor(session)?;
        let existing = self
            .store
            .find_product_by_id(id)?
            .ok_or_else(|| CatalogError::ProductNotFound(id.clone()))?;
        if existing.vendor_id != vendor_id {
            return Err(CatalogError::NotOwner(id.clone()));
        }
        let draft = draft.validate()?;

        let product = self.store.upsert_product(Product {
            name: draft.name,
            description: draft.description,
            price: draft.price,
            category: draft.category,
            images: draft.images,
            stock: draft.stock,
            ..existing
        })?;

        tracing::info!(product_id = %product.id, "product updated");
        Ok(product)
    }

    /// Delete one of the vendor's products. Deleting an absent product is a
    /// no-op and returns false.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Unauthorized` without a vendor session and
    /// `CatalogError::NotOwner` if the product belongs to someone else.
    pub fn delete_product(
        &mut self,
        session: Option<&Session>,
        id: &ProductId,
    ) -> Result<bool, CatalogError> {
        let vendor_id = require_vendor(session)?;
        match self.store.find_product_by_id(id)? {
            None => Ok(false),
            Some(product) if product.vendor_id != vendor_id => {
                Err(CatalogError::NotOwner(id.clone()))
            }
            Some(_) => {
                let removed = self.store.delete_product(id)?;
                tracing::info!(product_id = %id, "product deleted");
                Ok(removed)
            }
        }
    }

    /// The logged-in vendor's products, in stored order.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Unauthorized` without a vendor session.
    pub fn vendor_products(&self, session: Option<&Session>) -> Result<Vec<Product>, CatalogError> {
        let vendor_id = require_vendor(session)?;
        Ok(self.store.list_products_by_vendor(&vendor_id)?)
    }

    /// The logged-in vendor's products and summary figures.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Unauthorized` without a vendor session.
    pub fn dashboard(&self, session: Option<&Session>) -> Result<VendorDashboard, CatalogError> {
        let products = self.vendor_products(session)?;
        Ok(VendorDashboard::from_products(products))
    }

    /// Public product detail.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the store cannot be read.
    pub fn product(&self, id: &ProductId) -> Result<Option<Product>, CatalogError> {
        Ok(self.store.find_product_by_id(id)?)
    }

    /// Public marketplace browse.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the store cannot be read.
    pub fn search(&self, query: &ProductQuery) -> Result<Vec<Product>, CatalogError> {
        let mut products = self.store.list_products()?;
        products.retain(|product| query.matches(product));
        Ok(products)
    }
}

fn require_vendor(session: Option<&Session>) -> Result<VendorId, CatalogError> {
    session
        .and_then(Session::vendor_id)
        .ok_or(CatalogError::Unauthorized)
}
