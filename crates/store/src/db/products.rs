//! Product collection operations.

use chrono::{DateTime, TimeDelta, Utc};

use marketplace_core::{ProductId, VendorId};

use super::{LocalStore, Medium, RepositoryError, keys, replace_or_append};
use crate::models::Product;

impl<M: Medium> LocalStore<M> {
    /// All products, in stored order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Unavailable` if the medium cannot be read.
    pub fn list_products(&self) -> Result<Vec<Product>, RepositoryError> {
        self.load_collection(keys::PRODUCTS)
    }

    /// Find a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Unavailable` if the medium cannot be read.
    pub fn find_product_by_id(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError> {
        Ok(self
            .list_products()?
            .into_iter()
            .find(|product| &product.id == id))
    }

    /// Products owned by `vendor_id`, in stored order. Empty for vendors with
    /// no products or unknown vendors.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Unavailable` if the medium cannot be read.
    pub fn list_products_by_vendor(
        &self,
        vendor_id: &VendorId,
    ) -> Result<Vec<Product>, RepositoryError> {
        let mut products = self.list_products()?;
        products.retain(|product| &product.vendor_id == vendor_id);
        Ok(products)
    }

    /// Insert a product, or replace the product with the same ID in place.
    ///
    /// `updated_at` is always re-stamped, whatever the caller set: it becomes
    /// the current time, but never earlier than `created_at` and always
    /// later than the previously stored `updated_at` for this ID. Returns the
    /// record as stored.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Corrupt` if the stored collection does not
    /// decode, or `RepositoryError::Unavailable` / `RepositoryError::Serialize`
    /// if it cannot be written. The stored collection is then unchanged.
    pub fn upsert_product(&mut self, mut product: Product) -> Result<Product, RepositoryError> {
        let mut products = self.load_collection_for_write::<Product>(keys::PRODUCTS)?;
        let previous = products
            .iter()
            .find(|p| p.id == product.id)
            .map(|p| p.updated_at);

        product.updated_at = next_update_stamp(Utc::now(), product.created_at, previous);

        let id = product.id.clone();
        let replaced =
            replace_or_append(&mut products, product.clone(), |p| p.id == id).is_some();
        self.save_collection(keys::PRODUCTS, &products)?;
        tracing::debug!(product_id = %id, replaced, "upserted product");
        Ok(product)
    }

    /// Remove the product with `id`. Absent IDs are a no-op.
    ///
    /// Returns true if a product was removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Corrupt` if the stored collection does not
    /// decode, or a storage error if it cannot be read or written.
    pub fn delete_product(&mut self, id: &ProductId) -> Result<bool, RepositoryError> {
        let mut products = self.load_collection_for_write::<Product>(keys::PRODUCTS)?;
        let before = products.len();
        products.retain(|product| &product.id != id);
        if products.len() == before {
            tracing::debug!(product_id = %id, "delete of absent product ignored");
            return Ok(false);
        }
        self.save_collection(keys::PRODUCTS, &products)?;
        tracing::debug!(product_id = %id, "deleted product");
        Ok(true)
    }
}

/// Pick the `updated_at` for a write happening at `now`.
fn next_update_stamp(
    now: DateTime<Utc>,
    created_at: DateTime<Utc>,
    previous: Option<DateTime<Utc>>,
) -> DateTime<Utc> {
    let stamp = now.max(created_at);
    match previous {
        Some(prev) if stamp <= prev => prev + TimeDelta::microseconds(1),
        _ => stamp,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use marketplace_core::{Category, Price, ProductImages};
    use rust_decimal::Decimal;

    use super::*;
    use crate::db::MemoryMedium;

    fn product(id: &str, vendor: &str, stock: u32) -> Product {
        let now = Utc::now();
        Product {
            id: ProductId::new(id),
            vendor_id: VendorId::new(vendor),
            name: format!("Product {id}"),
            description: "Test product".to_owned(),
            price: Price::new(Decimal::new(1050, 2)).unwrap(),
            category: Category::Other,
            images: ProductImages::default(),
            stock,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_upsert_stamps_updated_at() {
        let mut store = LocalStore::new(MemoryMedium::new());
        let mut p = product("p1", "v1", 3);
        p.updated_at = p.created_at - TimeDelta::days(30);

        let stored = store.upsert_product(p).unwrap();
        assert!(stored.updated_at >= stored.created_at);

        let again = store.upsert_product(stored.clone()).unwrap();
        assert!(again.updated_at > stored.updated_at);
        assert_eq!(
            store.find_product_by_id(&again.id).unwrap().unwrap().updated_at,
            again.updated_at
        );
    }

    #[test]
    fn test_upsert_replaces_not_duplicates() {
        let mut store = LocalStore::new(MemoryMedium::new());
        store.upsert_product(product("p1", "v1", 3)).unwrap();
        store.upsert_product(product("p2", "v1", 1)).unwrap();
        store.upsert_product(product("p1", "v1", 0)).unwrap();

        let products = store.list_products().unwrap();
        assert_eq!(products.iter().filter(|p| p.id.as_str() == "p1").count(), 1);
        assert_eq!(products[0].id.as_str(), "p1");
        assert_eq!(
            store
                .find_product_by_id(&ProductId::new("p1"))
                .unwrap()
                .unwrap()
                .stock,
            0
        );
    }

    #[test]
    fn test_list_by_vendor_is_exact_subset() {
        let mut store = LocalStore::new(MemoryMedium::new());
        store.upsert_product(product("p1", "v1", 1)).unwrap();
        store.upsert_product(product("p2", "v2", 1)).unwrap();
        store.upsert_product(product("p3", "v1", 1)).unwrap();

        let all = store.list_products().unwrap();
        for vendor in ["v1", "v2", "v3"] {
            let vid = VendorId::new(vendor);
            let expected: Vec<Product> =
                all.iter().filter(|p| p.vendor_id == vid).cloned().collect();
            assert_eq!(store.list_products_by_vendor(&vid).unwrap(), expected);
        }
        assert!(
            store
                .list_products_by_vendor(&VendorId::new("v3"))
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn test_delete_is_idempotent() {
        let mut store = LocalStore::new(MemoryMedium::new());
        store.upsert_product(product("p1", "v1", 1)).unwrap();

        assert!(store.delete_product(&ProductId::new("p1")).unwrap());
        assert!(!store.delete_product(&ProductId::new("p1")).unwrap());
        assert!(!store.delete_product(&ProductId::new("never")).unwrap());
        assert_eq!(store.find_product_by_id(&ProductId::new("p1")).unwrap(), None);
        assert_eq!(
            store.find_product_by_id(&ProductId::new("never")).unwrap(),
            None
        );
    }

    #[test]
    fn test_corrupt_products_block_upsert_and_delete() {
        let mut medium = MemoryMedium::new();
        medium.set(keys::PRODUCTS, r#"[{"id":"p1","price":"free"}]"#).unwrap();
        let mut store = LocalStore::new(medium);

        assert!(store.list_products().unwrap().is_empty());
        assert!(matches!(
            store.upsert_product(product("p2", "v1", 1)),
            Err(RepositoryError::Corrupt { key: keys::PRODUCTS, .. })
        ));
        assert!(matches!(
            store.delete_product(&ProductId::new("p1")),
            Err(RepositoryError::Corrupt { .. })
        ));
        assert_eq!(
            store.medium().get(keys::PRODUCTS).unwrap().as_deref(),
            Some(r#"[{"id":"p1","price":"free"}]"#)
        );
    }

    #[test]
    fn test_next_update_stamp() {
        let t0 = Utc::now();
        let later = t0 + TimeDelta::seconds(5);

        assert_eq!(next_update_stamp(t0, t0, None), t0);
        // Clock behind the creation time.
        assert_eq!(next_update_stamp(t0, later, None), later);
        // Clock did not advance since the previous write.
        assert_eq!(
            next_update_stamp(t0, t0, Some(t0)),
            t0 + TimeDelta::microseconds(1)
        );
        assert_eq!(
            next_update_stamp(later, t0, Some(t0)),
            later
        );
    }
}
