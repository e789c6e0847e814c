//! Text and JSON rendering.

use chrono::{DateTime, Utc};
use serde::Serialize;

use marketplace_core::{Category, Email, ProductId, VendorId};
use marketplace_store::{Product, Vendor};

use super::CommandError;

/// A vendor as shown to the user. The password hash is never printed.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorView<'a> {
    pub id: &'a VendorId,
    pub name: &'a str,
    pub email: &'a Email,
    pub store_name: &'a str,
    pub description: &'a str,
    pub created_at: DateTime<Utc>,
}

impl<'a> From<&'a Vendor> for VendorView<'a> {
    fn from(vendor: &'a Vendor) -> Self {
        Self {
            id: &vendor.id,
            name: &vendor.name,
            email: &vendor.email,
            store_name: &vendor.store_name,
            description: &vendor.description,
            created_at: vendor.created_at,
        }
    }
}

/// One line of a product listing. Images are counted, not printed.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRow<'a> {
    pub id: &'a ProductId,
    pub name: &'a str,
    pub price: String,
    pub category: Category,
    pub stock: u32,
    pub images: usize,
}

impl<'a> From<&'a Product> for ProductRow<'a> {
    fn from(product: &'a Product) -> Self {
        Self {
            id: &product.id,
            name: &product.name,
            price: product.price.display(),
            category: product.category,
            stock: product.stock,
            images: product.images.len(),
        }
    }
}

impl ProductRow<'_> {
    fn line(&self) -> String {
        format!(
            "{}  {}  {}  [{}]  stock {}",
            self.id, self.name, self.price, self.category, self.stock
        )
    }
}

/// Pretty-print any serializable value.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CommandError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn vendor(vendor: &Vendor, json: bool) -> Result<(), CommandError> {
    let view = VendorView::from(vendor);
    if json {
        return print_json(&view);
    }
    println!("{} <{}>", view.name, view.email);
    println!("  id:     {}", view.id);
    println!("  store:  {}", view.store_name);
    if !view.description.is_empty() {
        println!("  about:  {}", view.description);
    }
    println!("  since:  {}", view.created_at.format("%Y-%m-%d"));
    Ok(())
}

pub fn product_list(products: &[Product], json: bool) -> Result<(), CommandError> {
    let rows: Vec<ProductRow<'_>> = products.iter().map(ProductRow::from).collect();
    if json {
        return print_json(&rows);
    }
    if rows.is_empty() {
        println!("No products found");
    }
    for row in &rows {
        println!("{}", row.line());
    }
    Ok(())
}

/// Full product detail. JSON output includes the image data URLs.
pub fn product(product: &Product, json: bool) -> Result<(), CommandError> {
    if json {
        return print_json(product);
    }
    println!("{}", product.name);
    println!("  id:       {}", product.id);
    println!("  vendor:   {}", product.vendor_id);
    println!("  price:    {}", product.price.display());
    println!("  category: {}", product.category);
    println!("  stock:    {}", product.stock);
    println!("  images:   {}", product.images.len());
    println!("  updated:  {}", product.updated_at.to_rfc3339());
    println!();
    println!("{}", product.description);
    Ok(())
}
