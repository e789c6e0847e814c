//! Product management commands for the logged-in vendor.
//!
//! # Usage
//!
//! ```bash
//! mkt product add -n "Desk Lamp" -d "Warm LED light" -p 19.99 -c "Home & Garden" --stock 4 --image lamp.png
//! mkt product edit <id> --stock 0
//! mkt product list
//! mkt product show <id>
//! mkt product delete <id>
//! mkt dashboard
//! ```

use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use clap::Args;
use rust_decimal::Decimal;

use marketplace_core::{Category, ImageError, ProductId, ProductImage};
use marketplace_store::services::{CatalogService, ProductDraft};

use super::{CommandError, open_store, output};

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Product name
    #[arg(short, long)]
    pub name: String,

    /// Product description
    #[arg(short, long)]
    pub description: String,

    /// Unit price, e.g. 19.99
    #[arg(short, long)]
    pub price: Decimal,

    /// Category label, e.g. "Home & Garden"
    #[arg(short, long)]
    pub category: Category,

    /// Units in stock
    #[arg(long, default_value_t = 0)]
    pub stock: u32,

    /// Image file (repeatable, at most 5)
    #[arg(long = "image")]
    pub images: Vec<PathBuf>,
}

/// Fields to change; anything omitted keeps its current value.
#[derive(Debug, Args)]
pub struct EditArgs {
    /// Product ID
    pub id: String,

    /// Product name
    #[arg(short, long)]
    pub name: Option<String>,

    /// Product description
    #[arg(short, long)]
    pub description: Option<String>,

    /// Unit price, e.g. 19.99
    #[arg(short, long)]
    pub price: Option<Decimal>,

    /// Category label, e.g. "Home & Garden"
    #[arg(short, long)]
    pub category: Option<Category>,

    /// Units in stock
    #[arg(long)]
    pub stock: Option<u32>,

    /// Replace the images with these files (repeatable)
    #[arg(long = "image")]
    pub images: Vec<PathBuf>,

    /// Remove all images
    #[arg(long, conflicts_with = "images")]
    pub clear_images: bool,
}

pub fn add(args: AddArgs, json: bool) -> Result<(), CommandError> {
    let mut store = open_store()?;
    let session = store.get_session()?;

    let draft = ProductDraft {
        name: args.name,
        description: args.description,
        price: args.price,
        category: args.category,
        images: encode_images(&args.images)?,
        stock: args.stock,
    };
    let product = CatalogService::new(&mut store).add_product(session.as_ref(), draft)?;

    output::product(&product, json)
}

pub fn edit(args: EditArgs, json: bool) -> Result<(), CommandError> {
    let mut store = open_store()?;
    let session = store.get_session()?;
    let mut catalog = CatalogService::new(&mut store);

    let id = ProductId::new(args.id);
    let current = catalog
        .product(&id)?
        .ok_or_else(|| CommandError::ProductNotFound(id.to_string()))?;

    let images = if args.clear_images {
        Vec::new()
    } else if args.images.is_empty() {
        current.images.iter().cloned().collect()
    } else {
        encode_images(&args.images)?
    };

    let draft = ProductDraft {
        name: args.name.unwrap_or(current.name),
        description: args.description.unwrap_or(current.description),
        price: args.price.unwrap_or_else(|| current.price.amount()),
        category: args.category.unwrap_or(current.category),
        images,
        stock: args.stock.unwrap_or(current.stock),
    };
    let product = catalog.update_product(session.as_ref(), &id, draft)?;

    output::product(&product, json)
}

pub fn delete(id: String) -> Result<(), CommandError> {
    let mut store = open_store()?;
    let session = store.get_session()?;
    let id = ProductId::new(id);

    if CatalogService::new(&mut store).delete_product(session.as_ref(), &id)? {
        println!("Deleted {id}");
    } else {
        println!("No product {id}");
    }
    Ok(())
}

/// The logged-in vendor's products.
pub fn list(json: bool) -> Result<(), CommandError> {
    let mut store = open_store()?;
    let session = store.get_session()?;
    let products = CatalogService::new(&mut store).vendor_products(session.as_ref())?;
    output::product_list(&products, json)
}

pub fn show(id: String, json: bool) -> Result<(), CommandError> {
    let mut store = open_store()?;
    let id = ProductId::new(id);
    let product = CatalogService::new(&mut store)
        .product(&id)?
        .ok_or_else(|| CommandError::ProductNotFound(id.to_string()))?;
    output::product(&product, json)
}

pub fn dashboard(json: bool) -> Result<(), CommandError> {
    let mut store = open_store()?;
    let session = store.get_session()?;
    let dashboard = CatalogService::new(&mut store).dashboard(session.as_ref())?;

    if json {
        return output::print_json(&serde_json::json!({
            "totalProducts": dashboard.total_products,
            "totalStock": dashboard.total_stock,
            "totalValue": dashboard.total_value.to_string(),
        }));
    }
    println!("Products:    {}", dashboard.total_products);
    println!("Total stock: {}", dashboard.total_stock);
    println!("Total value: ${:.2}", dashboard.total_value);
    println!();
    output::product_list(&dashboard.products, false)
}

fn encode_images(paths: &[PathBuf]) -> Result<Vec<ProductImage>, CommandError> {
    paths.iter().map(|path| encode_image(path)).collect()
}

/// Read an image file into a base64 data URL.
///
/// Files over [`ProductImage::MAX_BYTES`] are rejected before they are read.
fn encode_image(path: &Path) -> Result<ProductImage, CommandError> {
    let mime = image_mime(path).ok_or_else(|| CommandError::ImageType(path.to_path_buf()))?;
    let read_error = |source| CommandError::ImageRead {
        path: path.to_path_buf(),
        source,
    };
    let size = std::fs::metadata(path).map_err(read_error)?.len();
    if size > ProductImage::MAX_BYTES as u64 {
        return Err(ImageError::TooLarge {
            max: ProductImage::MAX_BYTES,
            size: usize::try_from(size).unwrap_or(usize::MAX),
        }
        .into());
    }
    let bytes = std::fs::read(path).map_err(read_error)?;
    Ok(ProductImage::from_base64(mime, &STANDARD.encode(bytes))?)
}

fn image_mime(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "svg" => Some("image/svg+xml"),
        _ => None,
    }
}
