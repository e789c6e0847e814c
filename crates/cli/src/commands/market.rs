//! Public marketplace browsing.

use marketplace_core::Category;
use marketplace_store::models::ProductQuery;
use marketplace_store::services::CatalogService;

use super::{CommandError, open_store, output};

/// Search every vendor's products.
pub fn search(
    term: Option<String>,
    category: Option<Category>,
    json: bool,
) -> Result<(), CommandError> {
    let mut store = open_store()?;
    let products = CatalogService::new(&mut store).search(&ProductQuery { term, category })?;
    output::product_list(&products, json)
}

pub fn categories(json: bool) -> Result<(), CommandError> {
    if json {
        return output::print_json(&Category::ALL);
    }
    for category in Category::ALL {
        println!("{category}");
    }
    Ok(())
}
