//! Integration tests for the product lifecycle and marketplace views.

#![allow(clippy::unwrap_used)]

use marketplace_core::{Category, ProductId};
use marketplace_integration_tests::{TestContext, new_vendor, product_draft};
use marketplace_store::models::ProductQuery;
use marketplace_store::services::{AuthService, CatalogError, CatalogService};
use rust_decimal::Decimal;

#[test]
fn test_product_lifecycle_across_restarts() {
    let ctx = TestContext::new().unwrap();
    let mut store = ctx.open().unwrap();
    let vendor = AuthService::new(&mut store)
        .register_vendor(new_vendor("Ada", "a@b.com", "secret1"))
        .unwrap();
    let session = store.get_session().unwrap();

    let lamp = CatalogService::new(&mut store)
        .add_product(
            session.as_ref(),
            product_draft("Desk Lamp", Decimal::new(1050, 2), 3, Category::HomeGarden),
        )
        .unwrap();
    assert_eq!(lamp.vendor_id, vendor.id);
    assert!(lamp.updated_at >= lamp.created_at);

    let mut store = ctx.open().unwrap();
    let session = store.get_session().unwrap();
    let restocked = CatalogService::new(&mut store)
        .update_product(
            session.as_ref(),
            &lamp.id,
            product_draft("Desk Lamp", Decimal::new(1050, 2), 0, Category::HomeGarden),
        )
        .unwrap();
    assert_eq!(restocked.stock, 0);
    assert!(restocked.updated_at > lamp.updated_at);

    let store = ctx.open().unwrap();
    let products = store.list_products().unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].id, lamp.id);
    assert_eq!(products[0].stock, 0);

    let mut store = ctx.open().unwrap();
    let session = store.get_session().unwrap();
    let mut catalog = CatalogService::new(&mut store);
    assert!(catalog.delete_product(session.as_ref(), &lamp.id).unwrap());
    assert!(catalog.product(&lamp.id).unwrap().is_none());
    assert!(
        !catalog
            .delete_product(session.as_ref(), &ProductId::new("never-existed"))
            .unwrap()
    );
}

#[test]
fn test_dashboard_counts_only_own_products() {
    let ctx = TestContext::new().unwrap();
    let mut store = ctx.open().unwrap();

    AuthService::new(&mut store)
        .register_vendor(new_vendor("Bob", "bob@b.com", "secret1"))
        .unwrap();
    let bob = store.get_session().unwrap();
    CatalogService::new(&mut store)
        .add_product(
            bob.as_ref(),
            product_draft("Tyre", Decimal::new(80, 0), 4, Category::Automotive),
        )
        .unwrap();

    AuthService::new(&mut store)
        .register_vendor(new_vendor("Ada", "a@b.com", "secret1"))
        .unwrap();
    let ada = store.get_session().unwrap();
    let mut catalog = CatalogService::new(&mut store);
    catalog
        .add_product(
            ada.as_ref(),
            product_draft("Desk Lamp", Decimal::new(1050, 2), 2, Category::HomeGarden),
        )
        .unwrap();
    catalog
        .add_product(
            ada.as_ref(),
            product_draft("Shade", Decimal::new(5, 0), 0, Category::HomeGarden),
        )
        .unwrap();

    let dashboard = catalog.dashboard(ada.as_ref()).unwrap();
    assert_eq!(dashboard.total_products, 2);
    assert_eq!(dashboard.total_stock, 2);
    assert_eq!(dashboard.total_value, Decimal::new(21, 0));
    assert!(dashboard.products.iter().all(|p| p.name != "Tyre"));
}

#[test]
fn test_vendor_cannot_edit_anothers_product() {
    let ctx = TestContext::new().unwrap();
    let mut store = ctx.open().unwrap();

    AuthService::new(&mut store)
        .register_vendor(new_vendor("Bob", "bob@b.com", "secret1"))
        .unwrap();
    let bob = store.get_session().unwrap();
    let tyre = CatalogService::new(&mut store)
        .add_product(
            bob.as_ref(),
            product_draft("Tyre", Decimal::new(80, 0), 4, Category::Automotive),
        )
        .unwrap();

    AuthService::new(&mut store)
        .register_vendor(new_vendor("Ada", "a@b.com", "secret1"))
        .unwrap();
    let ada = store.get_session().unwrap();
    let mut catalog = CatalogService::new(&mut store);

    let err = catalog
        .update_product(
            ada.as_ref(),
            &tyre.id,
            product_draft("Stolen", Decimal::ONE, 1, Category::Other),
        )
        .unwrap_err();
    assert!(matches!(err, CatalogError::NotOwner(_)));

    let err = catalog.delete_product(ada.as_ref(), &tyre.id).unwrap_err();
    assert!(matches!(err, CatalogError::NotOwner(_)));

    assert_eq!(catalog.product(&tyre.id).unwrap().unwrap().name, "Tyre");
}

#[test]
fn test_logged_out_user_cannot_add_products() {
    let ctx = TestContext::new().unwrap();
    let mut store = ctx.open().unwrap();
    let session = store.get_session().unwrap();
    assert!(session.is_none());

    let err = CatalogService::new(&mut store)
        .add_product(
            session.as_ref(),
            product_draft("Tyre", Decimal::new(80, 0), 4, Category::Automotive),
        )
        .unwrap_err();
    assert!(matches!(err, CatalogError::Unauthorized));
    assert!(ctx.read_key(marketplace_store::db::keys::PRODUCTS).is_none());
}

#[test]
fn test_marketplace_search_spans_vendors() {
    let ctx = TestContext::new().unwrap();
    let mut store = ctx.open().unwrap();

    for (name, email, product, category) in [
        ("Bob", "bob@b.com", "Leather Boots", Category::ClothingFashion),
        ("Ada", "a@b.com", "Boot Polish", Category::Other),
        ("Cy", "cy@b.com", "Garden Hose", Category::HomeGarden),
    ] {
        AuthService::new(&mut store)
            .register_vendor(new_vendor(name, email, "secret1"))
            .unwrap();
        let session = store.get_session().unwrap();
        CatalogService::new(&mut store)
            .add_product(
                session.as_ref(),
                product_draft(product, Decimal::ONE, 1, category),
            )
            .unwrap();
    }

    let catalog = CatalogService::new(&mut store);
    let boots = catalog
        .search(&ProductQuery {
            term: Some("BOOT".to_owned()),
            category: None,
        })
        .unwrap();
    assert_eq!(boots.len(), 2);

    let fashion_boots = catalog
        .search(&ProductQuery {
            term: Some("boot".to_owned()),
            category: Some(Category::ClothingFashion),
        })
        .unwrap();
    assert_eq!(fashion_boots.len(), 1);
    assert_eq!(fashion_boots[0].name, "Leather Boots");

    assert_eq!(catalog.search(&ProductQuery::default()).unwrap().len(), 3);
}
