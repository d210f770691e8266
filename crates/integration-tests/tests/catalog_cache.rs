//! Catalog listing cache: repeated reads stay local, writes invalidate.

use rust_decimal::Decimal;
use sunbird_client::services::ProductsService;
use sunbird_client::types::{NewProduct, ProductQuery};
use sunbird_integration_tests::{StubBackend, client_stack};

#[tokio::test]
async fn repeated_listing_is_served_from_the_cache() {
    let backend = StubBackend::spawn().await;
    let (_storage, _session, gateway) = client_stack(
        &backend.url(),
        &backend.current_access_token(),
        &backend.current_refresh_token(),
    );

    let products = ProductsService::new(gateway);

    let first = products.list(&ProductQuery::default()).await.unwrap();
    let second = products.list(&ProductQuery::default()).await.unwrap();
    assert_eq!(first.total_elements, second.total_elements);
    assert_eq!(backend.product_list_calls(), 1);

    // A different query is a different cache entry.
    let query = ProductQuery {
        search: Some("tea".to_owned()),
        ..Default::default()
    };
    let filtered = products.list(&query).await.unwrap();
    assert_eq!(filtered.content.len(), 1);
    assert_eq!(filtered.content[0].name, "Teapot");
    assert_eq!(backend.product_list_calls(), 2);
}

#[tokio::test]
async fn search_text_with_separators_is_not_a_cache_collision() {
    let backend = StubBackend::spawn().await;
    let (_storage, _session, gateway) = client_stack(
        &backend.url(),
        &backend.current_access_token(),
        &backend.current_refresh_token(),
    );

    let products = ProductsService::new(gateway);

    // A search term that happens to contain query separators must not
    // share a cache entry with the structurally different query below.
    let smuggled = ProductQuery {
        search: Some("tea&page=0&size=50".to_owned()),
        ..Default::default()
    };
    products.list(&smuggled).await.unwrap();
    assert_eq!(backend.product_list_calls(), 1);

    let structured = ProductQuery {
        search: Some("tea".to_owned()),
        page: Some(0),
        size: Some(50),
        ..Default::default()
    };
    let page = products.list(&structured).await.unwrap();
    assert_eq!(backend.product_list_calls(), 2);
    assert_eq!(page.content.len(), 1);
    assert_eq!(page.content[0].name, "Teapot");
}

#[tokio::test]
async fn catalog_write_invalidates_the_cache() {
    let backend = StubBackend::spawn().await;
    let (_storage, _session, gateway) = client_stack(
        &backend.url(),
        &backend.current_access_token(),
        &backend.current_refresh_token(),
    );

    let products = ProductsService::new(gateway);

    let before = products.list(&ProductQuery::default()).await.unwrap();
    assert_eq!(backend.product_list_calls(), 1);

    products
        .create(&NewProduct {
            name: "Kettle".to_owned(),
            image_url: None,
            price: Decimal::new(75, 0),
            discount_percentage: None,
            description: None,
            category_id: None,
            quantity_available: 20,
            low_stock_threshold: 2,
        })
        .await
        .unwrap();

    // The next listing goes back to the backend and sees the new product.
    let after = products.list(&ProductQuery::default()).await.unwrap();
    assert_eq!(backend.product_list_calls(), 2);
    assert_eq!(after.content.len(), before.content.len() + 1);
    assert!(after.content.iter().any(|p| p.name == "Kettle"));
}
