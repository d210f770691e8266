//! The checkout contract against a live (stub) backend: the cart is
//! cleared exactly when the order-creation call succeeded.

use std::sync::Arc;

use rust_decimal::Decimal;
use sunbird_client::services::{OrdersService, ProductsService};
use sunbird_client::storage::{Storage, keys};
use sunbird_client::types::ProductQuery;
use sunbird_client::{ApiError, CartStore, CheckoutError, CheckoutOrchestrator, ShippingDetails};
use sunbird_core::OrderStatus;
use sunbird_integration_tests::{StubBackend, client_stack};

#[tokio::test]
async fn empty_cart_never_reaches_the_backend() {
    let backend = StubBackend::spawn().await;
    let (storage, session, gateway) = client_stack(
        &backend.url(),
        &backend.current_access_token(),
        &backend.current_refresh_token(),
    );

    let cart = Arc::new(CartStore::new(storage));
    let checkout = CheckoutOrchestrator::new(session, cart, OrdersService::new(gateway));

    let err = checkout
        .place_order(&ShippingDetails::new("12 Main St", "0712345678"))
        .await
        .unwrap_err();

    assert!(matches!(err, CheckoutError::EmptyCart));
    assert_eq!(backend.order_creates(), 0);
}

#[tokio::test]
async fn rejected_order_leaves_the_cart_unchanged() {
    let backend = StubBackend::spawn().await;
    let (storage, session, gateway) = client_stack(
        &backend.url(),
        &backend.current_access_token(),
        &backend.current_refresh_token(),
    );

    let products = ProductsService::new(gateway.clone());
    let page = products.list(&ProductQuery::default()).await.unwrap();

    let cart = Arc::new(CartStore::new(storage));
    cart.add_item(page.content[0].clone(), 2).unwrap();
    cart.add(page.content[1].clone()).unwrap();

    backend.fail_order_create(true);

    let checkout =
        CheckoutOrchestrator::new(session, cart.clone(), OrdersService::new(gateway));
    let err = checkout
        .place_order(&ShippingDetails::new("12 Main St", "0712345678"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CheckoutError::Api(ApiError::Server { status: 500, .. })
    ));
    assert_eq!(cart.len(), 2);
    assert_eq!(cart.item_count(), 3);
    assert_eq!(backend.order_creates(), 0);
}

#[tokio::test]
async fn successful_order_clears_the_cart() {
    let backend = StubBackend::spawn().await;
    let (storage, session, gateway) = client_stack(
        &backend.url(),
        &backend.current_access_token(),
        &backend.current_refresh_token(),
    );

    let products = ProductsService::new(gateway.clone());
    let page = products.list(&ProductQuery::default()).await.unwrap();

    // Teapot at 100 and Mug at 50, per the seeded catalog.
    let cart = Arc::new(CartStore::new(storage.clone()));
    cart.add_item(page.content[0].clone(), 2).unwrap();
    cart.add(page.content[1].clone()).unwrap();

    let checkout =
        CheckoutOrchestrator::new(session, cart.clone(), OrdersService::new(gateway));
    let order = checkout
        .place_order(&ShippingDetails::new("12 Main St", "0712345678"))
        .await
        .unwrap();

    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.amount(), Decimal::new(250, 0));
    assert_eq!(order.shipping_address, "12 Main St");
    assert_eq!(order.items.len(), 2);
    assert_eq!(backend.order_creates(), 1);

    // The cart was cleared, in memory and in storage.
    assert!(cart.is_empty());
    assert_eq!(storage.get(keys::CART).unwrap().as_deref(), Some("[]"));
}
