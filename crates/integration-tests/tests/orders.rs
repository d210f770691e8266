//! Order lifecycle as the client observes it: create, list, re-fetch
//! after a backend-side status change.

use std::sync::Arc;

use sunbird_client::services::{AdminService, OrdersService, ProductsService};
use sunbird_client::types::ProductQuery;
use sunbird_client::{ApiError, CartStore, CheckoutOrchestrator, ShippingDetails};
use sunbird_core::{OrderId, OrderStatus, StatusCategory};
use sunbird_integration_tests::{StubBackend, client_stack};

#[tokio::test]
async fn status_changes_surface_only_through_refetch() {
    let backend = StubBackend::spawn().await;
    let (storage, session, gateway) = client_stack(
        &backend.url(),
        &backend.current_access_token(),
        &backend.current_refresh_token(),
    );

    let products = ProductsService::new(gateway.clone());
    let page = products.list(&ProductQuery::default()).await.unwrap();

    let cart = Arc::new(CartStore::new(storage));
    cart.add_item(page.content[0].clone(), 1).unwrap();

    let orders = OrdersService::new(gateway.clone());
    let checkout = CheckoutOrchestrator::new(session, cart, orders.clone());
    let created = checkout
        .place_order(&ShippingDetails::new("12 Main St", "0712345678"))
        .await
        .unwrap();
    assert_eq!(created.status, OrderStatus::Pending);
    assert_eq!(created.status.category(), StatusCategory::Pending);

    let mine = orders.my_orders(0, 10).await.unwrap();
    assert_eq!(mine.total_elements, 1);
    assert_eq!(mine.content[0].id, created.id);

    // An admin moves the order along; the created value is a snapshot
    // and only a re-fetch sees the change.
    let admin = AdminService::new(gateway);
    admin
        .update_order_status(created.id, OrderStatus::Shipped)
        .await
        .unwrap();

    let refetched = orders.get(created.id).await.unwrap();
    assert_eq!(refetched.status, OrderStatus::Shipped);
    assert_eq!(refetched.status.category(), StatusCategory::InProgress);
    assert_eq!(refetched.amount(), created.amount());
}

#[tokio::test]
async fn unknown_order_is_not_found() {
    let backend = StubBackend::spawn().await;
    let (_storage, _session, gateway) = client_stack(
        &backend.url(),
        &backend.current_access_token(),
        &backend.current_refresh_token(),
    );

    let orders = OrdersService::new(gateway);
    let err = orders.get(OrderId::new(404)).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}
