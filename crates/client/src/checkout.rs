//! Checkout pipeline: cart state in, server-confirmed order out.
//!
//! Preconditions are checked before any network traffic. The atomicity
//! contract is the important part: the cart is cleared if and only if the
//! order-creation call succeeded; on any failure the cart is left
//! completely unchanged.

use std::sync::Arc;

use thiserror::Error;
use tracing::instrument;

use crate::cart::CartStore;
use crate::error::ApiError;
use crate::services::OrdersService;
use crate::session::SessionManager;
use crate::storage::StorageError;
use crate::types::{CreateOrderRequest, Order, OrderItemRequest};

/// Shipping fields collected at checkout.
///
/// The phone number is validated locally but the order request carries
/// only the address; the backend reads the phone from the profile.
#[derive(Debug, Clone)]
pub struct ShippingDetails {
    pub address: String,
    pub phone: String,
}

impl ShippingDetails {
    /// Convenience constructor.
    #[must_use]
    pub fn new(address: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            phone: phone.into(),
        }
    }
}

/// Errors from the checkout pipeline.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// No session; the caller should route to login.
    #[error("you must be logged in to check out")]
    NotAuthenticated,

    /// Nothing to order; the caller should route back to the cart view.
    #[error("the cart is empty")]
    EmptyCart,

    /// The delivery address is blank.
    #[error("a delivery address is required")]
    MissingAddress,

    /// The phone number is blank.
    #[error("a phone number is required")]
    MissingPhone,

    /// The order-creation call failed; the cart is unchanged.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The order was created but clearing the cart afterwards failed.
    #[error("order placed, but the local cart could not be cleared: {0}")]
    CartNotCleared(#[from] StorageError),
}

/// Converts cart contents into a created order.
pub struct CheckoutOrchestrator {
    session: Arc<SessionManager>,
    cart: Arc<CartStore>,
    orders: OrdersService,
}

impl CheckoutOrchestrator {
    /// Wire the orchestrator to its collaborators.
    #[must_use]
    pub fn new(session: Arc<SessionManager>, cart: Arc<CartStore>, orders: OrdersService) -> Self {
        Self {
            session,
            cart,
            orders,
        }
    }

    /// Place an order for the current cart contents.
    ///
    /// Preconditions (checked before any network call): a session must be
    /// present, the cart must be non-empty, and both shipping fields must
    /// be non-blank. On success the cart is cleared and the created order
    /// returned; on any failure the cart is untouched.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`] describing the failed precondition or
    /// the failed order-creation call.
    #[instrument(skip(self, shipping))]
    pub async fn place_order(&self, shipping: &ShippingDetails) -> Result<Order, CheckoutError> {
        if !self.session.is_authenticated() {
            return Err(CheckoutError::NotAuthenticated);
        }

        let items = self.cart.items();
        if items.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        if shipping.address.trim().is_empty() {
            return Err(CheckoutError::MissingAddress);
        }
        if shipping.phone.trim().is_empty() {
            return Err(CheckoutError::MissingPhone);
        }

        let request = CreateOrderRequest {
            items: items
                .iter()
                .map(|item| OrderItemRequest {
                    product_id: item.product.id,
                    quantity: item.quantity,
                })
                .collect(),
            shipping_address: shipping.address.clone(),
        };

        let order = self.orders.create(&request).await?;

        // Only reached when the backend confirmed the order.
        self.cart.clear()?;

        tracing::debug!(order_id = %order.id, "order placed, cart cleared");
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use rust_decimal::Decimal;
    use sunbird_core::ProductId;

    use super::*;
    use crate::config::ClientConfig;
    use crate::gateway::HttpGateway;
    use crate::storage::MemoryStorage;
    use crate::types::Product;

    fn product(id: i32) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("product-{id}"),
            image_url: None,
            price: Decimal::new(10, 0),
            discount_percentage: None,
            description: None,
            category_id: None,
            category_name: None,
            quantity_available: 10,
            low_stock_threshold: 2,
        }
    }

    /// Orchestrator over an unroutable backend: precondition failures must
    /// return before the gateway is ever exercised.
    fn orchestrator(authenticated: bool) -> (CheckoutOrchestrator, Arc<CartStore>) {
        let storage = Arc::new(MemoryStorage::new());
        let session = Arc::new(crate::session::SessionManager::load(storage.clone()).unwrap());
        if authenticated {
            session
                .set(crate::session::Session {
                    access_token: "tok".to_owned(),
                    refresh_token: "ref".to_owned(),
                    user: crate::types::UserProfile {
                        id: sunbird_core::UserId::new(1),
                        email: sunbird_core::Email::parse("a@b.c").unwrap(),
                        name: "A".to_owned(),
                        first_name: None,
                        last_name: None,
                        username: None,
                        phone: None,
                        address: None,
                        role: sunbird_core::UserRole::Customer,
                        profile_completed: None,
                    },
                })
                .unwrap();
        }

        let config = ClientConfig::new("http://127.0.0.1:9/", PathBuf::from("/tmp")).unwrap();
        let gateway = HttpGateway::new(&config, session.clone()).unwrap();
        let cart = Arc::new(CartStore::new(storage));
        let orchestrator =
            CheckoutOrchestrator::new(session, cart.clone(), OrdersService::new(gateway));
        (orchestrator, cart)
    }

    #[tokio::test]
    async fn unauthenticated_checkout_fails_locally() {
        let (orchestrator, cart) = orchestrator(false);
        cart.add(product(1)).unwrap();

        let err = orchestrator
            .place_order(&ShippingDetails::new("12 Main St", "0712345678"))
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::NotAuthenticated));
        assert_eq!(cart.len(), 1);
    }

    #[tokio::test]
    async fn empty_cart_fails_locally() {
        let (orchestrator, _cart) = orchestrator(true);

        let err = orchestrator
            .place_order(&ShippingDetails::new("12 Main St", "0712345678"))
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::EmptyCart));
    }

    #[tokio::test]
    async fn blank_shipping_fields_fail_locally() {
        let (orchestrator, cart) = orchestrator(true);
        cart.add(product(1)).unwrap();

        let err = orchestrator
            .place_order(&ShippingDetails::new("   ", "0712345678"))
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::MissingAddress));

        let err = orchestrator
            .place_order(&ShippingDetails::new("12 Main St", ""))
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::MissingPhone));

        assert_eq!(cart.len(), 1);
    }
}
