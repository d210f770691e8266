//! Order operations for the signed-in customer.

use tracing::instrument;

use sunbird_core::OrderId;

use crate::error::ApiError;
use crate::gateway::HttpGateway;
use crate::types::{CreateOrderRequest, Order, Page};

/// Order creation and queries.
#[derive(Clone)]
pub struct OrdersService {
    gateway: HttpGateway,
}

impl OrdersService {
    /// Wire the service to the gateway.
    #[must_use]
    pub fn new(gateway: HttpGateway) -> Self {
        Self { gateway }
    }

    /// Submit an order-creation request.
    ///
    /// Callers normally go through the checkout orchestrator, which owns
    /// the cart-clearing contract around this call.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip_all)]
    pub async fn create(&self, request: &CreateOrderRequest) -> Result<Order, ApiError> {
        self.gateway.post("/orders", request).await
    }

    /// List the signed-in user's own orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn my_orders(&self, page: u32, size: u32) -> Result<Page<Order>, ApiError> {
        self.gateway
            .get_with_query(
                "/orders/my",
                &[("page", page.to_string()), ("size", size.to_string())],
            )
            .await
    }

    /// Fetch one order by id.
    ///
    /// The returned status is whatever the backend currently reports;
    /// re-fetching is the only way the client observes status changes.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the order does not exist.
    pub async fn get(&self, id: OrderId) -> Result<Order, ApiError> {
        self.gateway.get(&format!("/orders/{id}")).await
    }
}
