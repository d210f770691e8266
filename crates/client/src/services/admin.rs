//! Administrative operations.
//!
//! The client performs no legality checks on status transitions: any of
//! the eight status values may be requested, and an illegal transition
//! comes back as a server error for the admin to read.

use tracing::instrument;

use sunbird_core::{OrderId, OrderStatus, UserId};

use crate::error::ApiError;
use crate::gateway::HttpGateway;
use crate::types::{CreateAdminRequest, DashboardReport, Order, Page, UserProfile};

/// Admin-only order, user, and reporting operations.
#[derive(Clone)]
pub struct AdminService {
    gateway: HttpGateway,
}

impl AdminService {
    /// Wire the service to the gateway.
    #[must_use]
    pub fn new(gateway: HttpGateway) -> Self {
        Self { gateway }
    }

    /// List all orders, paged, optionally filtered by status.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list_orders(
        &self,
        page: u32,
        size: u32,
        status: Option<OrderStatus>,
    ) -> Result<Page<Order>, ApiError> {
        let mut query = vec![("page", page.to_string()), ("size", size.to_string())];
        if let Some(status) = status {
            query.push(("status", status.to_string()));
        }
        self.gateway.get_with_query("/admin/orders", &query).await
    }

    /// Request a status change for an order.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the transition or the
    /// request fails.
    #[instrument(skip(self))]
    pub async fn update_order_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<(), ApiError> {
        let body = serde_json::json!({ "status": status });
        self.gateway
            .put_unit_with(&format!("/admin/orders/{id}/status"), &body)
            .await
    }

    /// List all user profiles.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list_users(&self) -> Result<Vec<UserProfile>, ApiError> {
        self.gateway.get("/admin/users").await
    }

    /// Grant admin rights to a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn make_admin(&self, id: UserId) -> Result<(), ApiError> {
        self.gateway
            .post_unit(&format!("/admin/users/{id}/make-admin"))
            .await
    }

    /// Revoke admin rights from a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn remove_admin(&self, id: UserId) -> Result<(), ApiError> {
        self.gateway
            .post_unit(&format!("/admin/users/{id}/remove-admin"))
            .await
    }

    /// Create a new admin account.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn create_admin(&self, request: &CreateAdminRequest) -> Result<(), ApiError> {
        self.gateway
            .post_unit_with("/admin/users/create-admin", request)
            .await
    }

    /// Fetch the aggregated dashboard report.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn dashboard(&self) -> Result<DashboardReport, ApiError> {
        self.gateway.get("/admin/reports/dashboard").await
    }
}
