//! Wire types for the Sunbird REST backend.
//!
//! Every response arrives wrapped in [`ApiResponse`]; `data` carries the
//! payload. Field names are camelCase on the wire.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use sunbird_core::{
    CategoryId, Email, OrderId, OrderItemId, OrderStatus, ProductId, UserId, UserRole,
};

/// Standard response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the backend considers the request successful.
    pub success: bool,
    /// Human-readable message; often empty on success.
    #[serde(default)]
    pub message: String,
    /// The payload, absent for unit operations.
    ///
    /// The explicit default path keeps serde from inferring a
    /// `T: Default` bound on the derived impl.
    #[serde(default = "Option::default")]
    pub data: Option<T>,
}

/// One page of a paged listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// The entries on this page.
    pub content: Vec<T>,
    /// Total entries across all pages.
    pub total_elements: u64,
    /// Total number of pages.
    pub total_pages: u32,
    /// Requested page size.
    pub size: u32,
    /// Zero-based page index.
    pub number: u32,
}

/// A catalog product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub price: Decimal,
    #[serde(default)]
    pub discount_percentage: Option<Decimal>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub category_name: Option<String>,
    pub quantity_available: u32,
    pub low_stock_threshold: u32,
}

/// Fields for creating a product (everything but the id).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub image_url: Option<String>,
    pub price: Decimal,
    pub discount_percentage: Option<Decimal>,
    pub description: Option<String>,
    pub category_id: Option<CategoryId>,
    pub quantity_available: u32,
    pub low_stock_threshold: u32,
}

/// Partial product update; only the set fields are sent.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_percentage: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity_available: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low_stock_threshold: Option<u32>,
}

/// Query parameters for the product listing.
#[derive(Debug, Clone, Default)]
pub struct ProductQuery {
    pub category_id: Option<CategoryId>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub size: Option<u32>,
}

impl ProductQuery {
    /// Render as query-string pairs, omitting unset fields.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(category_id) = self.category_id {
            pairs.push(("categoryId", category_id.to_string()));
        }
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(size) = self.size {
            pairs.push(("size", size.to_string()));
        }
        pairs
    }
}

/// A product category.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Fields for creating a category.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
    pub name: String,
    pub description: Option<String>,
}

/// Partial category update.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The signed-in user's profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    pub email: Email,
    pub name: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    pub role: UserRole,
    #[serde(default)]
    pub profile_completed: Option<bool>,
}

/// Partial profile update; only the set fields are sent.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// A server-confirmed order. Immutable on the client once created; the
/// status only changes by re-fetching after a backend-side update.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub status: OrderStatus,
    #[serde(default)]
    pub total_amount: Option<Decimal>,
    #[serde(default)]
    pub total: Option<Decimal>,
    pub shipping_address: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

impl Order {
    /// The order total. Older backend versions report it as `total`,
    /// newer ones as `totalAmount`.
    #[must_use]
    pub fn amount(&self) -> Decimal {
        self.total_amount.or(self.total).unwrap_or_default()
    }
}

/// One line of an order, with the unit price frozen at purchase time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    #[serde(default)]
    pub id: Option<OrderItemId>,
    /// Absent if the product was deleted after the purchase.
    #[serde(default)]
    pub product_id: Option<ProductId>,
    pub product_name: String,
    pub quantity: u32,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub price_at_purchase: Option<Decimal>,
    #[serde(default)]
    pub line_total: Option<Decimal>,
}

impl OrderItem {
    /// The unit price at time of purchase, whichever field the backend
    /// populated.
    #[must_use]
    pub fn unit_price(&self) -> Decimal {
        self.price_at_purchase.or(self.price).unwrap_or_default()
    }
}

/// Request body for `POST /orders`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub items: Vec<OrderItemRequest>,
    pub shipping_address: String,
}

/// One requested order line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Request body for `POST /admin/users/create-admin`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAdminRequest {
    pub email: Email,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
}

/// Response payload of `POST /files/upload`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub filename: String,
    pub url: String,
}

/// Aggregated dashboard figures from `GET /admin/reports/dashboard`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardReport {
    pub total_orders: u64,
    pub completed_orders: u64,
    pub total_revenue: Decimal,
    pub active_customers: u64,
    #[serde(default)]
    pub low_stock_products: Vec<Product>,
    #[serde(default)]
    pub top_customers: Vec<TopCustomer>,
    #[serde(default)]
    pub orders_per_month: Vec<MonthlyOrderCount>,
    #[serde(default)]
    pub top_products: Vec<TopProductSales>,
}

impl DashboardReport {
    /// Revenue divided by completed orders; zero when nothing completed.
    #[must_use]
    pub fn average_order_value(&self) -> Decimal {
        if self.completed_orders == 0 {
            return Decimal::ZERO;
        }
        self.total_revenue / Decimal::from(self.completed_orders)
    }
}

/// Orders placed in one calendar month.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyOrderCount {
    pub month: String,
    pub count: u64,
}

/// Sales volume for one product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopProductSales {
    pub name: String,
    pub quantity_sold: u64,
}

/// A high-spend customer on the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopCustomer {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub order_count: u64,
    #[serde(default)]
    pub total_spent: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_tolerates_missing_message_and_data() {
        let envelope: ApiResponse<Product> =
            serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert!(envelope.success);
        assert!(envelope.message.is_empty());
        assert!(envelope.data.is_none());
    }

    #[test]
    fn product_parses_wire_shape() {
        let json = r#"{
            "id": 3,
            "name": "Teapot",
            "imageUrl": null,
            "price": 19.5,
            "discountPercentage": null,
            "description": "Ceramic",
            "categoryId": 1,
            "categoryName": "Kitchen",
            "quantityAvailable": 12,
            "lowStockThreshold": 3
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, ProductId::new(3));
        assert_eq!(product.price, Decimal::new(195, 1));
        assert_eq!(product.category_name.as_deref(), Some("Kitchen"));
    }

    #[test]
    fn patch_skips_unset_fields() {
        let patch = ProductPatch {
            price: Some(Decimal::new(100, 0)),
            ..Default::default()
        };
        assert_eq!(serde_json::to_string(&patch).unwrap(), r#"{"price":100.0}"#);
    }

    #[test]
    fn order_amount_prefers_total_amount() {
        let json = r#"{
            "id": 1,
            "status": "PENDING",
            "totalAmount": 250.0,
            "total": 9.0,
            "shippingAddress": "12 Main St",
            "createdAt": "2026-01-05T09:30:00Z",
            "items": []
        }"#;

        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.amount(), Decimal::new(250, 0));
    }

    #[test]
    fn create_order_request_serializes_camel_case() {
        let request = CreateOrderRequest {
            items: vec![OrderItemRequest {
                product_id: ProductId::new(4),
                quantity: 2,
            }],
            shipping_address: "12 Main St".to_owned(),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["items"][0]["productId"], 4);
        assert_eq!(json["shippingAddress"], "12 Main St");
    }

    #[test]
    fn dashboard_average_handles_zero_completed() {
        let report = DashboardReport {
            total_orders: 0,
            completed_orders: 0,
            total_revenue: Decimal::ZERO,
            active_customers: 0,
            low_stock_products: vec![],
            top_customers: vec![],
            orders_per_month: vec![],
            top_products: vec![],
        };
        assert_eq!(report.average_order_value(), Decimal::ZERO);
    }
}
