//! Order status values and their display categories.
//!
//! The backend owns the order state machine; the client never validates
//! transitions. It only needs to parse the status values the backend
//! reports and group them into a small set of display categories.

use serde::{Deserialize, Serialize};

/// Order status as reported by the backend.
///
/// This is a closed set: the backend never reports anything outside these
/// eight values. An administrator may request a change to any of them; the
/// backend rejects illegal transitions and the client surfaces that as an
/// error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
    Completed,
    Cancelled,
    Confirmed,
    Shipped,
    Delivered,
}

impl OrderStatus {
    /// All status values, in wire order.
    pub const ALL: [Self; 8] = [
        Self::Pending,
        Self::Accepted,
        Self::Rejected,
        Self::Completed,
        Self::Cancelled,
        Self::Confirmed,
        Self::Shipped,
        Self::Delivered,
    ];

    /// The display category this status belongs to.
    #[must_use]
    pub const fn category(self) -> StatusCategory {
        match self {
            Self::Pending => StatusCategory::Pending,
            Self::Accepted | Self::Confirmed | Self::Shipped => StatusCategory::InProgress,
            Self::Completed | Self::Delivered => StatusCategory::Fulfilled,
            Self::Rejected | Self::Cancelled => StatusCategory::Failed,
        }
    }

    /// The wire name of this status (e.g., `"PENDING"`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Accepted => "ACCEPTED",
            Self::Rejected => "REJECTED",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
            Self::Confirmed => "CONFIRMED",
            Self::Shipped => "SHIPPED",
            Self::Delivered => "DELIVERED",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "ACCEPTED" => Ok(Self::Accepted),
            "REJECTED" => Ok(Self::Rejected),
            "COMPLETED" => Ok(Self::Completed),
            "CANCELLED" => Ok(Self::Cancelled),
            "CONFIRMED" => Ok(Self::Confirmed),
            "SHIPPED" => Ok(Self::Shipped),
            "DELIVERED" => Ok(Self::Delivered),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

/// Presentation grouping for order statuses.
///
/// Pure display concern: the client renders orders in one of these four
/// buckets and never uses the category for decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusCategory {
    /// Awaiting review.
    Pending,
    /// Accepted, confirmed, or shipped.
    InProgress,
    /// Completed or delivered.
    Fulfilled,
    /// Rejected or cancelled.
    Failed,
}

/// Role attached to a user profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    #[default]
    Customer,
    Admin,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Customer => write!(f, "CUSTOMER"),
            Self::Admin => write!(f, "ADMIN"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn every_status_maps_to_a_category() {
        assert_eq!(OrderStatus::Pending.category(), StatusCategory::Pending);
        assert_eq!(OrderStatus::Accepted.category(), StatusCategory::InProgress);
        assert_eq!(
            OrderStatus::Confirmed.category(),
            StatusCategory::InProgress
        );
        assert_eq!(OrderStatus::Shipped.category(), StatusCategory::InProgress);
        assert_eq!(OrderStatus::Completed.category(), StatusCategory::Fulfilled);
        assert_eq!(OrderStatus::Delivered.category(), StatusCategory::Fulfilled);
        assert_eq!(OrderStatus::Rejected.category(), StatusCategory::Failed);
        assert_eq!(OrderStatus::Cancelled.category(), StatusCategory::Failed);
    }

    #[test]
    fn wire_names_round_trip() {
        for status in OrderStatus::ALL {
            assert_eq!(OrderStatus::from_str(status.as_str()), Ok(status));

            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{status}\""));
            let back: OrderStatus = serde_json::from_str(&json).unwrap();
            assert_eq!(back, status);
        }
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!(OrderStatus::from_str("IN_TRANSIT").is_err());
        assert!(serde_json::from_str::<OrderStatus>("\"pending\"").is_err());
    }

    #[test]
    fn role_serializes_screaming() {
        assert_eq!(serde_json::to_string(&UserRole::Admin).unwrap(), "\"ADMIN\"");
        let role: UserRole = serde_json::from_str("\"CUSTOMER\"").unwrap();
        assert_eq!(role, UserRole::Customer);
    }
}
