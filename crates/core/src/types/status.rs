//! Status and category enums for catalog and order entities.
//!
//! All of these are stored as text columns and round-tripped through
//! `Display`/`FromStr`; the wire format matches the stored form.

use serde::{Deserialize, Serialize};

/// Order fulfillment status.
///
/// Transitions are unconstrained: an admin may set any value after any
/// other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    Shipped,
    Completed,
    Cancelled,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Shipped => write!(f, "SHIPPED"),
            Self::Completed => write!(f, "COMPLETED"),
            Self::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "SHIPPED" => Ok(Self::Shipped),
            "COMPLETED" => Ok(Self::Completed),
            "CANCELLED" => Ok(Self::Cancelled),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

/// Payment status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Failed,
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Paid => write!(f, "PAID"),
            Self::Failed => write!(f, "FAILED"),
        }
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "PAID" => Ok(Self::Paid),
            "FAILED" => Ok(Self::Failed),
            _ => Err(format!("invalid payment status: {s}")),
        }
    }
}

/// How an order is paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Card,
    Paypal,
    Stripe,
    Binance,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cash => write!(f, "CASH"),
            Self::Card => write!(f, "CARD"),
            Self::Paypal => write!(f, "PAYPAL"),
            Self::Stripe => write!(f, "STRIPE"),
            Self::Binance => write!(f, "BINANCE"),
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CASH" => Ok(Self::Cash),
            "CARD" => Ok(Self::Card),
            "PAYPAL" => Ok(Self::Paypal),
            "STRIPE" => Ok(Self::Stripe),
            "BINANCE" => Ok(Self::Binance),
            _ => Err(format!("invalid payment method: {s}")),
        }
    }
}

/// Product category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProductCategory {
    Electronics,
    Clothing,
    Food,
    Books,
    Home,
    Sports,
    #[default]
    Other,
}

impl std::fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Electronics => write!(f, "electronics"),
            Self::Clothing => write!(f, "clothing"),
            Self::Food => write!(f, "food"),
            Self::Books => write!(f, "books"),
            Self::Home => write!(f, "home"),
            Self::Sports => write!(f, "sports"),
            Self::Other => write!(f, "other"),
        }
    }
}

impl std::str::FromStr for ProductCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "electronics" => Ok(Self::Electronics),
            "clothing" => Ok(Self::Clothing),
            "food" => Ok(Self::Food),
            "books" => Ok(Self::Books),
            "home" => Ok(Self::Home),
            "sports" => Ok(Self::Sports),
            "other" => Ok(Self::Other),
            _ => Err(format!("invalid product category: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_roundtrip() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Shipped,
            OrderStatus::Completed,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(status.to_string().parse::<OrderStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_payment_status_roundtrip() {
        for status in [
            PaymentStatus::Pending,
            PaymentStatus::Paid,
            PaymentStatus::Failed,
        ] {
            assert_eq!(
                status.to_string().parse::<PaymentStatus>().unwrap(),
                status
            );
        }
    }

    #[test]
    fn test_payment_method_roundtrip() {
        for method in [
            PaymentMethod::Cash,
            PaymentMethod::Card,
            PaymentMethod::Paypal,
            PaymentMethod::Stripe,
            PaymentMethod::Binance,
        ] {
            assert_eq!(
                method.to_string().parse::<PaymentMethod>().unwrap(),
                method
            );
        }
    }

    #[test]
    fn test_category_roundtrip() {
        for category in [
            ProductCategory::Electronics,
            ProductCategory::Clothing,
            ProductCategory::Food,
            ProductCategory::Books,
            ProductCategory::Home,
            ProductCategory::Sports,
            ProductCategory::Other,
        ] {
            assert_eq!(
                category.to_string().parse::<ProductCategory>().unwrap(),
                category
            );
        }
    }

    #[test]
    fn test_defaults() {
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
        assert_eq!(PaymentStatus::default(), PaymentStatus::Pending);
        assert_eq!(PaymentMethod::default(), PaymentMethod::Cash);
        assert_eq!(ProductCategory::default(), ProductCategory::Other);
    }

    #[test]
    fn test_serde_wire_format() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Shipped).unwrap(),
            "\"SHIPPED\""
        );
        assert_eq!(
            serde_json::to_string(&ProductCategory::Books).unwrap(),
            "\"books\""
        );
        let parsed: PaymentMethod = serde_json::from_str("\"PAYPAL\"").unwrap();
        assert_eq!(parsed, PaymentMethod::Paypal);
    }
}
