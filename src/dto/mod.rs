//! Wire representations.
//!
//! Every field is optional so the same shape serves as request body, partial
//! update and response. Constraints apply only to fields that are present;
//! `required` marks what a create (or full PUT) body must carry.
//!
//! Decimals serialize as strings to keep their exact scale. Both JSON strings
//! and numbers are accepted on input.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::model::OrderStatus;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: Option<i64>,

    #[validate(
        required(message = "Product name is required"),
        length(min = 2, max = 100, message = "Name must be between 2 and 100 characters"),
        custom(function = "crate::validation::validate_product_name")
    )]
    pub name: Option<String>,

    #[validate(length(max = 1000, message = "Description cannot exceed 1000 characters"))]
    pub description: Option<String>,

    #[validate(
        required(message = "Price is required"),
        custom(function = "crate::validation::validate_price")
    )]
    pub price: Option<Decimal>,

    #[validate(
        required(message = "Stock quantity is required"),
        range(min = 0, message = "Stock quantity must be greater than or equal to 0")
    )]
    pub stock: Option<i32>,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderDto {
    pub id: Option<i64>,

    #[validate(
        required(message = "Customer name is required"),
        length(min = 2, max = 255, message = "Customer name must be between 2 and 255 characters"),
        custom(function = "crate::validation::validate_customer_name")
    )]
    pub customer_name: Option<String>,

    #[validate(
        required(message = "Customer email is required"),
        email(message = "Email must be valid")
    )]
    pub customer_email: Option<String>,

    #[validate(
        required(message = "Shipping address is required"),
        length(min = 5, max = 500, message = "Shipping address must be between 5 and 500 characters"),
        custom(function = "crate::validation::validate_shipping_address")
    )]
    pub shipping_address: Option<String>,

    #[validate(
        required(message = "Total amount is required"),
        custom(function = "crate::validation::validate_total_amount")
    )]
    pub total_amount: Option<Decimal>,

    #[validate(required(message = "Order status is required"))]
    pub status: Option<OrderStatus>,

    /// Line items in caller order. Absent, `null` and empty are equivalent.
    #[serde(default, deserialize_with = "null_as_empty")]
    #[validate(nested)]
    pub order_items: Vec<OrderItemDto>,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemDto {
    pub id: Option<i64>,

    /// Parent order. Required for standalone creation, ignored inside an
    /// order creation request.
    pub order_id: Option<i64>,

    #[validate(required(message = "Product ID is required"))]
    pub product_id: Option<i64>,

    #[validate(
        required(message = "Quantity is required"),
        range(min = 1, message = "Quantity must be at least 1")
    )]
    pub quantity: Option<i32>,

    #[validate(
        required(message = "Unit price is required"),
        custom(function = "crate::validation::validate_unit_price")
    )]
    pub unit_price: Option<Decimal>,

    #[validate(
        required(message = "Subtotal is required"),
        custom(function = "crate::validation::validate_subtotal")
    )]
    pub subtotal: Option<Decimal>,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<T>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_order_items_read_as_empty() {
        let dto: OrderDto =
            serde_json::from_str(r#"{"customerName": "Jane", "orderItems": null}"#).unwrap();

        assert!(dto.order_items.is_empty());
        assert_eq!(dto.customer_name.as_deref(), Some("Jane"));
    }

    #[test]
    fn test_absent_order_items_read_as_empty() {
        let dto: OrderDto = serde_json::from_str(r#"{"customerName": "Jane"}"#).unwrap();

        assert!(dto.order_items.is_empty());
    }

    #[test]
    fn test_order_items_of_wrong_type_still_rejected() {
        let err = serde_json::from_str::<OrderDto>(r#"{"orderItems": 3}"#).unwrap_err();

        assert!(err.is_data());
    }
}
