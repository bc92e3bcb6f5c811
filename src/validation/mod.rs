//! Input validation for inbound representations.
//!
//! Field constraints are declared on the DTOs with `validator` attributes.
//! This module holds the messages, the decimal and blank-string checks the
//! derive cannot express, and the flattening of `ValidationErrors` into the
//! per-field list returned to clients.

use std::borrow::Cow;

use heck::ToLowerCamelCase;
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

/// Error constants for validation failures.
pub mod errmsg {
    pub const PRODUCT_NAME_REQUIRED: &str = "Product name is required";
    pub const PRODUCT_NAME_LENGTH: &str = "Name must be between 2 and 100 characters";
    pub const PRODUCT_DESCRIPTION_LENGTH: &str = "Description cannot exceed 1000 characters";
    pub const PRICE_REQUIRED: &str = "Price is required";
    pub const PRICE_NEGATIVE: &str = "Price must be greater than or equal to 0";
    pub const STOCK_REQUIRED: &str = "Stock quantity is required";
    pub const STOCK_NEGATIVE: &str = "Stock quantity must be greater than or equal to 0";

    pub const CUSTOMER_NAME_REQUIRED: &str = "Customer name is required";
    pub const CUSTOMER_NAME_LENGTH: &str = "Customer name must be between 2 and 255 characters";
    pub const CUSTOMER_EMAIL_REQUIRED: &str = "Customer email is required";
    pub const CUSTOMER_EMAIL_INVALID: &str = "Email must be valid";
    pub const SHIPPING_ADDRESS_REQUIRED: &str = "Shipping address is required";
    pub const SHIPPING_ADDRESS_LENGTH: &str =
        "Shipping address must be between 5 and 500 characters";
    pub const TOTAL_AMOUNT_REQUIRED: &str = "Total amount is required";
    pub const TOTAL_AMOUNT_NEGATIVE: &str = "Total amount must be greater than or equal to 0.00";
    pub const STATUS_REQUIRED: &str = "Order status is required";

    pub const ORDER_ID_REQUIRED: &str = "Order ID is required";
    pub const PRODUCT_ID_REQUIRED: &str = "Product ID is required";
    pub const QUANTITY_REQUIRED: &str = "Quantity is required";
    pub const QUANTITY_MIN: &str = "Quantity must be at least 1";
    pub const UNIT_PRICE_REQUIRED: &str = "Unit price is required";
    pub const UNIT_PRICE_NOT_POSITIVE: &str = "Unit price must be greater than 0.00";
    pub const SUBTOTAL_REQUIRED: &str = "Subtotal is required";
    pub const SUBTOTAL_NEGATIVE: &str = "Subtotal must be greater than or equal to 0.00";
}

/// One rejected field, as reported to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

fn violation(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

fn not_blank(value: &str, message: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(violation("blank", message));
    }
    Ok(())
}

pub fn validate_product_name(value: &str) -> Result<(), ValidationError> {
    not_blank(value, errmsg::PRODUCT_NAME_REQUIRED)
}

pub fn validate_customer_name(value: &str) -> Result<(), ValidationError> {
    not_blank(value, errmsg::CUSTOMER_NAME_REQUIRED)
}

pub fn validate_shipping_address(value: &str) -> Result<(), ValidationError> {
    not_blank(value, errmsg::SHIPPING_ADDRESS_REQUIRED)
}

pub fn validate_price(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO {
        return Err(violation("range", errmsg::PRICE_NEGATIVE));
    }
    Ok(())
}

pub fn validate_total_amount(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO {
        return Err(violation("range", errmsg::TOTAL_AMOUNT_NEGATIVE));
    }
    Ok(())
}

pub fn validate_unit_price(value: &Decimal) -> Result<(), ValidationError> {
    if *value <= Decimal::ZERO {
        return Err(violation("range", errmsg::UNIT_PRICE_NOT_POSITIVE));
    }
    Ok(())
}

pub fn validate_subtotal(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO {
        return Err(violation("range", errmsg::SUBTOTAL_NEGATIVE));
    }
    Ok(())
}

/// Run the declared constraints, returning every violation on failure.
pub fn check<T: Validate>(value: &T) -> Result<(), Vec<FieldViolation>> {
    value.validate().map_err(|errors| flatten(&errors))
}

/// Flatten nested `ValidationErrors` into `field -> message` pairs.
///
/// Field names use the wire (camelCase) spelling; list elements are
/// addressed as `orderItems[0].quantity`. Output is sorted by field so the
/// response is stable.
pub fn flatten(errors: &ValidationErrors) -> Vec<FieldViolation> {
    let mut out = Vec::new();
    collect(errors, "", &mut out);
    out.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.message.cmp(&b.message)));
    out
}

fn collect(errors: &ValidationErrors, prefix: &str, out: &mut Vec<FieldViolation>) {
    for (field, kind) in errors.errors() {
        let name = join(prefix, &field.to_lower_camel_case());
        match kind {
            ValidationErrorsKind::Field(list) => {
                for error in list {
                    let message = error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("invalid value ({})", error.code));
                    out.push(FieldViolation::new(name.clone(), message));
                }
            }
            ValidationErrorsKind::Struct(nested) => collect(nested, &name, out),
            ValidationErrorsKind::List(entries) => {
                for (index, nested) in entries {
                    collect(nested, &format!("{}[{}]", name, index), out);
                }
            }
        }
    }
}

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}
