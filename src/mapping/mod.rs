//! Conversions between entities and wire representations.
//!
//! All transforms are pure. A missing entity maps to a missing DTO through
//! `Option::map`. `merge_*` functions implement partial updates: only fields
//! present in the DTO overwrite the entity.

use crate::dto::{OrderDto, OrderItemDto, ProductDto};
use crate::model::{NewOrder, NewOrderItem, NewProduct, Order, OrderItem, OrderStatus, Product};

impl From<&Product> for ProductDto {
    fn from(product: &Product) -> Self {
        Self {
            id: Some(product.id),
            name: Some(product.name.clone()),
            description: product.description.clone(),
            price: Some(product.price),
            stock: Some(product.stock),
            created_at: Some(product.created_at),
            updated_at: Some(product.updated_at),
        }
    }
}

/// Any client-supplied id or timestamp is dropped. Required fields are
/// expected to have passed validation; absent ones fall back to defaults.
impl From<ProductDto> for NewProduct {
    fn from(dto: ProductDto) -> Self {
        Self {
            name: dto.name.unwrap_or_default(),
            description: dto.description,
            price: dto.price.unwrap_or_default(),
            stock: dto.stock.unwrap_or_default(),
        }
    }
}

pub fn merge_product(dto: &ProductDto, product: &mut Product) {
    if let Some(name) = &dto.name {
        product.name = name.clone();
    }
    if let Some(description) = &dto.description {
        product.description = Some(description.clone());
    }
    if let Some(price) = dto.price {
        product.price = price;
    }
    if let Some(stock) = dto.stock {
        product.stock = stock;
    }
}

impl From<&OrderItem> for OrderItemDto {
    fn from(item: &OrderItem) -> Self {
        Self {
            id: Some(item.id),
            order_id: Some(item.order_id),
            product_id: Some(item.product_id),
            quantity: Some(item.quantity),
            unit_price: Some(item.unit_price),
            subtotal: Some(item.subtotal),
            created_at: Some(item.created_at),
            updated_at: Some(item.updated_at),
        }
    }
}

impl From<OrderItemDto> for NewOrderItem {
    fn from(dto: OrderItemDto) -> Self {
        Self {
            product_id: dto.product_id.unwrap_or_default(),
            quantity: dto.quantity.unwrap_or_default(),
            unit_price: dto.unit_price.unwrap_or_default(),
            subtotal: dto.subtotal.unwrap_or_default(),
        }
    }
}

/// Overwrites the scalar fields of an item. Re-binding the order or product
/// is done by the caller after resolving the referenced rows.
pub fn merge_order_item(dto: &OrderItemDto, item: &mut OrderItem) {
    if let Some(quantity) = dto.quantity {
        item.quantity = quantity;
    }
    if let Some(unit_price) = dto.unit_price {
        item.unit_price = unit_price;
    }
    if let Some(subtotal) = dto.subtotal {
        item.subtotal = subtotal;
    }
}

impl From<&Order> for OrderDto {
    fn from(order: &Order) -> Self {
        Self {
            id: Some(order.id),
            customer_name: Some(order.customer_name.clone()),
            customer_email: Some(order.customer_email.clone()),
            shipping_address: Some(order.shipping_address.clone()),
            total_amount: Some(order.total_amount),
            status: Some(order.status),
            order_items: order.order_items.iter().map(OrderItemDto::from).collect(),
            created_at: Some(order.created_at),
            updated_at: Some(order.updated_at),
        }
    }
}

impl From<OrderDto> for NewOrder {
    fn from(dto: OrderDto) -> Self {
        Self {
            customer_name: dto.customer_name.unwrap_or_default(),
            customer_email: dto.customer_email.unwrap_or_default(),
            shipping_address: dto.shipping_address.unwrap_or_default(),
            total_amount: dto.total_amount.unwrap_or_default(),
            status: dto.status.unwrap_or(OrderStatus::Pending),
            order_items: dto.order_items.into_iter().map(NewOrderItem::from).collect(),
        }
    }
}

/// Header fields only; the item collection is never touched here.
pub fn merge_order(dto: &OrderDto, order: &mut Order) {
    if let Some(customer_name) = &dto.customer_name {
        order.customer_name = customer_name.clone();
    }
    if let Some(customer_email) = &dto.customer_email {
        order.customer_email = customer_email.clone();
    }
    if let Some(shipping_address) = &dto.shipping_address {
        order.shipping_address = shipping_address.clone();
    }
    if let Some(total_amount) = dto.total_amount {
        order.total_amount = total_amount;
    }
    if let Some(status) = dto.status {
        order.status = status;
    }
}
