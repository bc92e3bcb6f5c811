//! Application services.
//!
//! Services speak in DTOs on both sides and own the units of work. Field
//! constraints are checked before a service is called; services enforce
//! referential and business rules.

use std::future::Future;

use crate::storage::StorageError;
use crate::validation::FieldViolation;

pub mod order;
pub mod order_item;
pub mod product;

pub use order::OrderService;
pub use order_item::OrderItemService;
pub use product::ProductService;

/// Result type for service operations.
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Errors surfaced by the services.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{resource} not found with id: '{id}'")]
    NotFound { resource: &'static str, id: i64 },

    #[error("{0}")]
    BusinessRule(String),

    #[error("Validation failed")]
    Validation(Vec<FieldViolation>),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl ServiceError {
    pub fn not_found(resource: &'static str, id: i64) -> Self {
        ServiceError::NotFound { resource, id }
    }
}

/// Run a unit of work on its own task.
///
/// A transaction must reach COMMIT or ROLLBACK before its connection goes
/// back to the pool, even if the request that started it is dropped.
pub(crate) async fn detached<T, F>(work: F) -> Result<T>
where
    F: Future<Output = Result<T>> + Send + 'static,
    T: Send + 'static,
{
    tokio::spawn(work)
        .await
        .map_err(|e| ServiceError::Unexpected(e.to_string()))?
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = ServiceError::not_found("Product", 42);
        assert_eq!(err.to_string(), "Product not found with id: '42'");
    }

    #[test]
    fn test_business_rule_message_is_verbatim() {
        let err = ServiceError::BusinessRule("Order must contain at least one item".to_string());
        assert_eq!(err.to_string(), "Order must contain at least one item");
    }
}
