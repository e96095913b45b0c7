use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use super::order::OrderStatus;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: Uuid },
    #[error("Product {product_id} is unavailable")]
    ProductUnavailable { product_id: Uuid },
    #[error("Insufficient stock for product {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: Uuid,
        requested: i32,
        available: i32,
    },
    #[error("Invalid order status '{0}'")]
    InvalidStatus(String),
    #[error("Order {order_id} cannot move from {from} to {to}")]
    InvalidTransition {
        order_id: Uuid,
        from: OrderStatus,
        to: OrderStatus,
    },
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

/// Stable, machine-readable error code for each `DomainError` variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidRequest,
    NotFound,
    ProductUnavailable,
    InsufficientStock,
    InvalidStatus,
    InvalidTransition,
    ConstraintViolation,
    StoreUnavailable,
}

impl DomainError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::InvalidRequest(_) => ErrorKind::InvalidRequest,
            DomainError::NotFound { .. } => ErrorKind::NotFound,
            DomainError::ProductUnavailable { .. } => ErrorKind::ProductUnavailable,
            DomainError::InsufficientStock { .. } => ErrorKind::InsufficientStock,
            DomainError::InvalidStatus(_) => ErrorKind::InvalidStatus,
            DomainError::InvalidTransition { .. } => ErrorKind::InvalidTransition,
            DomainError::ConstraintViolation(_) => ErrorKind::ConstraintViolation,
            DomainError::StoreUnavailable(_) => ErrorKind::StoreUnavailable,
        }
    }

    pub fn order_not_found(id: Uuid) -> Self {
        DomainError::NotFound { entity: "Order", id }
    }
}
