use uuid::Uuid;

use super::errors::DomainError;
use super::order::{
    NewOrder, NewOrderItem, OrderItemView, OrderStatus, OrderSummary, OrderView, StatusUpdate,
};
use super::pagination::{ListResult, PageRequest};
use super::product::{NewProduct, Product};
use super::stats::{DayWindow, OrderStats};

/// Write primitives available inside an order transaction. None of them
/// commits or rolls back; the enclosing `OrderRepository::in_transaction`
/// owns the scope.
pub trait OrderTransaction {
    /// Read a product and hold a row lock on it until the transaction ends.
    fn lock_product(&mut self, id: Uuid) -> Result<Option<Product>, DomainError>;
    fn decrement_stock(&mut self, id: Uuid, quantity: i32) -> Result<(), DomainError>;
    fn insert_order(&mut self, order: NewOrder) -> Result<OrderSummary, DomainError>;
    fn insert_items(
        &mut self,
        order_id: Uuid,
        items: &[NewOrderItem],
    ) -> Result<Vec<OrderItemView>, DomainError>;
}

pub trait OrderRepository: Send + Sync + 'static {
    /// Run `work` in one database transaction: committed when it returns
    /// `Ok`, rolled back otherwise.
    fn in_transaction<T, F>(&self, work: F) -> Result<T, DomainError>
    where
        F: FnOnce(&mut dyn OrderTransaction) -> Result<T, DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<OrderView>, DomainError>;
    fn list(&self, page: PageRequest) -> Result<ListResult<OrderSummary>, DomainError>;
    /// Set `status` on the order only if its current status is one of `allowed_from`.
    fn update_status(
        &self,
        id: Uuid,
        status: OrderStatus,
        allowed_from: &[OrderStatus],
    ) -> Result<StatusUpdate, DomainError>;
    fn stats(&self, today: DayWindow) -> Result<OrderStats, DomainError>;
}

pub trait ProductRepository: Send + Sync + 'static {
    fn create(&self, product: NewProduct) -> Result<Product, DomainError>;
    fn list_active(&self, page: PageRequest) -> Result<ListResult<Product>, DomainError>;
}
