use std::collections::HashMap;

use bigdecimal::BigDecimal;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::{
    generate_order_number, NewOrder, NewOrderItem, OrderRequest, OrderStatus, OrderSummary,
    OrderView, StatusUpdate, ValidatedOrder, ORDER_TOTAL_CEILING,
};
use crate::domain::pagination::{Page, PageRequest};
use crate::domain::ports::{OrderRepository, OrderTransaction};
use crate::domain::product::Product;

pub struct OrderService<R> {
    repo: R,
    max_page_size: i64,
}

impl<R: OrderRepository> OrderService<R> {
    pub fn new(repo: R, max_page_size: i64) -> Self {
        Self {
            repo,
            max_page_size,
        }
    }

    /// Validate stock, deduct it and persist the order with its items in a
    /// single transaction. Nothing is written unless every step succeeds.
    pub fn create_order(&self, request: OrderRequest) -> Result<OrderView, DomainError> {
        let order = request.validate()?;
        let user_id = order.user_id;

        let result = self.repo.in_transaction(|tx| place_order(tx, &order));
        match &result {
            Ok(view) => log::info!(
                "Created order {} ({}) for user {}: {} item(s), total {}",
                view.order.id,
                view.order.number,
                user_id,
                view.items.len(),
                view.order.total_amount
            ),
            Err(e) => log::warn!("Order creation for user {} rejected: {}", user_id, e),
        }
        result
    }

    pub fn get_order(&self, id: Uuid) -> Result<OrderView, DomainError> {
        self.repo
            .find_by_id(id)?
            .ok_or_else(|| DomainError::order_not_found(id))
    }

    pub fn list_orders(&self, page: i64, limit: i64) -> Result<Page<OrderSummary>, DomainError> {
        let request = PageRequest::new(page, limit, self.max_page_size)?;
        let list = self.repo.list(request)?;
        Ok(Page::from_list(request, list))
    }

    pub fn update_status(&self, id: Uuid, status: &str) -> Result<OrderView, DomainError> {
        let target: OrderStatus = status.parse()?;
        let allowed_from = OrderStatus::allowed_predecessors(target);

        match self.repo.update_status(id, target, &allowed_from)? {
            StatusUpdate::Updated => {
                log::info!("Order {} moved to {}", id, target);
                self.get_order(id)
            }
            StatusUpdate::Missing => Err(DomainError::order_not_found(id)),
            StatusUpdate::Rejected { current } if current == target => self.get_order(id),
            StatusUpdate::Rejected { current } => Err(DomainError::InvalidTransition {
                order_id: id,
                from: current,
                to: target,
            }),
        }
    }
}

fn place_order(
    tx: &mut dyn OrderTransaction,
    order: &ValidatedOrder,
) -> Result<OrderView, DomainError> {
    // Lock in id order so overlapping orders cannot deadlock each other.
    let mut lock_order: Vec<Uuid> = order.demand.iter().map(|(id, _)| *id).collect();
    lock_order.sort();
    let mut locked: HashMap<Uuid, Product> = HashMap::with_capacity(lock_order.len());
    for product_id in lock_order {
        if let Some(product) = tx.lock_product(product_id)? {
            locked.insert(product_id, product);
        }
    }

    for &(product_id, requested) in &order.demand {
        let product = locked
            .get(&product_id)
            .filter(|p| p.active)
            .ok_or(DomainError::ProductUnavailable { product_id })?;
        if requested > product.stock {
            return Err(DomainError::InsufficientStock {
                product_id,
                requested,
                available: product.stock,
            });
        }
    }

    let mut total = BigDecimal::from(0);
    let mut new_items = Vec::with_capacity(order.items.len());
    for (line_number, item) in order.items.iter().enumerate() {
        let unit_price = locked
            .get(&item.product_id)
            .map(|p| p.price.clone())
            .ok_or(DomainError::ProductUnavailable {
                product_id: item.product_id,
            })?;
        total += &unit_price * &BigDecimal::from(item.quantity);
        new_items.push(NewOrderItem {
            product_id: item.product_id,
            line_number: line_number as i32 + 1,
            quantity: item.quantity,
            unit_price,
        });
    }

    if total >= BigDecimal::from(ORDER_TOTAL_CEILING) {
        return Err(DomainError::InvalidRequest(format!(
            "order total {} reaches the maximum of {}",
            total, ORDER_TOTAL_CEILING
        )));
    }

    for &(product_id, requested) in &order.demand {
        tx.decrement_stock(product_id, requested)?;
    }

    let summary = tx.insert_order(NewOrder {
        id: Uuid::new_v4(),
        number: generate_order_number(Utc::now()),
        user_id: order.user_id,
        status: OrderStatus::Pending,
        total_amount: total,
    })?;
    let items = tx.insert_items(summary.id, &new_items)?;

    Ok(OrderView {
        order: summary,
        items,
    })
}
