//! In-memory repository used by the service tests. A transaction works on a
//! copy of the state and swaps it in only on success.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::{
    NewOrder, NewOrderItem, OrderItemView, OrderStatus, OrderSummary, OrderView, StatusUpdate,
};
use crate::domain::pagination::{ListResult, PageRequest};
use crate::domain::ports::{OrderRepository, OrderTransaction, ProductRepository};
use crate::domain::product::{NewProduct, Product};
use crate::domain::stats::{DayWindow, OrderStats};

#[derive(Debug, Clone, Default)]
struct State {
    products: HashMap<Uuid, Product>,
    // Insertion order; listing walks it newest first.
    orders: Vec<OrderSummary>,
    items: HashMap<Uuid, Vec<OrderItemView>>,
    fail_item_inserts: bool,
    transactions_started: usize,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<State>>,
}

impl InMemoryStore {
    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn add_product(&self, name: &str, price: &str, stock: i32, active: bool) -> Uuid {
        let id = Uuid::new_v4();
        let now = Utc::now();
        self.state().products.insert(
            id,
            Product {
                id,
                name: name.to_string(),
                price: BigDecimal::from_str(price).unwrap(),
                stock,
                active,
                created_at: now,
                updated_at: now,
            },
        );
        id
    }

    pub fn stock_of(&self, id: Uuid) -> i32 {
        self.state().products[&id].stock
    }

    pub fn set_price(&self, id: Uuid, price: &str) {
        if let Some(p) = self.state().products.get_mut(&id) {
            p.price = BigDecimal::from_str(price).unwrap();
        }
    }

    pub fn order_count(&self) -> usize {
        self.state().orders.len()
    }

    pub fn transactions_started(&self) -> usize {
        self.state().transactions_started
    }

    pub fn fail_item_inserts(&self) {
        self.state().fail_item_inserts = true;
    }

    pub fn backdate_order(&self, id: Uuid, created_at: DateTime<Utc>) {
        if let Some(o) = self.state().orders.iter_mut().find(|o| o.id == id) {
            o.created_at = created_at;
        }
    }
}

struct InMemoryTransaction<'a> {
    state: &'a mut State,
}

impl OrderTransaction for InMemoryTransaction<'_> {
    fn lock_product(&mut self, id: Uuid) -> Result<Option<Product>, DomainError> {
        Ok(self.state.products.get(&id).cloned())
    }

    fn decrement_stock(&mut self, id: Uuid, quantity: i32) -> Result<(), DomainError> {
        match self.state.products.get_mut(&id) {
            Some(p) if p.stock >= quantity => {
                p.stock -= quantity;
                Ok(())
            }
            _ => Err(DomainError::ConstraintViolation(format!(
                "stock of product {} would go negative",
                id
            ))),
        }
    }

    fn insert_order(&mut self, order: NewOrder) -> Result<OrderSummary, DomainError> {
        let now = Utc::now();
        let summary = OrderSummary {
            id: order.id,
            number: order.number,
            user_id: order.user_id,
            status: order.status,
            total_amount: order.total_amount,
            created_at: now,
            updated_at: now,
        };
        self.state.orders.push(summary.clone());
        Ok(summary)
    }

    fn insert_items(
        &mut self,
        order_id: Uuid,
        items: &[NewOrderItem],
    ) -> Result<Vec<OrderItemView>, DomainError> {
        if self.state.fail_item_inserts {
            return Err(DomainError::StoreUnavailable("connection reset".to_string()));
        }
        let views: Vec<OrderItemView> = items
            .iter()
            .map(|i| OrderItemView {
                id: Uuid::new_v4(),
                product_id: i.product_id,
                quantity: i.quantity,
                unit_price: i.unit_price.clone(),
            })
            .collect();
        self.state.items.insert(order_id, views.clone());
        Ok(views)
    }
}

impl OrderRepository for InMemoryStore {
    fn in_transaction<T, F>(&self, work: F) -> Result<T, DomainError>
    where
        F: FnOnce(&mut dyn OrderTransaction) -> Result<T, DomainError>,
    {
        let mut guard = self.state();
        guard.transactions_started += 1;
        let mut staged = guard.clone();
        let result = work(&mut InMemoryTransaction { state: &mut staged });
        if result.is_ok() {
            *guard = staged;
        }
        result
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<OrderView>, DomainError> {
        let state = self.state();
        Ok(state.orders.iter().find(|o| o.id == id).map(|o| OrderView {
            order: o.clone(),
            items: state.items.get(&id).cloned().unwrap_or_default(),
        }))
    }

    fn list(&self, page: PageRequest) -> Result<ListResult<OrderSummary>, DomainError> {
        let state = self.state();
        Ok(ListResult {
            items: state
                .orders
                .iter()
                .rev()
                .skip(page.offset() as usize)
                .take(page.limit as usize)
                .cloned()
                .collect(),
            total: state.orders.len() as i64,
        })
    }

    fn update_status(
        &self,
        id: Uuid,
        status: OrderStatus,
        allowed_from: &[OrderStatus],
    ) -> Result<StatusUpdate, DomainError> {
        let mut state = self.state();
        let Some(order) = state.orders.iter_mut().find(|o| o.id == id) else {
            return Ok(StatusUpdate::Missing);
        };
        if !allowed_from.contains(&order.status) {
            return Ok(StatusUpdate::Rejected {
                current: order.status,
            });
        }
        order.status = status;
        order.updated_at = Utc::now();
        Ok(StatusUpdate::Updated)
    }

    fn stats(&self, today: DayWindow) -> Result<OrderStats, DomainError> {
        let state = self.state();
        let zero = BigDecimal::from(0);
        let mut stats = OrderStats {
            total_orders: 0,
            total_amount: zero.clone(),
            today_orders: 0,
            today_amount: zero,
        };
        for o in &state.orders {
            stats.total_orders += 1;
            stats.total_amount += o.total_amount.clone();
            if today.contains(o.created_at) {
                stats.today_orders += 1;
                stats.today_amount += o.total_amount.clone();
            }
        }
        Ok(stats)
    }
}

impl ProductRepository for InMemoryStore {
    fn create(&self, product: NewProduct) -> Result<Product, DomainError> {
        let now = Utc::now();
        let product = Product {
            id: product.id,
            name: product.name,
            price: product.price,
            stock: product.stock,
            active: product.active,
            created_at: now,
            updated_at: now,
        };
        self.state().products.insert(product.id, product.clone());
        Ok(product)
    }

    fn list_active(&self, page: PageRequest) -> Result<ListResult<Product>, DomainError> {
        let state = self.state();
        let mut active: Vec<&Product> = state.products.values().filter(|p| p.active).collect();
        active.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(ListResult {
            total: active.len() as i64,
            items: active
                .into_iter()
                .skip(page.offset() as usize)
                .take(page.limit as usize)
                .cloned()
                .collect(),
        })
    }
}
