use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::errors::DomainError;

/// Most lines a single order may carry.
pub const MAX_ORDER_LINES: usize = 1000;
/// Upper bound (exclusive) of the NUMERIC(14,2) order total column.
pub const ORDER_TOTAL_CEILING: i64 = 1_000_000_000_000;

/// Lifecycle of an order.
///
/// Allowed moves (re-applying the current status is an accepted no-op):
///
/// * `pending`    → `processing`, `shipped`, `cancelled`
/// * `processing` → `shipped`, `cancelled`
/// * `shipped`    → `delivered`
/// * `delivered` and `cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        if self == next {
            return true;
        }
        matches!(
            (self, next),
            (Pending, Processing)
                | (Pending, Shipped)
                | (Pending, Cancelled)
                | (Processing, Shipped)
                | (Processing, Cancelled)
                | (Shipped, Delivered)
        )
    }

    /// Every other status an order may currently hold for a move to `target`
    /// to be accepted. `target` itself is excluded so a no-op never writes.
    pub fn allowed_predecessors(target: OrderStatus) -> Vec<OrderStatus> {
        OrderStatus::ALL
            .into_iter()
            .filter(|&from| from != target && from.can_transition_to(target))
            .collect()
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| DomainError::InvalidStatus(s.to_string()))
    }
}

#[derive(Debug, Clone)]
pub struct OrderItemInput {
    pub product_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Clone)]
pub struct OrderRequest {
    pub user_id: i64,
    pub items: Vec<OrderItemInput>,
}

/// An order request that passed boundary validation.
///
/// `demand` holds the cumulative quantity per product in the order the
/// products first appear in the request.
#[derive(Debug, Clone)]
pub struct ValidatedOrder {
    pub user_id: i64,
    pub items: Vec<OrderItemInput>,
    pub demand: Vec<(Uuid, i32)>,
}

impl OrderRequest {
    pub fn validate(self) -> Result<ValidatedOrder, DomainError> {
        if self.user_id <= 0 {
            return Err(DomainError::InvalidRequest(
                "user_id must be a positive integer".to_string(),
            ));
        }
        if self.items.is_empty() {
            return Err(DomainError::InvalidRequest(
                "an order needs at least one item".to_string(),
            ));
        }
        if self.items.len() > MAX_ORDER_LINES {
            return Err(DomainError::InvalidRequest(format!(
                "an order may have at most {} items, got {}",
                MAX_ORDER_LINES,
                self.items.len()
            )));
        }

        let mut demand: Vec<(Uuid, i32)> = Vec::new();
        let mut index: HashMap<Uuid, usize> = HashMap::new();
        for (position, item) in self.items.iter().enumerate() {
            if item.quantity <= 0 {
                return Err(DomainError::InvalidRequest(format!(
                    "item {} (product {}) has non-positive quantity {}",
                    position, item.product_id, item.quantity
                )));
            }
            match index.get(&item.product_id) {
                Some(&slot) => {
                    let total = demand[slot].1.checked_add(item.quantity).ok_or_else(|| {
                        DomainError::InvalidRequest(format!(
                            "total quantity for product {} is too large",
                            item.product_id
                        ))
                    })?;
                    demand[slot].1 = total;
                }
                None => {
                    index.insert(item.product_id, demand.len());
                    demand.push((item.product_id, item.quantity));
                }
            }
        }

        Ok(ValidatedOrder {
            user_id: self.user_id,
            items: self.items,
            demand,
        })
    }
}

/// Order number in the form `ORD<yyyymmddHHMMSS><6 hex chars>`.
pub fn generate_order_number(now: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("ORD{}{}", now.format("%Y%m%d%H%M%S"), &suffix[..6])
}

#[derive(Debug, Clone)]
pub struct NewOrder {
    pub id: Uuid,
    pub number: String,
    pub user_id: i64,
    pub status: OrderStatus,
    pub total_amount: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub product_id: Uuid,
    pub line_number: i32,
    pub quantity: i32,
    pub unit_price: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct OrderSummary {
    pub id: Uuid,
    pub number: String,
    pub user_id: i64,
    pub status: OrderStatus,
    pub total_amount: BigDecimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct OrderItemView {
    pub id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct OrderView {
    pub order: OrderSummary,
    pub items: Vec<OrderItemView>,
}

/// Outcome of a conditional status update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusUpdate {
    Updated,
    Missing,
    Rejected { current: OrderStatus },
}
