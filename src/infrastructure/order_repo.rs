use std::time::Duration;

use bigdecimal::BigDecimal;
use diesel::dsl::{count_star, sum};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::{
    NewOrder, NewOrderItem, OrderItemView, OrderStatus, OrderSummary, OrderView, StatusUpdate,
};
use crate::domain::pagination::{ListResult, PageRequest};
use crate::domain::ports::{OrderRepository, OrderTransaction};
use crate::domain::product::Product;
use crate::domain::stats::{DayWindow, OrderStats};
use crate::schema::{order_items, orders, products};

use super::models::{
    stored_status, NewOrderItemRow, NewOrderRow, OrderItemRow, OrderRow, ProductRow,
};

const DEFAULT_TX_TIMEOUT: Duration = Duration::from_secs(5);

// ── Transaction primitives ───────────────────────────────────────────────────

struct PgOrderTransaction<'c> {
    conn: &'c mut PgConnection,
}

impl OrderTransaction for PgOrderTransaction<'_> {
    fn lock_product(&mut self, id: Uuid) -> Result<Option<Product>, DomainError> {
        let row = products::table
            .filter(products::id.eq(id))
            .select(ProductRow::as_select())
            .for_update()
            .first(self.conn)
            .optional()?;
        Ok(row.map(Product::from))
    }

    fn decrement_stock(&mut self, id: Uuid, quantity: i32) -> Result<(), DomainError> {
        let affected = diesel::update(
            products::table
                .filter(products::id.eq(id))
                .filter(products::stock.ge(quantity)),
        )
        .set((
            products::stock.eq(products::stock - quantity),
            products::updated_at.eq(chrono::Utc::now()),
        ))
        .execute(self.conn)?;

        if affected == 0 {
            return Err(DomainError::ConstraintViolation(format!(
                "stock of product {} cannot be reduced by {}",
                id, quantity
            )));
        }
        Ok(())
    }

    fn insert_order(&mut self, order: NewOrder) -> Result<OrderSummary, DomainError> {
        let row = diesel::insert_into(orders::table)
            .values(&NewOrderRow {
                id: order.id,
                number: order.number,
                user_id: order.user_id,
                status: order.status.as_str().to_string(),
                total_amount: order.total_amount,
            })
            .returning(OrderRow::as_returning())
            .get_result(self.conn)?;
        row.try_into()
    }

    fn insert_items(
        &mut self,
        order_id: Uuid,
        items: &[NewOrderItem],
    ) -> Result<Vec<OrderItemView>, DomainError> {
        let rows: Vec<NewOrderItemRow> = items
            .iter()
            .map(|i| NewOrderItemRow {
                id: Uuid::new_v4(),
                order_id,
                product_id: i.product_id,
                line_number: i.line_number,
                quantity: i.quantity,
                unit_price: i.unit_price.clone(),
            })
            .collect();
        let mut inserted = diesel::insert_into(order_items::table)
            .values(&rows)
            .returning(OrderItemRow::as_returning())
            .get_results(self.conn)?;
        inserted.sort_by_key(|row| row.line_number);
        Ok(inserted.into_iter().map(OrderItemView::from).collect())
    }
}

// ── Repository ────────────────────────────────────────────────────────────────

pub struct DieselOrderRepository {
    pool: DbPool,
    tx_timeout: Duration,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool,
            tx_timeout: DEFAULT_TX_TIMEOUT,
        }
    }

    /// Upper bound on lock waits and on each statement inside an order transaction.
    pub fn with_transaction_timeout(mut self, timeout: Duration) -> Self {
        self.tx_timeout = timeout;
        self
    }
}

impl OrderRepository for DieselOrderRepository {
    fn in_transaction<T, F>(&self, work: F) -> Result<T, DomainError>
    where
        F: FnOnce(&mut dyn OrderTransaction) -> Result<T, DomainError>,
    {
        let mut pooled = self.pool.get()?;
        let conn: &mut PgConnection = &mut pooled;
        let timeout_ms = self.tx_timeout.as_millis().max(1);

        let result = conn.transaction::<_, DomainError, _>(|conn| {
            diesel::sql_query(format!("SET LOCAL lock_timeout = {}", timeout_ms)).execute(conn)?;
            diesel::sql_query(format!("SET LOCAL statement_timeout = {}", timeout_ms))
                .execute(conn)?;
            work(&mut PgOrderTransaction { conn })
        });
        if let Err(e) = &result {
            log::warn!("Order transaction rolled back: {}", e);
        }
        result
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<OrderView>, DomainError> {
        let mut conn = self.pool.get()?;

        let order = orders::table
            .filter(orders::id.eq(id))
            .select(OrderRow::as_select())
            .first(&mut conn)
            .optional()?;

        let Some(order) = order else {
            return Ok(None);
        };

        let items = OrderItemRow::belonging_to(&order)
            .select(OrderItemRow::as_select())
            .order(order_items::line_number.asc())
            .load(&mut conn)?;

        Ok(Some(OrderView {
            order: order.try_into()?,
            items: items.into_iter().map(OrderItemView::from).collect(),
        }))
    }

    fn list(&self, page: PageRequest) -> Result<ListResult<OrderSummary>, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let total: i64 = orders::table.count().get_result(conn)?;

            let rows = orders::table
                .select(OrderRow::as_select())
                .order((orders::created_at.desc(), orders::id.desc()))
                .limit(page.limit)
                .offset(page.offset())
                .load(conn)?;

            Ok(ListResult {
                items: rows
                    .into_iter()
                    .map(OrderSummary::try_from)
                    .collect::<Result<Vec<_>, DomainError>>()?,
                total,
            })
        })
    }

    fn update_status(
        &self,
        id: Uuid,
        status: OrderStatus,
        allowed_from: &[OrderStatus],
    ) -> Result<StatusUpdate, DomainError> {
        let mut conn = self.pool.get()?;
        let allowed: Vec<&str> = allowed_from.iter().map(|s| s.as_str()).collect();

        let affected = diesel::update(
            orders::table
                .filter(orders::id.eq(id))
                .filter(orders::status.eq_any(allowed)),
        )
        .set((
            orders::status.eq(status.as_str()),
            orders::updated_at.eq(chrono::Utc::now()),
        ))
        .execute(&mut conn)?;

        if affected > 0 {
            return Ok(StatusUpdate::Updated);
        }

        let current: Option<String> = orders::table
            .filter(orders::id.eq(id))
            .select(orders::status)
            .first(&mut conn)
            .optional()?;
        match current {
            None => Ok(StatusUpdate::Missing),
            Some(current) => Ok(StatusUpdate::Rejected {
                current: stored_status(id, &current)?,
            }),
        }
    }

    fn stats(&self, today: DayWindow) -> Result<OrderStats, DomainError> {
        let mut conn = self.pool.get()?;

        // One snapshot for all four numbers.
        conn.build_transaction()
            .read_only()
            .repeatable_read()
            .run::<_, DomainError, _>(|conn| {
                let (total_orders, total_amount): (i64, Option<BigDecimal>) = orders::table
                    .select((count_star(), sum(orders::total_amount)))
                    .get_result(conn)?;

                let (today_orders, today_amount): (i64, Option<BigDecimal>) = orders::table
                    .filter(orders::created_at.ge(today.start))
                    .filter(orders::created_at.lt(today.end))
                    .select((count_star(), sum(orders::total_amount)))
                    .get_result(conn)?;

                Ok(OrderStats {
                    total_orders,
                    total_amount: total_amount.unwrap_or_else(|| BigDecimal::from(0)),
                    today_orders,
                    today_amount: today_amount.unwrap_or_else(|| BigDecimal::from(0)),
                })
            })
    }
}
