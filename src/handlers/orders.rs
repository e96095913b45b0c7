use actix_web::{web, HttpResponse};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{money, AppState};
use crate::domain::order::{OrderItemInput, OrderItemView, OrderRequest, OrderSummary, OrderView};
use crate::domain::stats::OrderStats;
use crate::errors::AppError;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderItemRequest {
    pub product_id: Uuid,
    /// Must be positive.
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    /// Positive id of the ordering user.
    pub user_id: i64,
    /// Between 1 and 1000 items. Lines for the same product are checked against
    /// stock by their combined quantity.
    pub items: Vec<CreateOrderItemRequest>,
}

impl From<CreateOrderRequest> for OrderRequest {
    fn from(body: CreateOrderRequest) -> Self {
        OrderRequest {
            user_id: body.user_id,
            items: body
                .items
                .into_iter()
                .map(|i| OrderItemInput {
                    product_id: i.product_id,
                    quantity: i.quantity,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    /// One of `pending`, `processing`, `shipped`, `delivered`, `cancelled`.
    pub status: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderItemResponse {
    pub id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    /// Price per unit captured when the order was placed, e.g. "9.99"
    pub unit_price: String,
    pub subtotal: String,
}

impl From<OrderItemView> for OrderItemResponse {
    fn from(item: OrderItemView) -> Self {
        let subtotal = &item.unit_price * &BigDecimal::from(item.quantity);
        OrderItemResponse {
            id: item.id,
            product_id: item.product_id,
            quantity: item.quantity,
            unit_price: money(&item.unit_price),
            subtotal: money(&subtotal),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderSummaryResponse {
    pub id: Uuid,
    pub number: String,
    pub user_id: i64,
    pub status: String,
    pub total_amount: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<OrderSummary> for OrderSummaryResponse {
    fn from(o: OrderSummary) -> Self {
        OrderSummaryResponse {
            id: o.id,
            number: o.number,
            user_id: o.user_id,
            status: o.status.as_str().to_string(),
            total_amount: money(&o.total_amount),
            created_at: o.created_at.to_rfc3339(),
            updated_at: o.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    #[serde(flatten)]
    pub order: OrderSummaryResponse,
    pub items: Vec<OrderItemResponse>,
}

impl From<OrderView> for OrderResponse {
    fn from(view: OrderView) -> Self {
        OrderResponse {
            order: view.order.into(),
            items: view.items.into_iter().map(OrderItemResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderStatsResponse {
    pub total_orders: i64,
    pub total_amount: String,
    pub today_orders: i64,
    pub today_amount: String,
}

impl From<OrderStats> for OrderStatsResponse {
    fn from(s: OrderStats) -> Self {
        OrderStatsResponse {
            total_orders: s.total_orders,
            total_amount: money(&s.total_amount),
            today_orders: s.today_orders,
            today_amount: money(&s.today_amount),
        }
    }
}

// ── Pagination ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListOrdersParams {
    /// Page number (1-based). Defaults to 1.
    #[serde(default = "default_page")]
    pub page: i64,
    /// Number of items per page. Defaults to 20; larger values are clamped
    /// to the configured maximum.
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    20
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListOrdersResponse {
    pub items: Vec<OrderSummaryResponse>,
    pub page: i64,
    pub limit: i64,
    pub total_items: i64,
    pub total_pages: i64,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /api/orders
///
/// Returns a page of orders, newest first, without their items.
#[utoipa::path(
    get,
    path = "/api/orders",
    params(
        ("page" = Option<i64>, Query, description = "Page number (1-based, default 1)"),
        ("limit" = Option<i64>, Query, description = "Items per page (default 20, clamped to the configured maximum)"),
    ),
    responses(
        (status = 200, description = "Paginated list of orders", body = ListOrdersResponse),
        (status = 400, description = "Invalid page or limit"),
        (status = 503, description = "Database unavailable"),
    ),
    tag = "orders"
)]
pub async fn list_orders(
    state: web::Data<AppState>,
    query: web::Query<ListOrdersParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();

    let page = web::block(move || state.orders.list_orders(params.page, params.limit)).await??;

    let page = page.map(OrderSummaryResponse::from);
    Ok(HttpResponse::Ok().json(ListOrdersResponse {
        items: page.items,
        page: page.page,
        limit: page.limit,
        total_items: page.total_items,
        total_pages: page.total_pages,
    }))
}

/// GET /api/orders/{id}
///
/// Returns the order together with its items.
#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 404, description = "Order not found"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();

    let order = web::block(move || state.orders.get_order(order_id)).await??;

    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/// POST /api/orders
///
/// Places an order. Stock is checked and deducted, and the order with its
/// items is written, inside one database transaction; on any failure nothing
/// is persisted.
#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = OrderResponse),
        (status = 400, description = "Malformed request"),
        (status = 409, description = "Insufficient stock"),
        (status = 422, description = "Product missing or inactive"),
        (status = 503, description = "Database unavailable"),
    ),
    tag = "orders"
)]
pub async fn create_order(
    state: web::Data<AppState>,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let request = OrderRequest::from(body.into_inner());

    let order = web::block(move || state.orders.create_order(request)).await??;

    Ok(HttpResponse::Created().json(OrderResponse::from(order)))
}

/// PUT /api/orders/{id}/status
#[utoipa::path(
    put,
    path = "/api/orders/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = OrderResponse),
        (status = 400, description = "Unknown status"),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Transition not allowed from the current status"),
    ),
    tag = "orders"
)]
pub async fn update_order_status(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateOrderStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let status = body.into_inner().status;

    let order = web::block(move || state.orders.update_status(order_id, &status)).await??;

    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/// GET /api/orders/stats
///
/// Order count and amount, overall and for the current day.
#[utoipa::path(
    get,
    path = "/api/orders/stats",
    responses(
        (status = 200, description = "Order statistics", body = OrderStatsResponse),
        (status = 503, description = "Database unavailable"),
    ),
    tag = "orders"
)]
pub async fn order_stats(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let stats = web::block(move || state.stats.order_stats()).await??;

    Ok(HttpResponse::Ok().json(OrderStatsResponse::from(stats)))
}
